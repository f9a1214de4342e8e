/// Shared utilities and error types used across all layers.
pub mod error;
pub mod result;

pub use error::{BomError, ExitCode};
pub use result::Result;
