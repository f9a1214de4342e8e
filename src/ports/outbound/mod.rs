/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, console, etc.).
pub mod formatter;
pub mod output_presenter;
pub mod snapshot_store;

pub use formatter::BomFormatter;
pub use output_presenter::OutputPresenter;
pub use snapshot_store::SnapshotStore;
