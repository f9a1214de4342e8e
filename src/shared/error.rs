use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the requested operation completed without findings
    Success = 0,
    /// Validation findings were reported for the inspected BOM
    ValidationFindings = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (storage error, file I/O error, parse error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ValidationFindings => write!(f, "Validation Findings (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for BOM management.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
///
/// CRUD precondition violations (`DuplicateId`, `NotFound`) are always fatal
/// to the single operation and never applied partially; validators report
/// their findings through report types instead of raising here.
#[derive(Debug, Error)]
pub enum BomError {
    #[error("An asset with ID '{id}' already exists in this BOM")]
    DuplicateId { id: String },

    #[error("Asset with ID '{id}' was not found in this BOM")]
    NotFound { id: String },

    #[error("Version '{version_id}' was not found in the snapshot store\n\n💡 Hint: Run the history command to list available versions")]
    VersionNotFound { version_id: String },

    #[error("A child assembly named '{name}' is already attached at this level")]
    DuplicateChild { name: String },

    #[error("No assembly node found at path '{path}'")]
    PathNotFound { path: String },

    /// Validation error for value objects and documents
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Snapshot storage failure for '{key}'\nDetails: {details}\n\n💡 Hint: Please verify that the version directory exists and is writable")]
    Storage { key: String, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to parse BOM document: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file contains a valid BOM JSON document")]
    DocumentParseError { path: PathBuf, details: String },
}
