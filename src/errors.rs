use serde_json::Value;
use thiserror::Error;

/// Error type shared by every workbench operation.
#[derive(Error, Debug)]
pub enum WorkbenchError {
    /// File system failure while reading an import or writing storage.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Text that is not valid JSON, or JSON that does not fit the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Transport failure talking to the natural query service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// A schema that breaks one of the validator rules.
    #[error("Invalid schema: {0}")]
    Validation(String),
    #[error("Import error: {0}")]
    Import(String),
    #[error("Export error: {0}")]
    Export(String),
    /// Key/value storage failure (e.g., unreadable slot).
    #[error("Storage error: {0}")]
    Storage(String),
    /// Configuration error (e.g., malformed base URL).
    #[error("Configuration error: {0}")]
    Config(String),
    /// Index or name that does not point at anything.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Rejected query submission.
    #[error("Query error: {0}")]
    Query(String),
    /// Error reported by the natural query service, carrying its status and payload.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        data: Value,
    },
}

impl WorkbenchError {
    /// HTTP-like status for API errors, `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            WorkbenchError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkbenchError>;
