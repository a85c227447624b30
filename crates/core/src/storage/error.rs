use thiserror::Error;

/// Errors that can occur while fetching rows from the spreadsheet source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Source returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Source returned no rows")]
    EmptySheet,
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
