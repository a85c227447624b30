use thiserror::Error;

use crate::storage::SourceError;

/// Errors surfaced by the code lookup queries.
///
/// A code without a matching entry is not an error; the queries answer
/// `false` or an empty greeting instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl QueryError {
    /// Stable machine readable code for API error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidInput(_) => "BAD_USER_INPUT",
            QueryError::Source(_) => "SOURCE_FETCH_FAILED",
        }
    }
}
