//! Error types for memex.

use thiserror::Error;

/// Result type alias using memex's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for memex operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Every supplied search term was rejected by normalization
    #[error("Bad search term: no usable terms in query")]
    BadTerm,

    /// The query's filters contradict each other
    #[error("Invalid search: contradictory filters")]
    InvalidSearch,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error classifies a malformed query rather than an I/O failure.
    ///
    /// Only these variants are recovered locally by the search coordinator.
    pub fn is_query_classification(&self) -> bool {
        matches!(self, Error::BadTerm | Error::InvalidSearch)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::InvalidInput(e.to_string())
    }
}
