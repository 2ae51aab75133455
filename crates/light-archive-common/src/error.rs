//! Error types for Light Archive

use thiserror::Error;

/// Result type alias using Light Archive Error
pub type Result<T> = std::result::Result<T, Error>;

/// Light Archive error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Record store error: {0}")]
    Store(String),

    #[error("Image upload failed: {0}")]
    Storage(String),

    #[error("Text generation error: {0}")]
    Llm(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} not initialized. Please check environment variables.")]
    NotConfigured(&'static str),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Archive '{0}' not found")]
    ArchiveNotFound(String),

    #[error("{0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::ArchiveNotFound(_))
    }

    /// Whether a retry of the same remote call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::Llm(_) | Error::Store(_) | Error::Storage(_) => true,
            _ => false,
        }
    }
}
