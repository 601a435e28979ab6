//! Storage error types.

use shanti_shared::AppError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Request could not be sent or its response could not be read.
    #[error("storage transport error: {0}")]
    Transport(String),

    /// Storage API answered with a non-success status.
    #[error("storage API responded with {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Storage API envelope reported `success: false`.
    #[error("storage API returned error: {0}")]
    Api(String),

    /// Response body was not a valid envelope.
    #[error("malformed storage API response: {0}")]
    Decode(String),

    /// Storage client configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create a non-success status error.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::status(status.as_u16(), err.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Configuration(msg) => Self::Configuration(msg),
            other => Self::ExternalService(other.to_string()),
        }
    }
}
