//! Error types for the Murmur graph store.

use thiserror::Error;

/// The main error type for Murmur operations.
#[derive(Error, Debug)]
pub enum MurmurError {
    /// A referenced handle or post id does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required argument was missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The store configuration is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Murmur operations.
pub type Result<T> = std::result::Result<T, MurmurError>;

impl MurmurError {
    /// Create a not-found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        MurmurError::NotFound(msg.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        MurmurError::InvalidArgument(msg.into())
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        MurmurError::InvalidConfig(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MurmurError::NotFound(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MurmurError::InvalidArgument(_))
    }
}
