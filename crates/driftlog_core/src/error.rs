//! Error types for driftlog core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while reading the log.
///
/// Scans that take a visitor are generic over the visitor's error type `E`;
/// they convert these errors into `E` with `From<CoreError>` and hand the
/// visitor's own errors back untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] driftlog_storage::StorageError),

    /// A stored value could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] driftlog_codec::CodecError),

    /// A key does not follow the key-space layout.
    #[error("invalid key: {message}")]
    InvalidKey {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }
}
