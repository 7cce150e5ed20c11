//! Protocol error types.

use thiserror::Error;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while framing or encoding lines.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Underlying transport failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An unterminated line grew past the configured limit.
    #[error("line too long: {actual} bytes exceeds limit of {limit}")]
    MessageTooLong {
        /// Bytes currently buffered.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
}
