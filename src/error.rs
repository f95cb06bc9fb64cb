//! Error types for the stream adapters and configuration
//!
//! Flow-control outcomes (short destination, short source) are not errors;
//! they are reported through [`Status`](crate::transform::Status). Only
//! terminal conditions end up here.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransformError>;

/// Terminal failure of a transformed stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Input at `offset` (counted from the start of the stream) could not be converted
    #[error("malformed input at byte offset {offset}")]
    Malformed { offset: u64 },

    /// The transformer could not make progress with an internal buffer of this size
    #[error("transformer made no progress with a {capacity}-byte buffer")]
    BufferTooSmall { capacity: usize },

    /// The writer was already closed
    #[error("stream already closed")]
    Closed,

    /// Replay of an upstream or downstream I/O failure
    #[error("I/O error ({kind:?}): {message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl TransformError {
    /// Record an I/O error so it can be returned again on later calls
    pub fn from_io(err: &io::Error) -> Self {
        TransformError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Check if this error reports undecodable input
    pub fn is_malformed(&self) -> bool {
        matches!(self, TransformError::Malformed { .. })
    }
}

impl From<TransformError> for io::Error {
    fn from(err: TransformError) -> Self {
        let kind = match &err {
            TransformError::Malformed { .. } => io::ErrorKind::InvalidData,
            TransformError::BufferTooSmall { .. } => io::ErrorKind::Other,
            TransformError::Closed => io::ErrorKind::BrokenPipe,
            TransformError::Io { kind, message } => return io::Error::new(*kind, message.clone()),
        };
        io::Error::new(kind, err)
    }
}

/// Configuration parsing errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("buffer_size must be at least {min} bytes, got {actual}")]
    BufferTooSmall { min: usize, actual: usize },
}
