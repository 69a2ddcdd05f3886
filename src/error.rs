use thiserror::Error;

/// Custom error types for the rowframe library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from std::io operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A text line did not split into the expected number of fields.
    #[error("Malformed record: expected {expected} fields, found {found}")]
    MalformedRecord { expected: usize, found: usize },

    /// A frame length prefix (or a payload about to be framed) exceeds the configured maximum.
    #[error("Frame too large: {declared} bytes exceeds limit of {limit}")]
    FrameTooLarge { declared: usize, limit: usize },

    /// End of stream reached in the middle of a frame.
    #[error("Truncated frame: expected {expected} bytes, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    /// The payload is not a valid tag-length-value encoding.
    #[error("Decode error at offset {offset}: {reason}")]
    DecodeError { offset: usize, reason: &'static str },

    /// Invalid frame header (e.g., a negative length prefix).
    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    /// A configuration value failed validation.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// Create a new `InvalidFrame` error with a descriptive message.
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: message.into(),
        }
    }

    /// Create a new `InvalidConfig` error with a descriptive message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn malformed_record(expected: usize, found: usize) -> Self {
        Self::MalformedRecord { expected, found }
    }

    pub fn frame_too_large(declared: usize, limit: usize) -> Self {
        Self::FrameTooLarge { declared, limit }
    }

    pub fn truncated_frame(expected: usize, actual: usize) -> Self {
        Self::TruncatedFrame { expected, actual }
    }

    pub fn decode(offset: usize, reason: &'static str) -> Self {
        Self::DecodeError { offset, reason }
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
