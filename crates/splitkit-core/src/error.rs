//! Fault-level error type for splitkit.
//!
//! Only genuine faults travel through [`Error`]: I/O failures from a byte
//! source, allocation failures, invalid configuration. A byte sequence that
//! simply is not a given timer format is never an [`Error`]; parsers report
//! that as "no match".

/// Unified fault type covering all failure modes that escape a parser.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O operation on a byte source failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Configuration or caller input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A raw split file exceeded the configured size ceiling.
    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Size of the rejected input.
        size: u64,
        /// Configured ceiling.
        limit: u64,
    },

    /// Memory for a decoded structure could not be reserved.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Convenience constructor for [`Error::ResourceExhausted`].
    pub fn exhausted(message: impl Into<String>) -> Self {
        Error::ResourceExhausted(message.into())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Error::ResourceExhausted(err.to_string())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
