//! Decode-level error types for splitkit-parser.
//!
//! [`DecodeError`] lives entirely inside a format parser. Every variant except
//! [`DecodeError::Fault`] means "these bytes are not (or no longer) this
//! format" and is folded into a silent no-match at the parser boundary.

/// Errors raised while decoding a byte sequence as one particular format.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input ended before a field could be read.
    #[error("insufficient bytes at offset {offset}: need {needed}, have {available}")]
    Truncated {
        /// Position of the read that failed.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes left at that position.
        available: usize,
    },

    /// A field was present but held an impossible value.
    #[error("corrupt data at offset {offset}: {reason}")]
    Corrupt {
        /// Byte offset (or line number for text formats) of the bad field.
        offset: usize,
        /// What was wrong.
        reason: String,
    },

    /// The input fails this format's structural sanity check.
    #[error("format mismatch: {0}")]
    Mismatch(String),

    /// A system-level failure unrelated to the input's format.
    #[error(transparent)]
    Fault(#[from] splitkit_core::Error),
}

impl DecodeError {
    /// Convenience constructor for [`DecodeError::Corrupt`].
    pub fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        DecodeError::Corrupt {
            offset,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`DecodeError::Mismatch`].
    pub fn mismatch(reason: impl Into<String>) -> Self {
        DecodeError::Mismatch(reason.into())
    }

    /// Whether this error means the input ran out rather than held bad data.
    pub fn is_truncation(&self) -> bool {
        matches!(self, DecodeError::Truncated { .. })
    }
}
