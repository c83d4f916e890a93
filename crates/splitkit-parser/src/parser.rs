//! The [`FormatParser`] trait defining the interface for split file decoding.

use splitkit_core::{ParseMode, ProgramId};

use crate::error::DecodeError;
use crate::types::ParsedRun;

/// How deeply a parser decodes segment detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    /// Totals, attempts, and program identity; may skip names and bests.
    Fast,
    /// Every segment field and every optional metadata field.
    Full,
}

impl From<ParseMode> for Depth {
    fn from(mode: ParseMode) -> Self {
        if mode.is_full_depth() {
            Depth::Full
        } else {
            Depth::Fast
        }
    }
}

/// A decoder for one timer program's split file layout.
///
/// Implementations must be safe to share across threads (`Send + Sync`) and
/// must not touch anything but the bytes they are given.
pub trait FormatParser: Send + Sync {
    /// The program whose files this parser understands.
    fn program(&self) -> ProgramId;

    /// Attempt to decode `bytes` as this parser's format.
    ///
    /// Returns `Ok(None)` when the bytes are not this format, including
    /// when they look like it but are damaged. Only faults (allocation
    /// failure and the like) are returned as errors.
    fn parse(&self, bytes: &[u8], depth: Depth) -> splitkit_core::Result<Option<ParsedRun>>;
}

/// Fold a format-internal decode outcome into the parser boundary contract.
///
/// Mismatch, truncation, and corruption all become `Ok(None)`; faults pass
/// through untouched.
pub(crate) fn settle(
    program: ProgramId,
    outcome: Result<ParsedRun, DecodeError>,
) -> splitkit_core::Result<Option<ParsedRun>> {
    match outcome {
        Ok(run) => Ok(Some(run)),
        Err(DecodeError::Fault(fault)) => Err(fault),
        Err(e) => {
            tracing::debug!(program = %program, reason = %e, "not a match");
            Ok(None)
        }
    }
}
