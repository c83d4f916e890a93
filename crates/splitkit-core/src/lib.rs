//! splitkit-core: shared program identifiers, errors, and configuration.
//!
//! This crate is the foundational dependency for the other splitkit crates,
//! providing the closed [`ProgramId`] enumeration of supported timer
//! programs, the fault-level [`Error`] type, and application configuration.

pub mod config;
pub mod error;
pub mod program;

// Re-export the most commonly used items at the crate root.
pub use config::{Config, OutputConfig, ParseConfig};
pub use error::{Error, Result};
pub use program::{ParseMode, ProgramId};
