//! Splitkit - speedrun split file detection and normalization
//!
//! This library crate exposes the CLI's building blocks for integration testing.

pub mod report;

use std::path::Path;

use anyhow::{Context, Result};
use splitkit_core::Config;
use splitkit_parser::SplitFile;

/// Open a split file from disk, honouring the configured size ceiling.
pub fn open_split_file(path: &Path, config: &Config) -> Result<SplitFile> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {:?}", path);
    }
    SplitFile::open(path, config.parse.max_file_size)
        .with_context(|| format!("failed to read {}", path.display()))
}
