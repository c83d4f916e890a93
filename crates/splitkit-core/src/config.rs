//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON. Every section
//! defaults sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::program::{ParseMode, ProgramId};
use crate::Error;

/// Default ceiling for raw split files (25 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load the config at `path`, or defaults when there is none.
    ///
    /// A file that cannot be read or decoded is logged and replaced by
    /// defaults; the CLI must still be able to parse splits without it.
    /// Warnings from [`Config::validate`] are logged for a loaded file.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        let loaded = std::fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|contents| Self::from_json(&contents));
        match loaded {
            Ok(config) => {
                for warning in config.validate() {
                    tracing::warn!(path = %path.display(), "{warning}");
                }
                config
            }
            Err(Error::Io { source }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no splitkit config; using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring splitkit config");
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.parse.max_file_size == 0 {
            warnings.push("parse.max_file_size is 0; every file will be rejected".into());
        }

        if self.parse.default_mode == ParseMode::Convert {
            warnings.push(
                "parse.default_mode is 'convert'; results will never be handed to persistence"
                    .into(),
            );
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Parsing behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Mode used when the caller does not ask for one.
    pub default_mode: ParseMode,
    /// Skip detection and try only this program.
    pub forced_program: Option<ProgramId>,
    /// Largest raw file accepted, in bytes.
    pub max_file_size: u64,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            default_mode: ParseMode::Fast,
            forced_program: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Output rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_json_is_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.parse.default_mode, ParseMode::Fast);
        assert_eq!(config.parse.forced_program, None);
        assert_eq!(config.parse.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(config.output.pretty_json);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config =
            Config::from_json(r#"{"parse": {"forced_program": "livesplit"}}"#).unwrap();
        assert_eq!(config.parse.forced_program, Some(ProgramId::LiveSplit));
        assert_eq!(config.parse.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn invalid_json_is_validation_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn unknown_program_rejected() {
        assert!(Config::from_json(r#"{"parse": {"forced_program": "faceit"}}"#).is_err());
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(Some(&dir.path().join("absent.json")));
        assert_eq!(config.parse.default_mode, ParseMode::Fast);
    }

    #[test]
    fn load_unparseable_file_uses_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"parse": 3}}"#).unwrap();
        let config = Config::load_or_default(Some(tmp.path()));
        assert_eq!(config.parse.default_mode, ParseMode::Fast);
        assert!(config.output.pretty_json);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"parse": {{"default_mode": "full"}}, "output": {{"pretty_json": false}}}}"#)
            .unwrap();
        let config = Config::load_or_default(Some(file.path()));
        assert_eq!(config.parse.default_mode, ParseMode::Full);
        assert!(!config.output.pretty_json);
    }

    #[test]
    fn validate_flags_zero_ceiling_and_convert_default() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());

        config.parse.max_file_size = 0;
        config.parse.default_mode = ParseMode::Convert;
        let warnings = config.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("max_file_size"));
    }
}
