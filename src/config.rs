//! Startup configuration: log file prefix and target directory.
//!
//! Loaded from an optional TOML file and overridden by command-line flags:
//!
//! ```toml
//! prefix = "server"
//! directory = "/var/log/server"
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Characters that may not appear in a log file name prefix.
pub const ILLEGAL_PREFIX_CHARACTERS: &str = "/,|<>:#$%{}()[]'\"^!?+* ";

/// Where and under what name the log file is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// File name prefix; validated by [`validate_prefix`].
    pub prefix: String,
    /// Directory the log file is created in. Must already exist.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            prefix: "activelog".to_string(),
            directory: default_directory(),
        }
    }
}

impl LogConfig {
    /// Create a configuration from its parts.
    #[must_use]
    pub fn new(prefix: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            directory: directory.into(),
        }
    }

    /// Read a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Check the prefix and return the form used in the file name.
    ///
    /// # Errors
    ///
    /// See [`validate_prefix`].
    pub fn validate(&self) -> Result<String, ConfigError> {
        validate_prefix(&self.prefix)
    }
}

/// Validate a log file name prefix.
///
/// Path separators are removed first; what remains must be non-empty and
/// free of [`ILLEGAL_PREFIX_CHARACTERS`]. Returns the cleaned prefix.
///
/// # Errors
///
/// Returns [`ConfigError::IllegalCharacter`] or [`ConfigError::EmptyPrefix`].
pub fn validate_prefix(prefix: &str) -> Result<String, ConfigError> {
    let cleaned: String = prefix.chars().filter(|c| !matches!(c, '/' | '\\')).collect();
    if let Some(character) = cleaned.chars().find(|c| ILLEGAL_PREFIX_CHARACTERS.contains(*c)) {
        return Err(ConfigError::IllegalCharacter {
            character,
            prefix: prefix.to_string(),
        });
    }
    if cleaned.is_empty() {
        return Err(ConfigError::EmptyPrefix);
    }
    Ok(cleaned)
}
