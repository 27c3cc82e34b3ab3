//! Engine and game configuration.
//!
//! Values come from a TOML file (every key optional) and may be overridden by
//! the caller afterwards. [`EngineConfig::validate`] is run on load.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for a game and its search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Scheduled moves per side before the game is scored.
    pub max_moves: u32,
    /// Default thinking time for a search, in milliseconds.
    pub time_limit_ms: u64,
    /// Share of the time limit after which no new work is started.
    pub time_fraction: f64,
    /// Deepest iteration of the iterative-deepening loop.
    pub max_depth: u32,
    /// Transposition table entries kept before the table is flushed.
    pub tt_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_moves: 6,
            time_limit_ms: 5000,
            time_fraction: 0.8,
            max_depth: 10,
            tt_capacity: 1 << 20,
        }
    }
}

impl EngineConfig {
    /// Default file name looked up in the working directory.
    pub const FILE_NAME: &'static str = "points-chess.toml";

    /// Loads `path`, falling back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file exists but cannot be read,
    /// [`ConfigError::Parse`] for malformed TOML, and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_moves == 0 {
            return Err(ConfigError::Invalid("max_moves must be at least 1".into()));
        }
        if !(self.time_fraction > 0.0 && self.time_fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "time_fraction must be in (0, 1], got {}",
                self.time_fraction
            )));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_moves, 6);
        assert_eq!(config.time_limit(), Duration::from_secs(5));
        assert_eq!(config.max_depth, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = EngineConfig::from_toml_str("max_moves = 8\ntime_limit_ms = 250\n").unwrap();
        assert_eq!(config.max_moves, 8);
        assert_eq!(config.time_limit_ms, 250);
        assert_eq!(config.time_fraction, 0.8);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            EngineConfig::from_toml_str("max_moves = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("time_fraction = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("max_depth = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_bad_toml_and_unknown_keys() {
        assert!(matches!(
            EngineConfig::from_toml_str("max_moves = \"six\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("depth = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = EngineConfig::load(Path::new("does/not/exist/points-chess.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
