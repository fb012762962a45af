//! Calculator settings and where they come from.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Default history file name.
pub const DEFAULT_HISTORY_FILE: &str = "calculation_history.csv";

/// Largest accepted `decimal_places`; an `f64` carries at most 17
/// significant decimal digits.
pub const MAX_DECIMAL_PLACES: usize = 17;

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting could not be parsed.
    #[error("Invalid configuration value for {key}: '{value}'")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
    /// `max_history` below one.
    #[error("MAX_HISTORY must be at least 1")]
    MaxHistoryTooSmall,
    /// `decimal_places` beyond [`MAX_DECIMAL_PLACES`].
    #[error("DECIMAL_PLACES must be at most {MAX_DECIMAL_PLACES}")]
    DecimalPlacesTooLarge,
    /// Blank history path.
    #[error("HISTORY_FILE cannot be empty")]
    EmptyHistoryFile,
    /// Config file unreadable.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Config file is not valid JSON for this schema.
    #[error("cannot parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings consumed by the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Where history is persisted.
    pub history_file: PathBuf,
    /// Persist after every calculation.
    pub auto_save: bool,
    /// Advisory history size bound; not enforced by eviction.
    pub max_history: usize,
    /// Rounding applied when displaying results.
    pub decimal_places: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            auto_save: true,
            max_history: 1000,
            decimal_places: 2,
        }
    }
}

impl CalculatorConfig {
    /// Reads `HISTORY_FILE`, `AUTO_SAVE`, `MAX_HISTORY` and `DECIMAL_PLACES`
    /// from `./.env`, falling back to the process environment for keys the
    /// file does not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_file_over(".env", |key| std::env::var(key).ok())
    }

    /// Settings from the dotenv file at `path`, with `fallback` consulted
    /// for keys the file lacks. The process environment is never modified.
    ///
    /// A missing file means every key comes from `fallback`. Unparsable
    /// lines are logged and skipped; the keys before them still apply.
    pub fn from_env_file_over<F>(path: impl AsRef<Path>, fallback: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = read_dotenv(path.as_ref());
        Self::from_lookup(|key| file.get(key).cloned().or_else(|| fallback(key)))
    }

    /// Same parsing as [`Self::from_env`] over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            history_file: lookup("HISTORY_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_file),
            auto_save: lookup("AUTO_SAVE")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(defaults.auto_save),
            max_history: parse_setting(&lookup, "MAX_HISTORY")?.unwrap_or(defaults.max_history),
            decimal_places: parse_setting(&lookup, "DECIMAL_PLACES")?
                .unwrap_or(defaults.decimal_places),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON config file; absent keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history < 1 {
            return Err(ConfigError::MaxHistoryTooSmall);
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::DecimalPlacesTooLarge);
        }
        if self.history_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyHistoryFile);
        }
        Ok(())
    }

    /// Unwraps `result`, falling back to defaults on error.
    pub fn load_or_default(result: Result<Self, ConfigError>) -> Self {
        result.unwrap_or_else(|err| {
            warn!(error = %err, "invalid configuration, using defaults");
            Self::default()
        })
    }
}

fn parse_setting<F>(lookup: &F, key: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue { key, value: raw })
        })
        .transpose()
}

fn read_dotenv(path: &Path) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    let iter = match dotenv::from_filename_iter(path) {
        Ok(iter) => iter,
        Err(dotenv::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => return vars,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot read dotenv file");
            return vars;
        }
    };
    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(err) => warn!(path = %path.display(), error = %err, "skipping dotenv line"),
        }
    }
    vars
}
