//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is honoured by the binary
//! through `dotenvy`) and may be overridden by command-line flags.

use std::path::PathBuf;

use crate::batch::{DEFAULT_INPUT_COLUMN, DEFAULT_OUTPUT_COLUMN};
use crate::error::ConfigError;
use crate::pipeline::SentinelStyle;

/// Default location of the slang dictionary resource.
pub const DEFAULT_DICTIONARY_PATH: &str = "data/slangword/combined_slang_words.txt";

pub const ENV_DICTIONARY: &str = "SECUREDATA_DICTIONARY";
pub const ENV_INPUT_COLUMN: &str = "SECUREDATA_INPUT_COLUMN";
pub const ENV_OUTPUT_COLUMN: &str = "SECUREDATA_OUTPUT_COLUMN";
pub const ENV_SENTINEL_STYLE: &str = "SECUREDATA_SENTINEL_STYLE";
pub const ENV_LOG_JSON: &str = "SECUREDATA_LOG_JSON";

/// Configuration for the cleaning tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the slang dictionary resource.
    pub dictionary_path: PathBuf,
    /// Batch column holding raw text.
    pub input_column: String,
    /// Batch column receiving cleaned text.
    pub output_column: String,
    /// How sentinel tags are rendered.
    pub sentinel_style: SentinelStyle,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary_path: PathBuf::from(DEFAULT_DICTIONARY_PATH),
            input_column: DEFAULT_INPUT_COLUMN.to_string(),
            output_column: DEFAULT_OUTPUT_COLUMN.to_string(),
            sentinel_style: SentinelStyle::Plain,
            log_json: false,
        }
    }
}

impl Config {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DICTIONARY) {
            config.dictionary_path = PathBuf::from(path);
        }
        if let Some(column) = get(ENV_INPUT_COLUMN) {
            config.input_column = column;
        }
        if let Some(column) = get(ENV_OUTPUT_COLUMN) {
            config.output_column = column;
        }
        if let Some(style) = get(ENV_SENTINEL_STYLE) {
            config.sentinel_style = style.parse().map_err(|message| ConfigError::InvalidValue {
                key: ENV_SENTINEL_STYLE.to_string(),
                message,
            })?;
        }
        if let Some(flag) = get(ENV_LOG_JSON) {
            config.log_json = parse_bool(ENV_LOG_JSON, &flag)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that would make a batch ambiguous.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_column == self.output_column {
            return Err(ConfigError::InvalidValue {
                key: ENV_OUTPUT_COLUMN.to_string(),
                message: format!(
                    "output column must differ from input column '{}'",
                    self.input_column
                ),
            });
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}
