//! Failures while locating, parsing or checking the capture settings.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--config` named a file that is not there.
    #[error("Config file {0} does not exist")]
    NotFound(PathBuf),

    #[error("Cannot read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file is not valid TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Only reachable through `--dump-config`.
    #[error("Cannot render config as TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A setting parsed but cannot drive a capture (zero height, empty output path, ...).
    #[error("Setting '{key}' rejected: {message}")]
    ValidationError { key: String, message: String },

    /// A `SERIAL_FRAMEGRAB_*` override could not be parsed.
    #[error("Override {var} rejected: {message}")]
    EnvParseError { var: String, message: String },
}

impl ConfigError {
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn env_parse(var: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_setting() {
        let err = ConfigError::validation("capture.height", "must be positive");
        assert_eq!(
            err.to_string(),
            "Setting 'capture.height' rejected: must be positive"
        );

        let err = ConfigError::env_parse("SERIAL_FRAMEGRAB_SERIAL_BAUD_RATE", "Invalid baud rate");
        assert!(err.to_string().contains("SERIAL_FRAMEGRAB_SERIAL_BAUD_RATE"));
    }
}
