//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! All configuration sections are defined here with appropriate defaults.

use super::error::{ConfigError, ConfigResult};
use crate::capture::Dimensions;
use crate::discovery::Platform;
use crate::port::{PortConfiguration, DEFAULT_BAUD_RATE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial device configuration
    pub serial: SerialConfig,
    /// Frame geometry
    pub capture: CaptureConfig,
    /// Output artifacts
    pub output: OutputConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check every section for values the pipeline cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::validation("serial.baud_rate", "must be positive"));
        }
        if self.serial.poll_interval_ms == 0 {
            return Err(ConfigError::validation(
                "serial.poll_interval_ms",
                "must be positive",
            ));
        }
        if !self.serial.platform.trim().eq_ignore_ascii_case("auto") {
            self.serial.platform()?;
        }
        self.capture
            .dimensions()
            .validate()
            .map_err(|e| ConfigError::validation("capture", e.to_string()))?;
        if !(1..=4).contains(&self.capture.channels) {
            return Err(ConfigError::validation(
                "capture.channels",
                "must be between 1 and 4 to encode an image",
            ));
        }
        if self.output.json_path.as_os_str().is_empty() {
            return Err(ConfigError::validation("output.json_path", "must not be empty"));
        }
        if self.output.image_path.as_os_str().is_empty() {
            return Err(ConfigError::validation("output.image_path", "must not be empty"));
        }
        Ok(())
    }
}

/// Serial device configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Explicit device; skips discovery when set
    pub port: Option<String>,
    /// Baud rate the transmitter uses
    pub baud_rate: u32,
    /// How often a blocked read wakes up to check for cancellation
    pub poll_interval_ms: u64,
    /// Device namespace to scan: "auto", "linux", "macos" or "windows"
    pub platform: String,
    /// Port aliases for convenience
    #[serde(default)]
    pub port_aliases: HashMap<String, String>,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            poll_interval_ms: 100,
            platform: "auto".to_string(),
            port_aliases: HashMap::new(),
        }
    }
}

impl SerialConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn port_configuration(&self) -> PortConfiguration {
        PortConfiguration {
            baud_rate: self.baud_rate,
            poll_interval: self.poll_interval(),
        }
    }

    /// Resolve the configured platform family.
    pub fn platform(&self) -> ConfigResult<Platform> {
        Platform::from_setting(&self.platform)
            .map_err(|e| ConfigError::validation("serial.platform", e.to_string()))
    }

    /// Resolve a port name through aliases
    pub fn resolve_port(&self, name: &str) -> String {
        self.port_aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

/// Frame geometry section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let dims = Dimensions::DEFAULT;
        Self {
            height: dims.height,
            width: dims.width,
            channels: dims.channels,
        }
    }
}

impl CaptureConfig {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.height, self.width, self.channels)
    }
}

/// Output artifact section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Nested-array pixel dump
    pub json_path: PathBuf,
    /// PNG rendering of the same grid
    pub image_path: PathBuf,
    /// Open the image in the desktop viewer afterwards
    pub show: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: PathBuf::from("out.txt"),
            image_path: PathBuf::from("out.png"),
            show: false,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    #[default]
    Pretty,
    /// Compact format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}
