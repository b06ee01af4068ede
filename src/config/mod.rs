//! Configuration module for serial-framegrab.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `SERIAL_FRAMEGRAB_CONFIG` environment variable (explicit path)
//! 2. `./framegrab.toml` (current directory)
//! 3. `framegrab.toml` in the platform config directory
//!    (`~/.config/serial-framegrab/` on Linux)
//! 4. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! Any configuration value can be overridden via environment variables.
//! The pattern is: `SERIAL_FRAMEGRAB_<SECTION>_<KEY>`
//!
//! Examples:
//! - `SERIAL_FRAMEGRAB_SERIAL_PORT=/dev/ttyUSB0`
//! - `SERIAL_FRAMEGRAB_CAPTURE_HEIGHT=480`
//! - `SERIAL_FRAMEGRAB_OUTPUT_IMAGE_PATH=frame.png`
//!
//! # Example
//!
//! ```rust,ignore
//! use serial_framegrab::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! let config = loader.config();
//!
//! println!("Baud rate: {}", config.serial.baud_rate);
//! println!("Frame: {:?}", config.capture.dimensions());
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{CaptureConfig, Config, LogFormat, LoggingConfig, OutputConfig, SerialConfig};
