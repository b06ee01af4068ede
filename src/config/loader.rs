//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "SERIAL_FRAMEGRAB";

/// Config file name
const CONFIG_FILE_NAME: &str = "framegrab.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "SERIAL_FRAMEGRAB_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `SERIAL_FRAMEGRAB_CONFIG` environment variable (explicit path)
    /// 2. `./framegrab.toml` (current directory)
    /// 3. `framegrab.toml` in the platform config directory
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables can override any config file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut config = Config::default();
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: None,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(&self.config)?)
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. Platform config directory
    if let Some(app_config) = get_default_config_path() {
        if app_config.exists() {
            return Some(app_config);
        }
    }

    None
}

/// Get the default config directory for this application.
pub fn get_default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "serial-framegrab").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the default config file path.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

fn env_var(key: &str) -> Option<(String, String)> {
    let var = format!("{}_{}", ENV_PREFIX, key);
    std::env::var(&var).ok().map(|val| (var, val))
}

fn parse_env<T: std::str::FromStr>(var: &str, val: &str, what: &str) -> ConfigResult<T> {
    val.trim()
        .parse()
        .map_err(|_| ConfigError::env_parse(var, format!("Invalid {}", what)))
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `SERIAL_FRAMEGRAB_<SECTION>_<KEY>`
/// For example:
/// - `SERIAL_FRAMEGRAB_SERIAL_PORT=/dev/ttyUSB0`
/// - `SERIAL_FRAMEGRAB_SERIAL_BAUD_RATE=921600`
/// - `SERIAL_FRAMEGRAB_CAPTURE_WIDTH=320`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    // Serial overrides
    if let Some((_, val)) = env_var("SERIAL_PORT") {
        config.serial.port = Some(val);
    }
    if let Some((var, val)) = env_var("SERIAL_BAUD_RATE") {
        config.serial.baud_rate = parse_env(&var, &val, "baud rate")?;
    }
    if let Some((var, val)) = env_var("SERIAL_POLL_INTERVAL_MS") {
        config.serial.poll_interval_ms = parse_env(&var, &val, "poll interval")?;
    }
    if let Some((_, val)) = env_var("SERIAL_PLATFORM") {
        config.serial.platform = val;
    }

    // Capture overrides
    if let Some((var, val)) = env_var("CAPTURE_HEIGHT") {
        config.capture.height = parse_env(&var, &val, "height")?;
    }
    if let Some((var, val)) = env_var("CAPTURE_WIDTH") {
        config.capture.width = parse_env(&var, &val, "width")?;
    }
    if let Some((var, val)) = env_var("CAPTURE_CHANNELS") {
        config.capture.channels = parse_env(&var, &val, "channel count")?;
    }

    // Output overrides
    if let Some((_, val)) = env_var("OUTPUT_JSON_PATH") {
        config.output.json_path = PathBuf::from(val);
    }
    if let Some((_, val)) = env_var("OUTPUT_IMAGE_PATH") {
        config.output.image_path = PathBuf::from(val);
    }
    if let Some((_, val)) = env_var("OUTPUT_SHOW") {
        config.output.show = val.to_lowercase() == "true" || val == "1";
    }

    // Logging overrides
    if let Some((_, val)) = env_var("LOGGING_LEVEL") {
        config.logging.level = val;
    }
    if let Some((var, val)) = env_var("LOGGING_FORMAT") {
        config.logging.format = val
            .parse()
            .map_err(|e: String| ConfigError::env_parse(var, e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_default_loader() {
        let loader = ConfigLoader::with_defaults().unwrap();
        assert_eq!(loader.config().serial.baud_rate, 115200);
        assert!(loader.config_path.is_none());
    }

    #[test]
    #[serial]
    fn test_env_override() {
        env::set_var("SERIAL_FRAMEGRAB_SERIAL_BAUD_RATE", "921600");
        env::set_var("SERIAL_FRAMEGRAB_CAPTURE_WIDTH", "320");

        let loader = ConfigLoader::with_defaults().unwrap();
        assert_eq!(loader.config().serial.baud_rate, 921600);
        assert_eq!(loader.config().capture.width, 320);

        env::remove_var("SERIAL_FRAMEGRAB_SERIAL_BAUD_RATE");
        env::remove_var("SERIAL_FRAMEGRAB_CAPTURE_WIDTH");
    }

    #[test]
    #[serial]
    fn test_bad_env_value() {
        env::set_var("SERIAL_FRAMEGRAB_CAPTURE_HEIGHT", "tall");

        let result = ConfigLoader::with_defaults();
        assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));

        env::remove_var("SERIAL_FRAMEGRAB_CAPTURE_HEIGHT");
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("framegrab.toml");
        std::fs::write(
            &path,
            "[serial]\nport = \"/dev/ttyUSB3\"\n\n[output]\nimage_path = \"frame.png\"\n",
        )
        .unwrap();

        let loader = ConfigLoader::load_from(&path).unwrap();
        assert_eq!(loader.config().serial.port.as_deref(), Some("/dev/ttyUSB3"));
        assert_eq!(loader.config().output.image_path, PathBuf::from("frame.png"));
        assert_eq!(loader.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ConfigLoader::load_from("/nonexistent/framegrab.toml");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
