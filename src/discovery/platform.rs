//! Per-OS serial device namespaces.

use super::CandidateSource;
use crate::error::{AppError, AppResult};
use crate::port::DeviceHandle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Highest COM port number tried on Windows.
const MAX_COM_PORT: u16 = 256;

/// Host OS family, which decides where serial devices live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// `COM1` through `COM256`.
    Windows,
    /// `/dev/tty[A-Za-z]*`, cygwin included.
    Linux,
    /// `/dev/tty.*`.
    Macos,
}

impl Platform {
    /// The family of the running host.
    pub fn host() -> AppResult<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value; unknown families are an error, never empty.
    pub fn from_os(os: &str) -> AppResult<Self> {
        match os {
            "windows" => Ok(Self::Windows),
            "linux" | "cygwin" => Ok(Self::Linux),
            "macos" => Ok(Self::Macos),
            other => Err(AppError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Parse a configured platform name, `auto` meaning the host.
    pub fn from_setting(setting: &str) -> AppResult<Self> {
        match setting.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Self::host(),
            "darwin" => Ok(Self::Macos),
            "win" | "win32" => Ok(Self::Windows),
            other => Self::from_os(other),
        }
    }

    fn matches_device_name(&self, name: &str) -> bool {
        match self {
            Self::Windows => false,
            Self::Linux => name
                .strip_prefix("tty")
                .and_then(|rest| rest.chars().next())
                .is_some_and(|c| c.is_ascii_alphabetic()),
            Self::Macos => name.starts_with("tty."),
        }
    }
}

/// Candidate generator for one platform family.
///
/// Unix families scan `dev_dir` (normally `/dev`); Windows ignores it.
#[derive(Debug, Clone)]
pub struct PlatformScan {
    platform: Platform,
    dev_dir: PathBuf,
}

impl PlatformScan {
    pub fn new(platform: Platform) -> Self {
        Self::with_dev_dir(platform, "/dev")
    }

    pub fn with_dev_dir(platform: Platform, dev_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            dev_dir: dev_dir.into(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn scan_dir(&self, dir: &Path) -> Vec<DeviceHandle> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| self.platform.matches_device_name(name))
            .collect();
        names.sort();

        names
            .into_iter()
            .map(|name| DeviceHandle::new(dir.join(name).to_string_lossy().into_owned()))
            .collect()
    }
}

impl CandidateSource for PlatformScan {
    fn candidates(&self) -> Vec<DeviceHandle> {
        match self.platform {
            Platform::Windows => (1..=MAX_COM_PORT)
                .map(|n| DeviceHandle::new(format!("COM{n}")))
                .collect(),
            Platform::Linux | Platform::Macos => self.scan_dir(&self.dev_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;

    fn touch_all(dir: &Path, names: &[&str]) {
        for name in names {
            File::create(dir.join(name)).unwrap();
        }
    }

    #[test]
    fn test_from_os() {
        assert_eq!(Platform::from_os("windows").unwrap(), Platform::Windows);
        assert_eq!(Platform::from_os("linux").unwrap(), Platform::Linux);
        assert_eq!(Platform::from_os("cygwin").unwrap(), Platform::Linux);
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::Macos);
        assert!(matches!(
            Platform::from_os("solaris"),
            Err(AppError::UnsupportedPlatform(os)) if os == "solaris"
        ));
    }

    #[test]
    fn test_from_setting() {
        assert_eq!(Platform::from_setting("Darwin").unwrap(), Platform::Macos);
        assert_eq!(Platform::from_setting(" linux ").unwrap(), Platform::Linux);
        assert!(Platform::from_setting("amiga").is_err());
    }

    #[test]
    fn test_windows_namespace() {
        let candidates = PlatformScan::new(Platform::Windows).candidates();
        assert_eq!(candidates.len(), 256);
        assert_eq!(candidates[0].as_str(), "COM1");
        assert_eq!(candidates[255].as_str(), "COM256");
    }

    #[test]
    fn test_linux_namespace_excludes_bare_tty() {
        let dir = tempfile::tempdir().unwrap();
        touch_all(
            dir.path(),
            &["ttyUSB0", "tty", "tty0", "ttyS1", "ttyACM0", "null", "tty.usbserial"],
        );

        let names: Vec<String> = PlatformScan::with_dev_dir(Platform::Linux, dir.path())
            .candidates()
            .into_iter()
            .map(|h| {
                Path::new(h.as_str())
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        assert_eq!(names, vec!["ttyACM0", "ttyS1", "ttyUSB0"]);
    }

    #[test]
    fn test_macos_namespace() {
        let dir = tempfile::tempdir().unwrap();
        touch_all(dir.path(), &["tty.usbserial-1410", "ttys000", "cu.usbserial-1410"]);

        let candidates = PlatformScan::with_dev_dir(Platform::Macos, dir.path()).candidates();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].as_str().ends_with("tty.usbserial-1410"));
    }

    #[test]
    fn test_missing_dev_dir_yields_nothing() {
        let scan = PlatformScan::with_dev_dir(Platform::Linux, "/nonexistent/dev/dir");
        assert!(scan.candidates().is_empty());
    }
}
