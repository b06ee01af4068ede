//! Unified application error type.
//!
//! Probe failures never reach this type; discovery absorbs them. Cancellation
//! during decoding becomes a partial result, and only a cancellation that
//! lands before decoding starts surfaces as [`AppError::Interrupted`].
//! Everything here terminates the run.

use crate::config::ConfigError;
use crate::port::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for pipeline operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// The host OS family has no known serial device namespace.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Probing left no usable serial device.
    #[error("No serial device found; connect the device and try again")]
    NoDevice,

    /// The selected device could not be opened for the capture session.
    #[error("Failed to open serial device '{device}': {source}")]
    Connection {
        device: String,
        #[source]
        source: PortError,
    },

    /// A read failed after the session was established.
    #[error("Read from '{device}' failed after {bytes_read} bytes: {source}")]
    Read {
        device: String,
        bytes_read: usize,
        #[source]
        source: PortError,
    },

    /// One of the output artifacts could not be written or read back.
    #[error("Failed to write '{path}': {message}")]
    Output { path: PathBuf, message: String },

    /// The capture geometry cannot be decoded or encoded.
    #[error("Invalid capture dimensions: {0}")]
    InvalidDimensions(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The operator interrupted the run before the capture started.
    #[error("Interrupted before capture started; no output written")]
    Interrupted,

    /// The worker running the blocking capture panicked or was aborted.
    #[error("Capture worker failed: {0}")]
    Task(String),
}

impl AppError {
    pub fn output(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Output {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Process exit code, distinct per failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoDevice => 2,
            Self::Connection { .. } => 3,
            Self::UnsupportedPlatform(_) => 4,
            Self::Read { .. } => 5,
            Self::Output { .. } => 6,
            Self::InvalidDimensions(_) | Self::Config(_) => 7,
            Self::Task(_) => 8,
            Self::Interrupted => 130,
        }
    }
}
