//! Error types for Fydo.
//!
//! Location failures stop an attempt before the gate runs and are reported to
//! the user. Counter store failures are never fatal: reads fall back to a zero
//! counter and writes are logged while the session keeps the advanced value.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::Platform;

/// Failure to obtain the current coordinate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    /// The user refused (or the platform revoked) location access.
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider did not produce a fix in time.
    #[error("location provider timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    /// No location source exists on this platform.
    #[error("location unsupported: {reason}")]
    Unsupported { reason: String },
}

impl LocationError {
    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "permission_denied",
            LocationError::Timeout { .. } => "provider_timeout",
            LocationError::Unsupported { .. } => "provider_unsupported",
        }
    }

    /// Message to show the user for this failure on the given platform.
    pub fn user_message(&self, platform: Platform) -> String {
        match (self, platform) {
            (LocationError::Unsupported { .. }, Platform::Web) => {
                "Geolocation is not supported by this browser.".to_string()
            }
            (LocationError::Unsupported { .. }, Platform::Native) => {
                "Location services are not available on this device.".to_string()
            }
            (_, Platform::Web) => "Unable to get your location. Please ensure location \
                services are enabled in your browser and try again."
                .to_string(),
            (_, Platform::Native) => {
                "Unable to get your location. Please check your permissions and try again."
                    .to_string()
            }
        }
    }
}

/// The main error type for Fydo operations.
#[derive(Error, Debug)]
pub enum FydoError {
    /// I/O errors from the counter or config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The persisted counter could not be read.
    #[error("failed to read persisted value '{key}': {message}")]
    StoreRead { key: String, message: String },

    /// The persisted counter could not be written.
    #[error("failed to write persisted value '{key}': {message}")]
    StoreWrite { key: String, message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Acquiring the current coordinate failed.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// The screen was dismissed while the attempt was in flight.
    #[error("attempt discarded: screen dismissed")]
    Dismissed,
}

/// A specialized Result type for Fydo operations.
pub type Result<T> = std::result::Result<T, FydoError>;

impl FydoError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn store_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreRead {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn store_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The location failure behind this error, if any.
    pub fn as_location(&self) -> Option<&LocationError> {
        match self {
            FydoError::Location(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for FydoError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

/// Fail-open handling for recoverable errors.
///
/// Logs the error as a warning and substitutes a fallback value.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the `fydo` binary.
pub mod exit_codes {
    /// The attempt ran to a gate decision (any mode).
    pub const SUCCESS: i32 = 0;

    /// The location could not be acquired or the attempt was discarded.
    pub const LOCATION_FAILED: i32 = 1;

    /// Bad arguments or configuration.
    pub const USAGE: i32 = 2;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
