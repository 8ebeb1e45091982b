//! Location provider traits.

use std::sync::Arc;
use std::time::Duration;

use crate::config::LocationConfig;
use crate::core::Coordinate;
use crate::error::LocationError;

/// Parameters for one location fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRequest {
    /// Give up after this long.
    pub timeout: Duration,
    /// Ask for a GPS-grade fix rather than a coarse one.
    pub high_accuracy: bool,
    /// Accept a cached fix no older than this.
    pub maximum_age: Duration,
}

impl LocationRequest {
    pub fn from_config(config: &LocationConfig) -> Self {
        Self {
            timeout: config.timeout(),
            high_accuracy: config.high_accuracy,
            maximum_age: Duration::from_millis(config.maximum_age_ms),
        }
    }
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self::from_config(&LocationConfig::default())
    }
}

/// Source of the device's current coordinate.
///
/// `current_coordinate` may block for up to `request.timeout` before failing
/// with [`LocationError::Timeout`].
pub trait LocationProvider: Send + Sync {
    /// Ask the user for foreground location access.
    ///
    /// Returns whether access was granted. Errors while asking count as a
    /// refusal.
    fn request_permission(&self) -> bool;

    /// Acquire the current coordinate.
    fn current_coordinate(&self, request: &LocationRequest) -> Result<Coordinate, LocationError>;
}

impl<T: LocationProvider + ?Sized> LocationProvider for Arc<T> {
    fn request_permission(&self) -> bool {
        (**self).request_permission()
    }

    fn current_coordinate(&self, request: &LocationRequest) -> Result<Coordinate, LocationError> {
        (**self).current_coordinate(request)
    }
}

impl<T: LocationProvider + ?Sized> LocationProvider for Box<T> {
    fn request_permission(&self) -> bool {
        (**self).request_permission()
    }

    fn current_coordinate(&self, request: &LocationRequest) -> Result<Coordinate, LocationError> {
        (**self).current_coordinate(request)
    }
}
