//! Provider that always fails.

use serde::{Deserialize, Serialize};

use crate::core::Coordinate;
use crate::error::LocationError;
use crate::location::{LocationProvider, LocationRequest};

/// Which failure to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulatedFailure {
    PermissionDenied,
    Timeout,
    Unsupported,
}

/// Fails every request with the configured error.
///
/// Used when no location source is available and to exercise the error
/// paths of callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailingLocationProvider {
    failure: SimulatedFailure,
    reason: String,
}

impl FailingLocationProvider {
    pub fn new(failure: SimulatedFailure) -> Self {
        Self {
            failure,
            reason: "simulated".to_string(),
        }
    }

    /// No location source at all.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self {
            failure: SimulatedFailure::Unsupported,
            reason: reason.into(),
        }
    }

    pub fn failure(&self) -> SimulatedFailure {
        self.failure
    }
}

impl LocationProvider for FailingLocationProvider {
    fn request_permission(&self) -> bool {
        self.failure != SimulatedFailure::PermissionDenied
    }

    fn current_coordinate(&self, request: &LocationRequest) -> Result<Coordinate, LocationError> {
        Err(match self.failure {
            SimulatedFailure::PermissionDenied => LocationError::PermissionDenied,
            SimulatedFailure::Timeout => LocationError::timeout(request.timeout),
            SimulatedFailure::Unsupported => LocationError::unsupported(self.reason.clone()),
        })
    }
}
