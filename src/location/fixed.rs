//! Provider reporting a fixed coordinate.

use crate::core::Coordinate;
use crate::error::LocationError;
use crate::location::{LocationProvider, LocationRequest};

/// Reports the same coordinate on every request.
///
/// Backs the CLI's `--lat/--lon` arguments and most tests.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLocationProvider {
    coordinate: Coordinate,
    permission_granted: bool,
}

impl FixedLocationProvider {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            permission_granted: true,
        }
    }

    /// Same provider, but the user refuses location access.
    pub fn denied(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            permission_granted: false,
        }
    }
}

impl LocationProvider for FixedLocationProvider {
    fn request_permission(&self) -> bool {
        self.permission_granted
    }

    fn current_coordinate(&self, _request: &LocationRequest) -> Result<Coordinate, LocationError> {
        if !self.permission_granted {
            return Err(LocationError::PermissionDenied);
        }
        if !self.coordinate.is_valid() {
            return Err(LocationError::unsupported(format!(
                "provider produced an invalid coordinate ({})",
                self.coordinate
            )));
        }
        Ok(self.coordinate)
    }
}
