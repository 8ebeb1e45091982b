//! Location providers for Fydo.
//!
//! The platform location API is an external collaborator. This module
//! defines the seam and ships two providers: one that reports a fixed
//! coordinate and one that always fails with a chosen error.

pub mod failing;
pub mod fixed;
pub mod traits;

pub use failing::{FailingLocationProvider, SimulatedFailure};
pub use fixed::FixedLocationProvider;
pub use traits::{LocationProvider, LocationRequest};
