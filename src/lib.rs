//! Fydo - nearby shops gate
//!
//! Decides whether a device location is inside the Fydo service area, and
//! keeps a persisted retry counter that cycles out-of-range attempts between
//! a real rejection and a demo shop list.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod location;
pub mod storage;

pub use config::{Config, Platform};
pub use core::{
    demo_shops, great_circle_distance_meters, real_shops, AttemptCounter, AttemptPreview,
    Coordinate, Dismissal, FindOutcome, GateDecision, GateMode, NextStep,
    RetryCycleLocationGate, ShopFinder, ShopListing, ShopView, RETRY_COUNTER_KEY,
    SERVICE_ORIGIN, SERVICE_RADIUS_METERS,
};
pub use error::{FailOpen, FydoError, LocationError, Result};
pub use location::{
    FailingLocationProvider, FixedLocationProvider, LocationProvider, LocationRequest,
    SimulatedFailure,
};
pub use storage::{CounterStore, FileCounterStore, MemoryCounterStore};

// CLI commands
pub use cli::{FindCommand, InitCommand, ShopsCommand, StatusCommand};
