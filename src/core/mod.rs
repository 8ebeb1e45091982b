//! Core types and logic for Fydo.
//!
//! This module contains the proximity gate and its retry cycle, coordinate
//! math, the shop catalog, and the attempt flow that ties them together.

pub mod catalog;
pub mod finder;
pub mod gate;
pub mod geo;

pub use catalog::{demo_shops, real_shops, ShopListing, ShopView};
pub use finder::{Dismissal, FindOutcome, ShopFinder};
pub use gate::{
    AttemptCounter, AttemptPreview, GateDecision, GateMode, NextStep, RetryCycleLocationGate,
    MAX_ATTEMPTS, RETRY_COUNTER_KEY, SERVICE_ORIGIN, SERVICE_RADIUS_METERS,
};
pub use geo::{great_circle_distance_meters, Coordinate};
