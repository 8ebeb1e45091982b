//! Retry-cycle location gate.
//!
//! The gate decides whether a device location is inside the service area and
//! advances the persisted attempt counter. Out-of-range attempts cycle
//! through five slots: the first three show the real "not operational"
//! outcome, the fourth and fifth fall back to placeholder shops so the list
//! screen can be exercised without an in-range device. An in-range fix always
//! resets the cycle.
//!
//! The gate is pure: persistence of the counter is the caller's job.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::geo::{great_circle_distance_meters, Coordinate};

/// Maximum distance from the service origin that counts as in range.
pub const SERVICE_RADIUS_METERS: f64 = 300.0;

/// Number of out-of-range attempts in one cycle.
pub const MAX_ATTEMPTS: u32 = 5;

/// First attempt of the cycle that shows placeholder shops.
pub const FIRST_DEMO_ATTEMPT: u32 = 4;

/// The registered shop location distances are measured against.
pub const SERVICE_ORIGIN: Coordinate = Coordinate::new(12.9716, 77.5946);

/// Durable key the attempt counter is stored under.
pub const RETRY_COUNTER_KEY: &str = "@fydo_retry_counter";

/// Number of consecutive out-of-range attempts in the current cycle.
///
/// Zero means no failed attempt since the last in-range fix. Values read from
/// storage are taken as-is; the next evaluation brings them back into
/// `0..=MAX_ATTEMPTS`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AttemptCounter(u32);

impl AttemptCounter {
    pub const ZERO: AttemptCounter = AttemptCounter(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Counter after one more out-of-range attempt.
    ///
    /// Wraps to 1 (never 0) once the cycle length is exceeded.
    pub fn after_miss(self) -> Self {
        let next = self.0.saturating_add(1);
        if next > MAX_ATTEMPTS {
            Self(1)
        } else {
            Self(next)
        }
    }

    /// Whether this slot of the cycle falls back to placeholder shops.
    pub fn is_demo_slot(self) -> bool {
        (FIRST_DEMO_ATTEMPT..=MAX_ATTEMPTS).contains(&self.0)
    }

    /// Whether the value is one the gate can produce.
    pub fn is_in_cycle(self) -> bool {
        self.0 <= MAX_ATTEMPTS
    }
}

impl std::fmt::Display for AttemptCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which outcome the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Inside the service area: show real shops.
    Serviceable,
    /// Outside the service area: show the rejection screen.
    NotServiceable,
    /// Outside the service area, but show placeholder shops anyway.
    DemoFallback,
}

impl GateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateMode::Serviceable => "serviceable",
            GateMode::NotServiceable => "not_serviceable",
            GateMode::DemoFallback => "demo_fallback",
        }
    }
}

/// Result of one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    /// Whether the shop list should be shown.
    ///
    /// True for `DemoFallback` even though the distance check failed.
    pub within_range: bool,
    /// Measured distance to the service origin, in whole meters.
    pub distance_meters: f64,
    pub mode: GateMode,
}

impl GateDecision {
    /// Whether the decision rests on placeholder data.
    pub fn is_demo(&self) -> bool {
        self.mode == GateMode::DemoFallback
    }
}

/// What the next out-of-range attempt will show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    RealCheck,
    DemoShops,
    CycleReset,
}

impl NextStep {
    pub fn describe(&self) -> &'static str {
        match self {
            NextStep::RealCheck => "real location check",
            NextStep::DemoShops => "demo shops",
            NextStep::CycleReset => "reset counter",
        }
    }
}

/// Diagnostics for the upcoming attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptPreview {
    /// One-based number of the upcoming attempt.
    pub attempt: u32,
    pub next: NextStep,
}

/// Proximity gate with the retry cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryCycleLocationGate {
    origin: Coordinate,
    radius_meters: f64,
    demo_fallback: bool,
}

impl Default for RetryCycleLocationGate {
    fn default() -> Self {
        Self::new(SERVICE_ORIGIN)
    }
}

impl RetryCycleLocationGate {
    /// Create a gate around `origin` with the standard radius and demo slots.
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            radius_meters: SERVICE_RADIUS_METERS,
            demo_fallback: true,
        }
    }

    /// Create a gate from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            origin: config.origin.coordinate(),
            radius_meters: config.gate.radius_meters,
            demo_fallback: config.gate.demo_fallback,
        }
    }

    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    /// Enable or disable the placeholder-shop slots of the cycle.
    ///
    /// When disabled those slots report `NotServiceable`; the counter still
    /// cycles the same way.
    pub fn with_demo_fallback(mut self, enabled: bool) -> Self {
        self.demo_fallback = enabled;
        self
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn demo_fallback(&self) -> bool {
        self.demo_fallback
    }

    /// Evaluate one attempt from the device location.
    pub fn evaluate(
        &self,
        current: &Coordinate,
        prior: AttemptCounter,
    ) -> (GateDecision, AttemptCounter) {
        let distance = great_circle_distance_meters(current, &self.origin);
        self.decide(distance, prior)
    }

    /// Evaluate one attempt from an already measured distance.
    pub fn decide(
        &self,
        distance_meters: f64,
        prior: AttemptCounter,
    ) -> (GateDecision, AttemptCounter) {
        if distance_meters <= self.radius_meters {
            let decision = GateDecision {
                within_range: true,
                distance_meters,
                mode: GateMode::Serviceable,
            };
            return (decision, AttemptCounter::ZERO);
        }

        let counter = prior.after_miss();
        let decision = if self.demo_fallback && counter.is_demo_slot() {
            GateDecision {
                within_range: true,
                distance_meters,
                mode: GateMode::DemoFallback,
            }
        } else {
            GateDecision {
                within_range: false,
                distance_meters,
                mode: GateMode::NotServiceable,
            }
        };

        (decision, counter)
    }

    /// Describe what the next out-of-range attempt will do.
    ///
    /// An in-range fix is always serviceable regardless of the preview.
    pub fn preview(&self, counter: AttemptCounter) -> AttemptPreview {
        let value = counter.value();
        let next = if value < FIRST_DEMO_ATTEMPT - 1 {
            NextStep::RealCheck
        } else if value < MAX_ATTEMPTS {
            if self.demo_fallback {
                NextStep::DemoShops
            } else {
                NextStep::RealCheck
            }
        } else {
            NextStep::CycleReset
        };

        AttemptPreview {
            attempt: value.saturating_add(1),
            next,
        }
    }
}
