//! One "find shops" attempt, end to end.
//!
//! [`ShopFinder`] wires a [`LocationProvider`], a [`CounterStore`] and the
//! [`RetryCycleLocationGate`] together. Each call to [`ShopFinder::find`] is
//! one user tap: acquire a fix, evaluate the gate, persist the counter.
//! Location failures and dismissals leave the counter untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::core::catalog::{ShopListing, ShopView};
use crate::core::gate::{
    AttemptCounter, AttemptPreview, GateDecision, RetryCycleLocationGate, RETRY_COUNTER_KEY,
};
use crate::core::Coordinate;
use crate::error::{FailOpen, FydoError, LocationError, Result};
use crate::location::{LocationProvider, LocationRequest};
use crate::storage::CounterStore;

/// Signals that the screen which started an attempt went away.
///
/// Clones share the flag, so the presentation layer keeps one handle and
/// passes another to [`ShopFinder::find`].
#[derive(Debug, Clone, Default)]
pub struct Dismissal(Arc<AtomicBool>);

impl Dismissal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dismiss(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_dismissed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a completed attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindOutcome {
    /// Where the device was.
    pub location: Coordinate,
    pub decision: GateDecision,
    /// Counter before this attempt.
    pub prior: AttemptCounter,
    /// Counter after this attempt.
    pub counter: AttemptCounter,
    pub view: ShopView,
    pub shops: Vec<ShopListing>,
    /// Whether the new counter reached durable storage.
    pub persisted: bool,
}

/// Runs find-shops attempts against a provider and a counter store.
pub struct ShopFinder<S: CounterStore, L: LocationProvider> {
    store: S,
    provider: L,
    gate: RetryCycleLocationGate,
    request: LocationRequest,
    /// Session copy of the counter, loaded on first use.
    counter: Option<AttemptCounter>,
}

impl<S: CounterStore, L: LocationProvider> ShopFinder<S, L> {
    /// Create a finder with the default gate and request parameters.
    pub fn new(store: S, provider: L) -> Self {
        Self {
            store,
            provider,
            gate: RetryCycleLocationGate::default(),
            request: LocationRequest::default(),
            counter: None,
        }
    }

    /// Create a finder configured from `config`.
    pub fn from_config(store: S, provider: L, config: &Config) -> Self {
        Self {
            store,
            provider,
            gate: RetryCycleLocationGate::from_config(config),
            request: LocationRequest::from_config(&config.location),
            counter: None,
        }
    }

    /// Current session counter.
    ///
    /// The first call reads the store; an unreadable store counts as zero.
    pub fn counter(&mut self) -> AttemptCounter {
        if let Some(counter) = self.counter {
            return counter;
        }

        let value = self
            .store
            .read_or_zero(RETRY_COUNTER_KEY)
            .fail_open_default("loading retry counter");
        let counter = AttemptCounter::new(value);
        if !counter.is_in_cycle() {
            tracing::warn!(value, "stored retry counter outside the cycle");
        }
        tracing::debug!(counter = value, "loaded retry counter");

        self.counter = Some(counter);
        counter
    }

    /// Diagnostics for the next attempt.
    pub fn attempt_preview(&mut self) -> AttemptPreview {
        let counter = self.counter();
        self.gate.preview(counter)
    }

    /// Run one attempt.
    ///
    /// Fails with [`FydoError::Location`] when permission is refused or no
    /// fix arrives, and with [`FydoError::Dismissed`] when `dismissal` fired
    /// before the fix came back. Neither changes the counter.
    pub fn find(&mut self, dismissal: &Dismissal) -> Result<FindOutcome> {
        let prior = self.counter();
        tracing::debug!(attempt = prior.value().saturating_add(1), "finding shops");

        if dismissal.is_dismissed() {
            return Err(FydoError::Dismissed);
        }

        if !self.provider.request_permission() {
            tracing::warn!("location permission denied");
            return Err(LocationError::PermissionDenied.into());
        }

        let location = self
            .provider
            .current_coordinate(&self.request)
            .inspect_err(|e| tracing::warn!(error = %e, "could not acquire location"))?;

        if dismissal.is_dismissed() {
            tracing::debug!("screen dismissed during location fix, discarding result");
            return Err(FydoError::Dismissed);
        }

        let (decision, counter) = self.gate.evaluate(&location, prior);
        self.counter = Some(counter);

        let persisted = self
            .store
            .write(RETRY_COUNTER_KEY, counter.value())
            .map(|()| true)
            .fail_open_with("persisting retry counter", false);

        tracing::info!(
            mode = decision.mode.as_str(),
            distance_meters = decision.distance_meters,
            prior = prior.value(),
            counter = counter.value(),
            "gate evaluated"
        );

        let view = ShopView::for_decision(&decision);
        Ok(FindOutcome {
            location,
            decision,
            prior,
            counter,
            view,
            shops: view.shops(),
            persisted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gate::{GateMode, SERVICE_ORIGIN};
    use crate::location::{FailingLocationProvider, FixedLocationProvider, SimulatedFailure};
    use crate::storage::MemoryCounterStore;

    /// About 5.5 km north of the service origin.
    const FAR_AWAY: Coordinate = Coordinate::new(13.0216, 77.5946);

    fn store_with(value: u32) -> Arc<MemoryCounterStore> {
        Arc::new(MemoryCounterStore::with_value(RETRY_COUNTER_KEY, value))
    }

    fn stored(store: &MemoryCounterStore) -> Option<u32> {
        store.read(RETRY_COUNTER_KEY).unwrap()
    }

    /// Provider that dismisses the screen while "acquiring" the fix.
    struct DismissingProvider {
        dismissal: Dismissal,
        coordinate: Coordinate,
    }

    impl LocationProvider for DismissingProvider {
        fn request_permission(&self) -> bool {
            true
        }

        fn current_coordinate(
            &self,
            _request: &LocationRequest,
        ) -> std::result::Result<Coordinate, LocationError> {
            self.dismissal.dismiss();
            Ok(self.coordinate)
        }
    }

    #[test]
    fn test_in_range_resets_counter() {
        let store = store_with(3);
        let mut finder = ShopFinder::new(
            store.clone(),
            FixedLocationProvider::new(SERVICE_ORIGIN),
        );

        let outcome = finder.find(&Dismissal::new()).unwrap();

        assert_eq!(outcome.decision.mode, GateMode::Serviceable);
        assert_eq!(outcome.prior.value(), 3);
        assert_eq!(outcome.counter, AttemptCounter::ZERO);
        assert_eq!(outcome.view, ShopView::NearbyShops { demo: false });
        assert_eq!(outcome.shops.len(), 4);
        assert!(outcome.persisted);
        assert_eq!(stored(&store), Some(0));
    }

    #[test]
    fn test_out_of_range_cycle_is_persisted() {
        let store = Arc::new(MemoryCounterStore::new());
        let mut finder = ShopFinder::new(store.clone(), FixedLocationProvider::new(FAR_AWAY));
        let dismissal = Dismissal::new();

        let mut views = Vec::new();
        for _ in 0..6 {
            let outcome = finder.find(&dismissal).unwrap();
            assert_eq!(stored(&store), Some(outcome.counter.value()));
            views.push(outcome.view);
        }

        assert_eq!(
            views,
            vec![
                ShopView::NotOperational,
                ShopView::NotOperational,
                ShopView::NotOperational,
                ShopView::NearbyShops { demo: true },
                ShopView::NearbyShops { demo: true },
                ShopView::NotOperational,
            ]
        );
        assert_eq!(stored(&store), Some(1));
    }

    #[test]
    fn test_demo_outcome_lists_placeholder_shops() {
        let store = store_with(3);
        let mut finder = ShopFinder::new(store, FixedLocationProvider::new(FAR_AWAY));

        let outcome = finder.find(&Dismissal::new()).unwrap();

        assert!(outcome.decision.within_range);
        assert!(outcome.decision.is_demo());
        assert_eq!(outcome.shops[0].name, "Fydo Test Store 1");
    }

    #[test]
    fn test_permission_denied_leaves_counter() {
        let store = store_with(2);
        let mut finder = ShopFinder::new(
            store.clone(),
            FixedLocationProvider::denied(FAR_AWAY),
        );

        let err = finder.find(&Dismissal::new()).unwrap_err();

        assert_eq!(err.as_location(), Some(&LocationError::PermissionDenied));
        assert_eq!(stored(&store), Some(2));
        assert_eq!(finder.counter().value(), 2);
    }

    #[test]
    fn test_timeout_leaves_counter() {
        let store = store_with(4);
        let mut finder = ShopFinder::new(
            store.clone(),
            FailingLocationProvider::new(SimulatedFailure::Timeout),
        );

        let err = finder.find(&Dismissal::new()).unwrap_err();

        assert!(matches!(
            err.as_location(),
            Some(LocationError::Timeout { .. })
        ));
        assert_eq!(stored(&store), Some(4));
    }

    #[test]
    fn test_unsupported_leaves_counter() {
        let store = Arc::new(MemoryCounterStore::new());
        let mut finder = ShopFinder::new(
            store.clone(),
            FailingLocationProvider::unsupported("no geolocation"),
        );

        let err = finder.find(&Dismissal::new()).unwrap_err();

        assert_eq!(err.as_location().map(|e| e.kind()), Some("provider_unsupported"));
        assert_eq!(stored(&store), None);
    }

    #[test]
    fn test_dismissal_during_fix_discards_result() {
        let store = store_with(3);
        let dismissal = Dismissal::new();
        let provider = DismissingProvider {
            dismissal: dismissal.clone(),
            coordinate: FAR_AWAY,
        };
        let mut finder = ShopFinder::new(store.clone(), provider);

        let err = finder.find(&dismissal).unwrap_err();

        assert!(matches!(err, FydoError::Dismissed));
        assert_eq!(stored(&store), Some(3));
        assert_eq!(finder.counter().value(), 3);
    }

    #[test]
    fn test_already_dismissed_does_nothing() {
        let store = store_with(1);
        let mut finder = ShopFinder::new(store.clone(), FixedLocationProvider::new(FAR_AWAY));
        let dismissal = Dismissal::new();
        dismissal.dismiss();

        assert!(matches!(finder.find(&dismissal), Err(FydoError::Dismissed)));
        assert_eq!(stored(&store), Some(1));
    }

    #[test]
    fn test_read_failure_starts_at_zero() {
        let store = store_with(4);
        store.set_fail_reads(true);
        let mut finder = ShopFinder::new(store.clone(), FixedLocationProvider::new(FAR_AWAY));

        let outcome = finder.find(&Dismissal::new()).unwrap();

        assert_eq!(outcome.prior, AttemptCounter::ZERO);
        assert_eq!(outcome.counter.value(), 1);
        assert_eq!(outcome.decision.mode, GateMode::NotServiceable);

        store.set_fail_reads(false);
        assert_eq!(stored(&store), Some(1));
    }

    #[test]
    fn test_write_failure_still_advances_session_counter() {
        let store = store_with(2);
        store.set_fail_writes(true);
        let mut finder = ShopFinder::new(store.clone(), FixedLocationProvider::new(FAR_AWAY));
        let dismissal = Dismissal::new();

        let first = finder.find(&dismissal).unwrap();
        assert!(!first.persisted);
        assert_eq!(first.counter.value(), 3);

        // The next attempt builds on the session value, not the stale store
        let second = finder.find(&dismissal).unwrap();
        assert_eq!(second.prior.value(), 3);
        assert_eq!(second.counter.value(), 4);
        assert_eq!(second.decision.mode, GateMode::DemoFallback);

        assert_eq!(stored(&store), Some(2));
    }

    #[test]
    fn test_out_of_cycle_stored_value_is_normalized() {
        let store = store_with(17);
        let mut finder = ShopFinder::new(store.clone(), FixedLocationProvider::new(FAR_AWAY));

        let outcome = finder.find(&Dismissal::new()).unwrap();

        assert_eq!(outcome.counter.value(), 1);
        assert_eq!(stored(&store), Some(1));
    }

    #[test]
    fn test_attempt_preview_uses_stored_counter() {
        let store = store_with(3);
        let mut finder = ShopFinder::new(store, FixedLocationProvider::new(FAR_AWAY));

        let preview = finder.attempt_preview();
        assert_eq!(preview.attempt, 4);
    }

    #[test]
    fn test_from_config_without_demo() {
        let mut config = Config::default();
        config.gate.demo_fallback = false;

        let store = store_with(3);
        let mut finder =
            ShopFinder::from_config(store, FixedLocationProvider::new(FAR_AWAY), &config);

        let outcome = finder.find(&Dismissal::new()).unwrap();
        assert_eq!(outcome.decision.mode, GateMode::NotServiceable);
        assert_eq!(outcome.counter.value(), 4);
    }
}
