//! One reconcile cycle: fetch, decide per light, write, merge.

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, error, info, warn};

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::payload::PartialState;
use crate::reset::is_reset;
use crate::runtime;
use crate::store::{LightOutcome, Store};
use crate::types::{LightId, LightSnapshot};

type Result<T> = std::result::Result<T, Error>;

/// Why a restore is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreReason {
    /// The light shows the factory default appearance.
    Reset,
    /// The bridge reports the light as unreachable.
    Unreachable,
}

/// What to do with one light this cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Store the fetched snapshot as is.
    Keep,
    /// Write the prior color fields back.
    Restore(RestoreReason, PartialState),
}

/// Decide what to do with a light given its fetched and prior snapshots.
///
/// A restore needs a prior snapshot with something to write back; a light seen
/// for the first time is always kept.
pub fn decide(current: &LightSnapshot, prev: Option<&LightSnapshot>) -> Decision {
    let Some(prev) = prev else {
        return Decision::Keep;
    };

    let reason = if is_reset(current) {
        RestoreReason::Reset
    } else if !current.reachable {
        RestoreReason::Unreachable
    } else {
        return Decision::Keep;
    };

    let payload = PartialState::from(prev);
    if payload.is_valid() {
        Decision::Restore(reason, payload)
    } else {
        Decision::Keep
    }
}

/// Per-cycle counters plus the store the cycle produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub store: Store,
    pub observed: usize,
    pub restored: Vec<LightId>,
    pub retained: Vec<LightId>,
    pub dropped: Vec<LightId>,
}

/// Runs reconcile cycles against a bridge.
#[derive(Debug)]
pub struct Reconciler<B> {
    bridge: Arc<B>,
}

impl<B> Clone for Reconciler<B> {
    fn clone(&self) -> Self {
        Reconciler {
            bridge: Arc::clone(&self.bridge),
        }
    }
}

impl<B: Bridge> Reconciler<B> {
    pub fn new(bridge: B) -> Self {
        Self::from_arc(Arc::new(bridge))
    }

    pub fn from_arc(bridge: Arc<B>) -> Self {
        Reconciler { bridge }
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Run one cycle against `prev`, the store produced by the last cycle.
    ///
    /// Returns the light listing error untouched if the bridge cannot be
    /// queried; nothing is written in that case. Per-light failures never
    /// fail the cycle.
    pub async fn run_cycle(&self, prev: &Store) -> Result<CycleReport> {
        let current = self.bridge.fetch_all().await?;
        debug!("fetched {} lights", current.len());

        let handles: Vec<_> = current
            .into_iter()
            .map(|(id, light)| {
                let bridge = Arc::clone(&self.bridge);
                let prior = prev.get(&id).cloned();
                let task_id = id.clone();
                let handle = runtime::spawn(async move {
                    evaluate(bridge.as_ref(), &task_id, light, prior).await
                });
                (id, handle)
            })
            .collect();

        let (ids, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        let results = join_all(handles).await;

        let mut report = CycleReport::default();
        let mut outcomes = Vec::with_capacity(ids.len());
        for (id, result) in ids.into_iter().zip(results) {
            let outcome = result.unwrap_or_else(|e| {
                error!("evaluating light {id} failed: {e}");
                match prev.get(&id) {
                    Some(prior) => LightOutcome::Retained(prior.clone()),
                    None => LightOutcome::Dropped,
                }
            });
            match &outcome {
                LightOutcome::Observed(_) => report.observed += 1,
                LightOutcome::Restored(_) => report.restored.push(id.clone()),
                LightOutcome::Retained(_) => report.retained.push(id.clone()),
                LightOutcome::Dropped => report.dropped.push(id.clone()),
            }
            outcomes.push((id, outcome));
        }

        report.store = prev.merge(outcomes);
        Ok(report)
    }
}

/// Decide and, if needed, restore a single light.
async fn evaluate<B: Bridge>(
    bridge: &B,
    id: &LightId,
    current: LightSnapshot,
    prev: Option<LightSnapshot>,
) -> LightOutcome {
    let Decision::Restore(reason, payload) = decide(&current, prev.as_ref()) else {
        return LightOutcome::Observed(current);
    };

    match bridge.apply_state(id, &payload).await {
        Ok(applied) => {
            info!(
                "Restored state on {} (light {id}, {reason:?})",
                current.display_name()
            );
            LightOutcome::Restored(current.with_partial(&applied.state))
        }
        Err(e) => {
            if e.is_unavailable() {
                info!("{} not available: {e}", current.display_name());
            } else {
                warn!("restoring {} failed: {e}", current.display_name());
            }
            match prev {
                Some(prior) => LightOutcome::Retained(prior),
                None => LightOutcome::Dropped,
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::reset::{
        FACTORY_BRIGHTNESS, FACTORY_COLOR_TEMPERATURE, FACTORY_HUE, FACTORY_SATURATION,
        FACTORY_XY,
    };
    use crate::response::ApplyResponse;
    use crate::types::Xy;

    /// In-memory bridge recording every write.
    #[derive(Default)]
    pub(crate) struct FakeBridge {
        pub lights: Mutex<HashMap<LightId, LightSnapshot>>,
        pub fail_fetch: Mutex<bool>,
        pub fetch_delay: Mutex<Option<std::time::Duration>>,
        pub fetches: Mutex<usize>,
        pub unavailable: Mutex<Vec<LightId>>,
        pub broken: Mutex<Vec<LightId>>,
        pub panicking: Mutex<Vec<LightId>>,
        pub applied: Mutex<Vec<(LightId, PartialState)>>,
    }

    impl FakeBridge {
        pub fn set(&self, id: &str, light: LightSnapshot) {
            self.lights.lock().unwrap().insert(LightId::from(id), light);
        }

        pub fn applied(&self) -> Vec<(LightId, PartialState)> {
            self.applied.lock().unwrap().clone()
        }
    }

    impl Bridge for FakeBridge {
        async fn fetch_all(&self) -> Result<HashMap<LightId, LightSnapshot>> {
            *self.fetches.lock().unwrap() += 1;
            let delay = *self.fetch_delay.lock().unwrap();
            if let Some(delay) = delay {
                runtime::sleep(delay).await;
            }
            if *self.fail_fetch.lock().unwrap() {
                return Err(Error::communication("list lights", "connection refused"));
            }
            Ok(self.lights.lock().unwrap().clone())
        }

        async fn apply_state(&self, id: &LightId, state: &PartialState) -> Result<ApplyResponse> {
            self.applied
                .lock()
                .unwrap()
                .push((id.clone(), state.clone()));
            if self.panicking.lock().unwrap().contains(id) {
                panic!("bridge blew up for {id}");
            }
            if self.unavailable.lock().unwrap().contains(id) {
                return Err(Error::device_unavailable(id, "not reachable"));
            }
            if self.broken.lock().unwrap().contains(id) {
                return Err(Error::write_failed(id, "HTTP 500"));
            }
            Ok(ApplyResponse::new(id.clone(), state.clone()))
        }
    }

    pub(crate) fn factory() -> LightSnapshot {
        LightSnapshot {
            name: None,
            on: true,
            reachable: true,
            brightness: Some(FACTORY_BRIGHTNESS),
            hue: Some(FACTORY_HUE),
            saturation: Some(FACTORY_SATURATION),
            xy: Some(FACTORY_XY),
            color_temperature: Some(FACTORY_COLOR_TEMPERATURE),
        }
    }

    pub(crate) fn custom() -> LightSnapshot {
        LightSnapshot {
            name: None,
            on: true,
            reachable: true,
            brightness: Some(100),
            hue: Some(200),
            saturation: Some(50),
            xy: Some(Xy::new(0.3, 0.3)),
            color_temperature: Some(300),
        }
    }

    fn other() -> LightSnapshot {
        LightSnapshot {
            brightness: Some(20),
            hue: Some(40000),
            saturation: Some(254),
            xy: Some(Xy::new(0.17, 0.05)),
            color_temperature: Some(153),
            ..custom()
        }
    }

    fn store(entries: &[(&str, LightSnapshot)]) -> Store {
        entries
            .iter()
            .map(|(id, s)| (LightId::from(*id), s.clone()))
            .collect()
    }

    #[test]
    fn test_decide_first_observation_keeps() {
        assert_eq!(decide(&factory(), None), Decision::Keep);
    }

    #[test]
    fn test_decide_reset_restores_prior() {
        assert_eq!(
            decide(&factory(), Some(&custom())),
            Decision::Restore(RestoreReason::Reset, PartialState::from(&custom()))
        );
    }

    #[test]
    fn test_decide_unreachable_restores_prior() {
        let current = LightSnapshot {
            reachable: false,
            ..other()
        };
        assert_eq!(
            decide(&current, Some(&custom())),
            Decision::Restore(RestoreReason::Unreachable, PartialState::from(&custom()))
        );
    }

    #[test]
    fn test_decide_normal_light_keeps() {
        assert_eq!(decide(&other(), Some(&custom())), Decision::Keep);
    }

    #[test]
    fn test_decide_nothing_to_restore_keeps() {
        let plug = LightSnapshot {
            on: true,
            reachable: false,
            ..Default::default()
        };
        assert_eq!(decide(&plug, Some(&plug)), Decision::Keep);
    }

    #[tokio::test]
    async fn test_restore_writes_prior_values() {
        let bridge = FakeBridge::default();
        bridge.set("A", factory());
        let reconciler = Reconciler::new(bridge);

        let report = reconciler
            .run_cycle(&store(&[("A", custom())]))
            .await
            .unwrap();

        let a = LightId::from("A");
        assert_eq!(
            reconciler.bridge().applied(),
            vec![(a.clone(), PartialState::from(&custom()))]
        );
        assert_eq!(report.store.get(&a), Some(&custom()));
        assert_eq!(report.restored, vec![a]);
    }

    #[tokio::test]
    async fn test_unavailable_keeps_prior_snapshot() {
        let bridge = FakeBridge::default();
        bridge.set("A", factory());
        bridge.unavailable.lock().unwrap().push(LightId::from("A"));
        let reconciler = Reconciler::new(bridge);

        let prior = LightSnapshot {
            name: Some("Desk".into()),
            on: false,
            ..custom()
        };
        let report = reconciler
            .run_cycle(&store(&[("A", prior.clone())]))
            .await
            .unwrap();

        assert_eq!(report.store.get(&LightId::from("A")), Some(&prior));
        assert_eq!(report.retained, vec![LightId::from("A")]);
    }

    #[tokio::test]
    async fn test_other_write_failure_keeps_prior_snapshot() {
        let bridge = FakeBridge::default();
        bridge.set("A", factory());
        bridge.broken.lock().unwrap().push(LightId::from("A"));
        let reconciler = Reconciler::new(bridge);

        let report = reconciler
            .run_cycle(&store(&[("A", custom())]))
            .await
            .unwrap();
        assert_eq!(report.store.get(&LightId::from("A")), Some(&custom()));
    }

    #[tokio::test]
    async fn test_failure_on_one_light_is_isolated() {
        let bridge = FakeBridge::default();
        bridge.set("A", factory());
        bridge.set("B", factory());
        bridge.set("C", factory());
        bridge.unavailable.lock().unwrap().push(LightId::from("B"));
        bridge.panicking.lock().unwrap().push(LightId::from("C"));
        let reconciler = Reconciler::new(bridge);

        let prev = store(&[("A", custom()), ("B", other()), ("C", other())]);
        let report = reconciler.run_cycle(&prev).await.unwrap();

        assert_eq!(report.store.get(&LightId::from("A")), Some(&custom()));
        assert_eq!(report.store.get(&LightId::from("B")), Some(&other()));
        assert_eq!(report.store.get(&LightId::from("C")), Some(&other()));
        assert_eq!(report.restored, vec![LightId::from("A")]);
        assert_eq!(report.retained.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_without_writes() {
        let bridge = FakeBridge::default();
        bridge.set("A", factory());
        *bridge.fail_fetch.lock().unwrap() = true;
        let reconciler = Reconciler::new(bridge);

        let err = reconciler
            .run_cycle(&store(&[("A", custom())]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Communication { .. }));
        assert!(reconciler.bridge().applied().is_empty());
    }

    #[tokio::test]
    async fn test_cycle_is_idempotent_without_changes() {
        let bridge = FakeBridge::default();
        bridge.set("A", custom());
        bridge.set("B", other());
        let reconciler = Reconciler::new(bridge);

        let first = reconciler.run_cycle(&Store::new()).await.unwrap().store;
        let second = reconciler.run_cycle(&first).await.unwrap().store;
        let third = reconciler.run_cycle(&second).await.unwrap().store;

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert!(reconciler.bridge().applied().is_empty());
    }

    #[tokio::test]
    async fn test_removed_light_stays_in_store() {
        let bridge = FakeBridge::default();
        bridge.set("A", custom());
        let reconciler = Reconciler::new(bridge);

        let prev = store(&[("A", custom()), ("gone", other())]);
        let report = reconciler.run_cycle(&prev).await.unwrap();
        assert_eq!(report.store.get(&LightId::from("gone")), Some(&other()));
    }

    #[tokio::test]
    async fn test_two_light_scenario() {
        let bridge = FakeBridge::default();
        bridge.set("A", custom());
        bridge.set("B", other());
        let reconciler = Reconciler::new(bridge);

        // Cycle 1: nothing known yet, raw snapshots stored, no writes.
        let cycle1 = reconciler.run_cycle(&Store::new()).await.unwrap();
        assert_eq!(cycle1.store.len(), 2);
        assert_eq!(cycle1.observed, 2);
        assert!(reconciler.bridge().applied().is_empty());

        // Cycle 2: A was power-cycled, B untouched.
        reconciler.bridge().set("A", factory());
        let cycle2 = reconciler.run_cycle(&cycle1.store).await.unwrap();

        let a = LightId::from("A");
        let b = LightId::from("B");
        assert_eq!(
            reconciler.bridge().applied(),
            vec![(a.clone(), PartialState::from(&custom()))]
        );
        assert_eq!(cycle2.store.get(&a), Some(&custom()));
        assert_eq!(cycle2.store.get(&b), cycle1.store.get(&b));
    }
}
