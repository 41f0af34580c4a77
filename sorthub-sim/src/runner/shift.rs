//! Driving a single shift from the first tick to the end (or the jam).

use sorthub_core::{
    ArrivalGenerator, HubConfig, HubSnapshot, RandomProvider, ResultAggregator, ShiftResult,
    SimulationResult, SortationHub,
};

use crate::invariants::Invariant;

/// Callbacks invoked after every tick of a shift.
///
/// Snapshots are only taken when at least one invariant or an observer is
/// registered, so a bare [`ShiftHooks::none`] run pays nothing for them.
#[derive(Default)]
pub struct ShiftHooks<'a> {
    invariants: &'a [Box<dyn Invariant>],
    observer: Option<&'a mut dyn FnMut(&HubSnapshot)>,
}

impl<'a> ShiftHooks<'a> {
    /// No invariants, no observer.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check these invariants after every tick.
    pub fn with_invariants(mut self, invariants: &'a [Box<dyn Invariant>]) -> Self {
        self.invariants = invariants;
        self
    }

    /// Hand every post-tick snapshot to `observer`.
    pub fn with_observer(mut self, observer: &'a mut dyn FnMut(&HubSnapshot)) -> Self {
        self.observer = Some(observer);
        self
    }

    fn is_empty(&self) -> bool {
        self.invariants.is_empty() && self.observer.is_none()
    }
}

/// Run one shift and summarize it.
///
/// Each tick a truck arrives with probability
/// `truck_arrival_probability`; its batch is recorded and ingested in
/// order before the hub ticks. The shift ends when the hub jams or the
/// tick budget is spent. It succeeds only if it ran the full shift
/// without jamming.
pub fn run_shift<R: RandomProvider>(
    run_id: u64,
    config: &HubConfig,
    rng: &R,
    mut hooks: ShiftHooks<'_>,
) -> SimulationResult<ShiftResult> {
    config.validate()?;

    let mut hub = SortationHub::from_config(config);
    let mut arrivals = ArrivalGenerator::new(config.batch_profile())?;
    let observe = !hooks.is_empty();
    let mut previous: Option<HubSnapshot> = None;
    let mut tick = 0;

    tracing::debug!(
        run_id,
        stations = config.station_count,
        shift_length = config.shift_length_ticks,
        "shift started"
    );

    while !hub.is_jammed() && tick < config.shift_length_ticks {
        tick += 1;

        if rng.random_bool(config.truck_arrival_probability) {
            let batch = arrivals.generate_batch(rng, tick);
            hub.record_arrival(tick);
            for parcel in batch {
                let _ = hub.ingest(parcel)?;
            }
        }

        let _ = hub.tick(rng);

        if observe {
            let snapshot = hub.snapshot();
            for invariant in hooks.invariants {
                invariant.check(&snapshot, previous.as_ref());
            }
            if let Some(observer) = hooks.observer.as_mut() {
                observer(&snapshot);
            }
            previous = Some(snapshot);
        }
    }

    let success = !hub.is_jammed() && tick >= config.shift_length_ticks;
    if hub.is_jammed() {
        tracing::debug!(
            run_id,
            tick,
            jam_tick = ?hub.jam_tick(),
            belt_depth = hub.belt_depth(),
            "shift ended in a jam"
        );
    } else {
        tracing::debug!(run_id, tick, "shift completed");
    }

    ResultAggregator::summarize(run_id, &hub, success, tick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::builtin_invariants;
    use sorthub_core::{SimRandomProvider, SimulationError};

    fn quiet_config() -> HubConfig {
        HubConfig {
            shift_length_ticks: 500,
            truck_arrival_probability: 0.0,
            ..HubConfig::default()
        }
    }

    #[test]
    fn test_no_trucks_survives_shift() {
        let rng = SimRandomProvider::new(1);
        let result = run_shift(1, &quiet_config(), &rng, ShiftHooks::none())
            .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert!(result.success);
        assert_eq!(result.duration_ticks, 500);
        assert_eq!(result.total_trucks, 0);
        assert_eq!(result.total_parcels, 0);
        assert_eq!(result.min_interarrival_ticks, None);
        assert_eq!(result.avg_processing_time, 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let rng = SimRandomProvider::new(1);
        let config = HubConfig {
            station_count: 1,
            ..quiet_config()
        };
        let result = run_shift(1, &config, &rng, ShiftHooks::none());
        assert!(matches!(result, Err(SimulationError::InvalidConfig(_))));
    }

    #[test]
    fn test_observer_sees_every_tick() {
        let rng = SimRandomProvider::new(2);
        let mut ticks = Vec::new();
        let mut observer = |s: &HubSnapshot| ticks.push(s.ticks_elapsed);
        let invariants = builtin_invariants();
        let hooks = ShiftHooks::none()
            .with_invariants(&invariants)
            .with_observer(&mut observer);

        let result = run_shift(3, &quiet_config(), &rng, hooks);
        assert!(result.is_ok());
        assert_eq!(ticks, (1..=500).collect::<Vec<u64>>());
    }

    #[test]
    fn test_truck_every_tick_jams() {
        let rng = SimRandomProvider::new(4);
        let config = HubConfig {
            truck_arrival_probability: 1.0,
            ..HubConfig::default()
        };
        let result = run_shift(1, &config, &rng, ShiftHooks::none())
            .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert!(!result.success);
        assert!(result.duration_ticks < config.shift_length_ticks);
        assert_eq!(result.max_belt_load, config.max_belt_depth);
        assert_eq!(result.min_interarrival_ticks, Some(1));
        assert_eq!(result.total_trucks, result.duration_ticks);
    }

    #[test]
    fn test_jam_tick_is_last_observed_tick() {
        let rng = SimRandomProvider::new(6);
        let config = HubConfig {
            truck_arrival_probability: 0.5,
            ..HubConfig::default()
        };
        let mut last = None;
        let mut observer = |s: &HubSnapshot| last = Some((s.ticks_elapsed, s.jammed));
        let result = run_shift(1, &config, &rng, ShiftHooks::none().with_observer(&mut observer))
            .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert!(!result.success);
        assert_eq!(last, Some((result.duration_ticks, true)));
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = HubConfig {
            shift_length_ticks: 5_000,
            truck_arrival_probability: 0.01,
            ..HubConfig::default()
        };
        let a = run_shift(1, &config, &SimRandomProvider::new(99), ShiftHooks::none());
        let b = run_shift(1, &config, &SimRandomProvider::new(99), ShiftHooks::none());
        assert_eq!(a, b);
    }
}
