//! Per-tick invariants checked against hub snapshots.
//!
//! Invariants run after every tick of a shift and panic on violation, so a
//! broken run stops at the first tick that breaks a property instead of
//! producing a plausible-looking result.

use sorthub_core::HubSnapshot;

/// A named property of the hub that must hold after every tick.
///
/// `previous` is the snapshot of the preceding tick, absent on the first
/// tick of a shift. Implementations should panic if the property is
/// violated.
///
/// # Example
///
/// ```
/// use sorthub_core::HubSnapshot;
/// use sorthub_sim::Invariant;
///
/// struct TrucksNeverDecrease;
///
/// impl Invariant for TrucksNeverDecrease {
///     fn name(&self) -> &str {
///         "trucks_never_decrease"
///     }
///
///     fn check(&self, snapshot: &HubSnapshot, previous: Option<&HubSnapshot>) {
///         if let Some(prev) = previous {
///             assert!(snapshot.counters.total_trucks >= prev.counters.total_trucks);
///         }
///     }
/// }
/// ```
pub trait Invariant: Send + Sync {
    /// The human-readable name of this invariant.
    fn name(&self) -> &str;

    /// Check the invariant after a tick.
    fn check(&self, snapshot: &HubSnapshot, previous: Option<&HubSnapshot>);
}

/// Create a boxed invariant from a name and closure.
///
/// ```
/// use sorthub_sim::{invariant_fn, Invariant};
///
/// let inv = invariant_fn("belt_bounded", |snapshot, _previous| {
///     assert!(snapshot.belt_depth <= snapshot.max_belt_depth || snapshot.jammed);
/// });
/// assert_eq!(inv.name(), "belt_bounded");
/// ```
pub fn invariant_fn<F>(name: impl Into<String>, check: F) -> Box<dyn Invariant>
where
    F: Fn(&HubSnapshot, Option<&HubSnapshot>) + Send + Sync + 'static,
{
    Box::new(FnInvariant {
        name: name.into(),
        check,
    })
}

struct FnInvariant<F> {
    name: String,
    check: F,
}

impl<F> Invariant for FnInvariant<F>
where
    F: Fn(&HubSnapshot, Option<&HubSnapshot>) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, snapshot: &HubSnapshot, previous: Option<&HubSnapshot>) {
        (self.check)(snapshot, previous);
    }
}

/// No station queue ever exceeds its capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueWithinCapacity;

impl Invariant for QueueWithinCapacity {
    fn name(&self) -> &str {
        "queue_within_capacity"
    }

    fn check(&self, snapshot: &HubSnapshot, _previous: Option<&HubSnapshot>) {
        for station in &snapshot.stations {
            assert!(
                station.queue_depth <= station.capacity,
                "tick {}: station {} holds {} parcels, capacity {}",
                snapshot.ticks_elapsed,
                station.id,
                station.queue_depth,
                station.capacity
            );
        }
    }
}

/// The belt stays within its maximum depth unless the hub has jammed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeltWithinDepth;

impl Invariant for BeltWithinDepth {
    fn name(&self) -> &str {
        "belt_within_depth"
    }

    fn check(&self, snapshot: &HubSnapshot, _previous: Option<&HubSnapshot>) {
        assert!(
            snapshot.jammed || snapshot.belt_depth <= snapshot.max_belt_depth,
            "tick {}: belt holds {} parcels without a jam (max {})",
            snapshot.ticks_elapsed,
            snapshot.belt_depth,
            snapshot.max_belt_depth
        );
    }
}

/// Once jammed, a hub stays jammed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JamIsTerminal;

impl Invariant for JamIsTerminal {
    fn name(&self) -> &str {
        "jam_is_terminal"
    }

    fn check(&self, snapshot: &HubSnapshot, previous: Option<&HubSnapshot>) {
        if let Some(prev) = previous {
            assert!(
                !prev.jammed || snapshot.jammed,
                "tick {}: jam cleared",
                snapshot.ticks_elapsed
            );
        }
    }
}

/// A station is busy exactly when it has service ticks remaining.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyMeansRemaining;

impl Invariant for BusyMeansRemaining {
    fn name(&self) -> &str {
        "busy_means_remaining"
    }

    fn check(&self, snapshot: &HubSnapshot, _previous: Option<&HubSnapshot>) {
        for station in &snapshot.stations {
            assert_eq!(
                station.busy,
                station.remaining_ticks > 0,
                "tick {}: station {} busy={} with {} ticks remaining",
                snapshot.ticks_elapsed,
                station.id,
                station.busy,
                station.remaining_ticks
            );
        }
    }
}

/// All built-in hub invariants.
pub fn builtin_invariants() -> Vec<Box<dyn Invariant>> {
    vec![
        Box::new(QueueWithinCapacity),
        Box::new(BeltWithinDepth),
        Box::new(JamIsTerminal),
        Box::new(BusyMeansRemaining),
    ]
}
