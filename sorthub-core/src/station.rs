//! Destination stations: a bounded queue in front of a single server.
//!
//! ```text
//!            begin_service (queue head)
//!   ┌──────┐ ─────────────────────────> ┌─────────────────┐
//!   │ Idle │                            │ Serving(k ticks)│──┐ advance: k -= 1
//!   └──────┘ <───────────────────────── └─────────────────┘<─┘
//!            advance reaches k = 0
//! ```

use std::collections::VecDeque;

use crate::config::ServiceProfile;
use crate::error::{SimulationError, SimulationResult};
use crate::parcel::Parcel;
use crate::random::RandomProvider;
use crate::variate::sample_positive_count;

/// Result of offering a parcel to a station queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum EnqueueOutcome {
    /// The parcel joined the queue.
    Accepted,
    /// The queue was at capacity; the parcel was dropped.
    DroppedQueueFull,
}

/// What a call to [`Station::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStep {
    /// The station had nothing in service.
    Idle,
    /// One tick of service elapsed; this many ticks remain.
    Working(u32),
    /// The parcel in service finished this tick.
    Completed,
}

/// Observable state of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationState {
    /// No parcel in service.
    Idle,
    /// Serving a parcel with this many ticks remaining (always positive).
    Serving {
        /// Ticks left before the current parcel completes.
        remaining_ticks: u32,
    },
}

/// Monotonic counters accumulated by a station over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationStats {
    /// Parcels accepted into the queue.
    pub total_assigned: u64,
    /// Parcels whose service finished.
    pub total_completed: u64,
    /// Deepest the queue has been.
    pub peak_queue_depth: usize,
    /// Ticks spent actively serving.
    pub total_service_ticks: u64,
}

#[derive(Debug)]
struct InService {
    parcel: Parcel,
    remaining_ticks: u32,
}

/// A single destination station.
#[derive(Debug)]
pub struct Station {
    id: usize,
    capacity: usize,
    profile: ServiceProfile,
    queue: VecDeque<Parcel>,
    current: Option<InService>,
    stats: StationStats,
}

impl Station {
    /// Create an idle station with an empty queue of the given capacity.
    pub fn new(id: usize, capacity: usize, profile: ServiceProfile) -> Self {
        Self {
            id,
            capacity,
            profile,
            queue: VecDeque::new(),
            current: None,
            stats: StationStats::default(),
        }
    }

    /// Destination index served by this station.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum number of waiting parcels.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of parcels waiting in the queue (excluding the one in service).
    pub fn queue_depth(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    /// Whether a parcel is in service.
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Ticks left on the current parcel, zero when idle.
    pub fn remaining_ticks(&self) -> u32 {
        self.current.as_ref().map_or(0, |s| s.remaining_ticks)
    }

    /// The parcel currently in service, if any.
    pub fn current_parcel(&self) -> Option<&Parcel> {
        self.current.as_ref().map(|s| &s.parcel)
    }

    /// Current state of the server.
    pub fn state(&self) -> StationState {
        match &self.current {
            None => StationState::Idle,
            Some(s) => StationState::Serving {
                remaining_ticks: s.remaining_ticks,
            },
        }
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> StationStats {
        self.stats
    }

    /// Offer a parcel to the queue.
    ///
    /// A full queue drops the parcel. The station never pushes back on its
    /// caller; the hub checks [`Station::is_full`] before offering.
    pub fn enqueue(&mut self, parcel: Parcel) -> EnqueueOutcome {
        if self.is_full() {
            tracing::trace!(station = self.id, parcel = %parcel, "queue full, parcel dropped");
            return EnqueueOutcome::DroppedQueueFull;
        }
        self.queue.push_back(parcel);
        self.stats.total_assigned += 1;
        self.stats.peak_queue_depth = self.stats.peak_queue_depth.max(self.queue.len());
        EnqueueOutcome::Accepted
    }

    /// Start serving `parcel`, drawing its service time (at least one tick).
    ///
    /// Returns the drawn service time. Fails if a parcel is already in
    /// service; the rejected parcel is dropped.
    pub fn begin_service<R: RandomProvider>(
        &mut self,
        parcel: Parcel,
        rng: &R,
    ) -> SimulationResult<u32> {
        if self.current.is_some() {
            return Err(SimulationError::StationBusy(self.id));
        }
        Ok(self.serve(parcel, rng))
    }

    /// If idle with a non-empty queue, move the queue head into service.
    ///
    /// Returns the drawn service time when a parcel was started.
    pub(crate) fn start_next<R: RandomProvider>(&mut self, rng: &R) -> Option<u32> {
        if self.current.is_some() {
            return None;
        }
        let parcel = self.queue.pop_front()?;
        Some(self.serve(parcel, rng))
    }

    /// Put `parcel` in service. The server must be idle.
    fn serve<R: RandomProvider>(&mut self, parcel: Parcel, rng: &R) -> u32 {
        debug_assert!(self.current.is_none());
        let ticks = sample_positive_count(rng, self.profile.mean, self.profile.std_dev);
        self.current = Some(InService {
            parcel,
            remaining_ticks: ticks,
        });
        ticks
    }

    /// Advance the server by one tick.
    ///
    /// A station that completes this tick becomes idle immediately but only
    /// picks up its next parcel on the following tick.
    pub fn advance(&mut self) -> ServiceStep {
        let Some(in_service) = self.current.as_mut() else {
            return ServiceStep::Idle;
        };

        in_service.remaining_ticks -= 1;
        self.stats.total_service_ticks += 1;

        if in_service.remaining_ticks == 0 {
            self.current = None;
            self.stats.total_completed += 1;
            ServiceStep::Completed
        } else {
            ServiceStep::Working(in_service.remaining_ticks)
        }
    }
}
