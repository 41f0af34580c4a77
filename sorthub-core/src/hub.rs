//! The sortation hub: one shared belt feeding a fixed row of stations.

use std::collections::VecDeque;

use crate::config::{HubConfig, ServiceProfile};
use crate::error::{SimulationError, SimulationResult};
use crate::parcel::Parcel;
use crate::random::RandomProvider;
use crate::station::{EnqueueOutcome, ServiceStep, Station, StationStats};

/// Parcels the scanner diverts per tick unless configured otherwise.
pub const DEFAULT_SCANNER_THROUGHPUT: usize = 5;

/// Result of placing a parcel on the belt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum IngestOutcome {
    /// The parcel is on the belt.
    Accepted,
    /// The belt was full (or already jammed); the parcel was dropped.
    Jammed,
}

/// Per-tick activity, returned by [`SortationHub::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Parcels moved from the belt into station queues.
    pub sorted: usize,
    /// Whether sorting stopped on a full destination queue.
    pub blocked: bool,
    /// Stations that started a new parcel.
    pub started: usize,
    /// Stations that finished a parcel.
    pub completed: usize,
}

/// Shift-level counters kept by the hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubCounters {
    /// Trucks recorded via [`SortationHub::record_arrival`].
    pub total_trucks: u64,
    /// Parcels accepted onto the belt.
    pub total_ingested: u64,
    /// Smallest gap between consecutive truck arrivals, once two have arrived.
    pub min_interarrival_ticks: Option<u64>,
    /// Deepest the belt has been.
    pub peak_belt_depth: usize,
}

/// Read-only view of one station at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationSnapshot {
    /// Destination index.
    pub id: usize,
    /// Whether a parcel is in service.
    pub busy: bool,
    /// Ticks left on the current parcel, zero when idle.
    pub remaining_ticks: u32,
    /// Parcels waiting in the queue.
    pub queue_depth: usize,
    /// Queue capacity.
    pub capacity: usize,
}

/// Read-only view of the hub after a tick, for display and invariant checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSnapshot {
    /// Ticks executed so far.
    pub ticks_elapsed: u64,
    /// Parcels on the belt.
    pub belt_depth: usize,
    /// Belt depth at which ingestion jams.
    pub max_belt_depth: usize,
    /// Whether the hub has jammed.
    pub jammed: bool,
    /// Shift counters.
    pub counters: HubCounters,
    /// One entry per station, in index order.
    pub stations: Vec<StationSnapshot>,
}

/// The aggregate root of a simulation: belt, stations and shift counters.
///
/// Each [`tick`](Self::tick) runs two phases in a fixed order:
///
/// 1. **Sort** up to `scanner_throughput` parcels from the belt head into
///    their destination queues. A full destination blocks the head and
///    ends sorting for the tick, even for parcels bound elsewhere.
/// 2. **Serve** every station in index order: an idle station with a
///    queued parcel starts it, then every station advances one tick.
///
/// A jam is terminal. Once the belt overflows the flag never clears and
/// all further ingestion is refused.
#[derive(Debug)]
pub struct SortationHub {
    belt: VecDeque<Parcel>,
    stations: Vec<Station>,
    max_belt_depth: usize,
    scanner_throughput: usize,
    jammed: bool,
    jam_tick: Option<u64>,
    ticks_elapsed: u64,
    last_arrival_tick: Option<u64>,
    counters: HubCounters,
}

impl SortationHub {
    /// Create a hub with default service times and scanner throughput.
    pub fn new(station_count: usize, max_belt_depth: usize, station_capacity: usize) -> Self {
        Self::with_profile(
            station_count,
            max_belt_depth,
            station_capacity,
            DEFAULT_SCANNER_THROUGHPUT,
            ServiceProfile::default(),
        )
    }

    /// Create a hub from a configuration.
    pub fn from_config(config: &HubConfig) -> Self {
        Self::with_profile(
            config.station_count,
            config.max_belt_depth,
            config.station_capacity,
            config.scanner_throughput,
            config.service_profile(),
        )
    }

    /// Create a hub with explicit scanner throughput and service profile.
    pub fn with_profile(
        station_count: usize,
        max_belt_depth: usize,
        station_capacity: usize,
        scanner_throughput: usize,
        profile: ServiceProfile,
    ) -> Self {
        let stations = (0..station_count)
            .map(|id| Station::new(id, station_capacity, profile))
            .collect();
        Self {
            belt: VecDeque::new(),
            stations,
            max_belt_depth,
            scanner_throughput,
            jammed: false,
            jam_tick: None,
            ticks_elapsed: 0,
            last_arrival_tick: None,
            counters: HubCounters::default(),
        }
    }

    /// Place a parcel at the tail of the belt.
    ///
    /// If the belt already holds `max_belt_depth` parcels the hub jams and
    /// the parcel is dropped. Fails only if the parcel's destination is not
    /// a station of this hub.
    pub fn ingest(&mut self, parcel: Parcel) -> SimulationResult<IngestOutcome> {
        if parcel.destination() >= self.stations.len() {
            return Err(SimulationError::UnknownStation {
                station: parcel.destination(),
                station_count: self.stations.len(),
            });
        }
        if self.jammed {
            return Ok(IngestOutcome::Jammed);
        }
        if self.belt.len() >= self.max_belt_depth {
            // Ingestion precedes the tick that will count it.
            let tick = self.ticks_elapsed + 1;
            self.jammed = true;
            self.jam_tick = Some(tick);
            tracing::warn!(
                tick,
                belt_depth = self.belt.len(),
                "belt overflow, hub jammed"
            );
            return Ok(IngestOutcome::Jammed);
        }

        self.belt.push_back(parcel);
        self.counters.total_ingested += 1;
        self.counters.peak_belt_depth = self.counters.peak_belt_depth.max(self.belt.len());
        Ok(IngestOutcome::Accepted)
    }

    /// Record a truck arrival at `tick`, tracking the smallest gap between trucks.
    pub fn record_arrival(&mut self, tick: u64) {
        self.counters.total_trucks += 1;
        if let Some(last) = self.last_arrival_tick {
            let gap = tick.saturating_sub(last);
            self.counters.min_interarrival_ticks = Some(
                self.counters
                    .min_interarrival_ticks
                    .map_or(gap, |min| min.min(gap)),
            );
        }
        self.last_arrival_tick = Some(tick);
    }

    /// Run one tick: sort, then serve.
    pub fn tick<R: RandomProvider>(&mut self, rng: &R) -> TickSummary {
        let mut summary = TickSummary::default();
        self.sort_phase(&mut summary);
        self.serve_phase(rng, &mut summary);
        self.ticks_elapsed += 1;
        summary
    }

    fn sort_phase(&mut self, summary: &mut TickSummary) {
        while summary.sorted < self.scanner_throughput {
            let Some(head) = self.belt.front() else {
                break;
            };
            let destination = head.destination();
            let station = &mut self.stations[destination];
            if station.is_full() {
                tracing::trace!(
                    tick = self.ticks_elapsed,
                    station = destination,
                    "destination full, belt blocked"
                );
                summary.blocked = true;
                break;
            }
            if let Some(parcel) = self.belt.pop_front() {
                let outcome = station.enqueue(parcel);
                debug_assert_eq!(outcome, EnqueueOutcome::Accepted);
                summary.sorted += 1;
            }
        }
    }

    fn serve_phase<R: RandomProvider>(&mut self, rng: &R, summary: &mut TickSummary) {
        for station in &mut self.stations {
            if station.start_next(rng).is_some() {
                summary.started += 1;
            }
            if station.advance() == ServiceStep::Completed {
                summary.completed += 1;
            }
        }
    }

    /// Whether the belt has overflowed. Never reverts to `false`.
    pub fn is_jammed(&self) -> bool {
        self.jammed
    }

    /// Tick during which the belt overflowed, if it has.
    ///
    /// Parcels ingested before a tick belong to it, so this is the
    /// `ticks_elapsed` value after the next [`SortationHub::tick`].
    pub fn jam_tick(&self) -> Option<u64> {
        self.jam_tick
    }

    /// Parcels currently on the belt.
    pub fn belt_depth(&self) -> usize {
        self.belt.len()
    }

    /// Belt depth at which ingestion jams.
    pub fn max_belt_depth(&self) -> usize {
        self.max_belt_depth
    }

    /// Parcels the scanner can sort per tick.
    pub fn scanner_throughput(&self) -> usize {
        self.scanner_throughput
    }

    /// Ticks executed so far.
    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    /// Shift counters.
    pub fn counters(&self) -> HubCounters {
        self.counters
    }

    /// Number of stations.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Read-only access to the stations, in index order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Read-only access to one station.
    pub fn station(&self, id: usize) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Counters of every station, in index order.
    pub fn station_stats(&self) -> impl Iterator<Item = StationStats> + '_ {
        self.stations.iter().map(Station::stats)
    }

    /// Copy out the current state for display or checking.
    pub fn snapshot(&self) -> HubSnapshot {
        HubSnapshot {
            ticks_elapsed: self.ticks_elapsed,
            belt_depth: self.belt.len(),
            max_belt_depth: self.max_belt_depth,
            jammed: self.jammed,
            counters: self.counters,
            stations: self
                .stations
                .iter()
                .map(|s| StationSnapshot {
                    id: s.id(),
                    busy: s.is_busy(),
                    remaining_ticks: s.remaining_ticks(),
                    queue_depth: s.queue_depth(),
                    capacity: s.capacity(),
                })
                .collect(),
        }
    }
}
