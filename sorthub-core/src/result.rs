//! Shift results: the record handed to reporting once a run ends.

use serde::{Deserialize, Serialize};

use crate::error::SimulationResult;
use crate::hub::SortationHub;
use crate::stats::{ratio_or_zero, sample_std_dev};

/// Summary of one completed (or jammed) shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftResult {
    /// Identifier of the run.
    pub run_id: u64,
    /// Whether the shift ran to its end without jamming.
    pub success: bool,
    /// Ticks executed.
    pub duration_ticks: u64,
    /// Trucks that arrived.
    pub total_trucks: u64,
    /// Parcels accepted onto the belt.
    pub total_parcels: u64,
    /// Smallest gap between trucks; `None` with fewer than two trucks.
    pub min_interarrival_ticks: Option<u64>,
    /// Deepest the belt got.
    pub max_belt_load: usize,
    /// Deepest any station queue got.
    pub max_station_load: usize,
    /// Mean service ticks per completed parcel, zero if none completed.
    pub avg_processing_time: f64,
    /// Sample standard deviation of parcels assigned per station.
    pub station_load_std_dev: f64,
}

/// Reduces a finished hub into a [`ShiftResult`].
pub struct ResultAggregator;

impl ResultAggregator {
    /// Summarize `hub` after a run of `duration_ticks` ticks.
    ///
    /// Requires at least two stations: the load spread is a sample standard
    /// deviation and is undefined otherwise
    /// ([`SimulationError::InsufficientStations`](crate::SimulationError::InsufficientStations)).
    pub fn summarize(
        run_id: u64,
        hub: &SortationHub,
        success: bool,
        duration_ticks: u64,
    ) -> SimulationResult<ShiftResult> {
        let mut max_station_load = 0;
        let mut total_service_ticks = 0;
        let mut total_completed = 0;
        let mut loads = Vec::with_capacity(hub.station_count());

        for stats in hub.station_stats() {
            max_station_load = max_station_load.max(stats.peak_queue_depth);
            total_service_ticks += stats.total_service_ticks;
            total_completed += stats.total_completed;
            loads.push(stats.total_assigned as f64);
        }

        let station_load_std_dev = sample_std_dev(&loads)?;
        let counters = hub.counters();

        Ok(ShiftResult {
            run_id,
            success,
            duration_ticks,
            total_trucks: counters.total_trucks,
            total_parcels: counters.total_ingested,
            min_interarrival_ticks: counters.min_interarrival_ticks,
            max_belt_load: counters.peak_belt_depth,
            max_station_load,
            avg_processing_time: ratio_or_zero(total_service_ticks, total_completed),
            station_load_std_dev,
        })
    }
}
