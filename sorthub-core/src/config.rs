//! # Hub Configuration
//!
//! Every tunable the engine depends on lives in [`HubConfig`]. The defaults
//! model one 8-hour shift at a 20-destination hub:
//!
//! | Parameter | Config Field | Default | Description |
//! |-----------|--------------|---------|-------------|
//! | Shift length | `shift_length_ticks` | 28,800 | One tick is one second |
//! | Stations | `station_count` | 20 | Destinations served by the hub |
//! | Station queue | `station_capacity` | 50 | Parcels waiting per station |
//! | Service time | `processing_mean` / `processing_std_dev` | 5.0 / 1.5 | Ticks per parcel |
//! | Truck arrivals | `truck_arrival_probability` | 1/450 | Per tick, one truck every 7.5 min |
//! | Batch size | `batch_size_mean` / `batch_size_std_dev` | 100 / 25 | Parcels per truck |
//! | Clustering | `cluster_ratio` | 0.7 | Share of a batch bound for one station |
//! | Scanner | `scanner_throughput` | 5 | Parcels sorted per tick |
//! | Belt | `max_belt_depth` | 300 | Parcels on the belt before a jam |

use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};

/// Minimum station count for which shift statistics are defined.
pub const MIN_STATIONS: usize = 2;

/// Maximum station count accepted by [`HubConfig::validate`].
///
/// Stations are allocated up front, one per destination.
pub const MAX_STATIONS: usize = 10_000;

/// Upper bound on the parcels in one batch.
///
/// [`HubConfig::validate`] rejects a batch mean or standard deviation above
/// it, and every drawn batch size is clamped to it.
pub const MAX_BATCH_SIZE: u32 = 100_000;

/// Configuration for one simulated hub and its shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Number of ticks in a shift.
    pub shift_length_ticks: u64,
    /// Number of destination stations, within [`MIN_STATIONS`]..=[`MAX_STATIONS`].
    pub station_count: usize,
    /// Queue capacity of each station.
    pub station_capacity: usize,
    /// Mean service time in ticks.
    pub processing_mean: f64,
    /// Standard deviation of the service time in ticks.
    pub processing_std_dev: f64,
    /// Probability that a truck arrives on any given tick.
    pub truck_arrival_probability: f64,
    /// Mean number of parcels per truck.
    pub batch_size_mean: f64,
    /// Standard deviation of the number of parcels per truck.
    pub batch_size_std_dev: f64,
    /// Fraction of each batch forced to a single "hot" station.
    pub cluster_ratio: f64,
    /// Parcels the scanner can divert from the belt per tick.
    pub scanner_throughput: usize,
    /// Belt depth at which ingestion jams the hub.
    pub max_belt_depth: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            shift_length_ticks: 8 * 60 * 60,
            station_count: 20,
            station_capacity: 50,
            processing_mean: 5.0,
            processing_std_dev: 1.5,
            truck_arrival_probability: 1.0 / (7.5 * 60.0),
            batch_size_mean: 100.0,
            batch_size_std_dev: 25.0,
            cluster_ratio: 0.7,
            scanner_throughput: 5,
            max_belt_depth: 300,
        }
    }
}

impl HubConfig {
    /// A small hub with the default stochastic parameters.
    ///
    /// Convenient for tests that need to reach capacity limits quickly.
    pub fn small(station_count: usize, station_capacity: usize, max_belt_depth: usize) -> Self {
        Self {
            station_count,
            station_capacity,
            max_belt_depth,
            ..Self::default()
        }
    }

    /// Service-time parameters handed to each station.
    pub fn service_profile(&self) -> ServiceProfile {
        ServiceProfile {
            mean: self.processing_mean,
            std_dev: self.processing_std_dev,
        }
    }

    /// Batch parameters handed to the arrival generator.
    pub fn batch_profile(&self) -> BatchProfile {
        BatchProfile {
            size_mean: self.batch_size_mean,
            size_std_dev: self.batch_size_std_dev,
            cluster_ratio: self.cluster_ratio,
            station_count: self.station_count,
        }
    }

    /// Check that the configuration can drive a shift and be summarized.
    pub fn validate(&self) -> SimulationResult<()> {
        if self.station_count < MIN_STATIONS {
            return Err(SimulationError::InvalidConfig(format!(
                "station_count must be at least {MIN_STATIONS}, got {}",
                self.station_count
            )));
        }
        if self.station_count > MAX_STATIONS {
            return Err(SimulationError::InvalidConfig(format!(
                "station_count must be at most {MAX_STATIONS}, got {}",
                self.station_count
            )));
        }
        if self.station_capacity == 0 {
            return Err(invalid("station_capacity must be positive"));
        }
        if self.scanner_throughput == 0 {
            return Err(invalid("scanner_throughput must be positive"));
        }
        if self.max_belt_depth == 0 {
            return Err(invalid("max_belt_depth must be positive"));
        }
        if self.shift_length_ticks == 0 {
            return Err(invalid("shift_length_ticks must be positive"));
        }
        check_unit("truck_arrival_probability", self.truck_arrival_probability)?;
        check_unit("cluster_ratio", self.cluster_ratio)?;
        check_non_negative("processing_mean", self.processing_mean)?;
        check_non_negative("processing_std_dev", self.processing_std_dev)?;
        check_non_negative("batch_size_mean", self.batch_size_mean)?;
        check_non_negative("batch_size_std_dev", self.batch_size_std_dev)?;
        check_batch_bound("batch_size_mean", self.batch_size_mean)?;
        check_batch_bound("batch_size_std_dev", self.batch_size_std_dev)?;
        Ok(())
    }
}

fn invalid(message: &str) -> SimulationError {
    SimulationError::InvalidConfig(message.to_string())
}

fn check_unit(name: &str, value: f64) -> SimulationResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

fn check_non_negative(name: &str, value: f64) -> SimulationResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfig(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

fn check_batch_bound(name: &str, value: f64) -> SimulationResult<()> {
    if value <= f64::from(MAX_BATCH_SIZE) {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfig(format!(
            "{name} must be at most {MAX_BATCH_SIZE}, got {value}"
        )))
    }
}

/// Service-time distribution of a station, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceProfile {
    /// Mean service time.
    pub mean: f64,
    /// Standard deviation of the service time.
    pub std_dev: f64,
}

impl ServiceProfile {
    /// A profile whose every draw rounds to exactly `ticks`.
    pub fn fixed(ticks: u32) -> Self {
        Self {
            mean: f64::from(ticks),
            std_dev: 0.0,
        }
    }
}

impl Default for ServiceProfile {
    fn default() -> Self {
        HubConfig::default().service_profile()
    }
}

/// Shape of the parcel batches delivered by each truck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchProfile {
    /// Mean batch size.
    pub size_mean: f64,
    /// Standard deviation of the batch size.
    pub size_std_dev: f64,
    /// Fraction of the batch routed to one randomly chosen station.
    pub cluster_ratio: f64,
    /// Destinations are drawn from `0..station_count`.
    pub station_count: usize,
}
