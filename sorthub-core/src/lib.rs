//! # sorthub-core
//!
//! Fixed-timestep simulation engine for a package sortation hub.
//!
//! Trucks arrive at random and unload clustered batches of parcels onto a
//! shared belt. A scanner diverts a bounded number of parcels per tick into
//! per-destination station queues, and each station serves one parcel at a
//! time with a Gaussian service time. If the belt overflows, the hub jams
//! and the shift is lost.
//!
//! ## Components
//!
//! - [`RandomProvider`]: injectable randomness ([`SimRandomProvider`] for
//!   seeded runs, [`ThreadRandomProvider`] for unseeded ones)
//! - [`sample_normal`]: Box–Muller Gaussian variates
//! - [`ArrivalGenerator`]: clustered, shuffled parcel batches
//! - [`Station`]: bounded queue plus single server
//! - [`SortationHub`]: the two-phase tick (sort, then serve) and jam detection
//! - [`ResultAggregator`]: reduces a finished hub into a [`ShiftResult`]
//!
//! ## Example
//!
//! ```rust
//! use sorthub_core::{
//!     ArrivalGenerator, HubConfig, RandomProvider, ResultAggregator, SimRandomProvider,
//!     SortationHub,
//! };
//!
//! let config = HubConfig::default();
//! let rng = SimRandomProvider::new(42);
//! let mut hub = SortationHub::from_config(&config);
//! let mut arrivals = ArrivalGenerator::new(config.batch_profile())?;
//!
//! for tick in 1..=600 {
//!     if rng.random_bool(config.truck_arrival_probability) {
//!         hub.record_arrival(tick);
//!         for parcel in arrivals.generate_batch(&rng, tick) {
//!             let _ = hub.ingest(parcel)?;
//!         }
//!     }
//!     hub.tick(&rng);
//! }
//!
//! let result = ResultAggregator::summarize(1, &hub, !hub.is_jammed(), 600)?;
//! assert_eq!(result.duration_ticks, 600);
//! # Ok::<(), sorthub_core::SimulationError>(())
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod arrival;
pub mod config;
mod error;
pub mod hub;
pub mod parcel;
pub mod random;
pub mod result;
pub mod station;
pub mod stats;
pub mod variate;

pub use arrival::ArrivalGenerator;
pub use config::{
    BatchProfile, HubConfig, ServiceProfile, MAX_BATCH_SIZE, MAX_STATIONS, MIN_STATIONS,
};
pub use error::{SimulationError, SimulationResult};
pub use hub::{
    HubCounters, HubSnapshot, IngestOutcome, SortationHub, StationSnapshot, TickSummary,
    DEFAULT_SCANNER_THROUGHPUT,
};
pub use parcel::{Parcel, ParcelId};
pub use random::{RandomProvider, SimRandomProvider, ThreadRandomProvider};
pub use result::{ResultAggregator, ShiftResult};
pub use station::{EnqueueOutcome, ServiceStep, Station, StationState, StationStats};
pub use variate::{sample_normal, sample_positive_count};
