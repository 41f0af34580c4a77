//! # sorthub-sim
//!
//! Drivers for the `sorthub-core` engine: run one shift, stress-test a hub
//! configuration across many seeds, check invariants after every tick, and
//! report results on the terminal or in a CSV log.
//!
//! ## Quick Start
//!
//! ```rust
//! use sorthub_core::HubConfig;
//! use sorthub_sim::{builtin_invariants, StressTestBuilder};
//!
//! let report = StressTestBuilder::new()
//!     .config(HubConfig {
//!         shift_length_ticks: 1_000,
//!         ..HubConfig::default()
//!     })
//!     .set_iterations(4)
//!     .set_base_seed(7)
//!     .invariants(builtin_invariants())
//!     .run()?;
//!
//! assert_eq!(report.iterations, 4);
//! println!("{report}");
//! # Ok::<(), sorthub_core::SimulationError>(())
//! ```
//!
//! Replaying a failing seed:
//!
//! ```rust
//! use sorthub_core::{HubConfig, SimRandomProvider};
//! use sorthub_sim::{run_shift, ShiftHooks};
//!
//! let config = HubConfig::default();
//! let rng = SimRandomProvider::new(0xDEAD_BEEF);
//! let result = run_shift(1, &config, &rng, ShiftHooks::none())?;
//! assert!(result.duration_ticks <= config.shift_length_ticks);
//! # Ok::<(), sorthub_core::SimulationError>(())
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod invariants;
pub mod persist;
pub mod runner;

pub use invariants::{
    builtin_invariants, invariant_fn, BeltWithinDepth, BusyMeansRemaining, Invariant,
    JamIsTerminal, QueueWithinCapacity,
};
pub use persist::{CsvResultLog, CSV_HEADER};
pub use runner::display::{eprint_report, eprint_shift_result, eprint_snapshot};
pub use runner::{
    run_shift, Execution, ShiftHooks, StressReport, StressSummary, StressTestBuilder,
};
