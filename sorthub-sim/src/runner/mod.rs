//! Shift and stress-test runners.
//!
//! ## Submodules
//!
//! - `shift` - `run_shift`, one shift from first tick to end or jam
//! - `builder` - StressTestBuilder for many seeded shifts
//! - `report` - StressReport and its summary
//! - `display` - Colored terminal rendering of snapshots and reports

pub mod builder;
pub mod display;
pub mod report;
pub mod shift;

pub use builder::{Execution, StressTestBuilder};
pub use report::{StressReport, StressSummary};
pub use shift::{run_shift, ShiftHooks};
