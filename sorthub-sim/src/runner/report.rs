//! Stress test results and reporting.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use sorthub_core::ShiftResult;

/// Report of a stress test: many independent shifts under one configuration.
#[derive(Debug, Clone)]
pub struct StressReport {
    /// Number of shifts executed
    pub iterations: usize,
    /// Shifts that ran to the end without jamming
    pub successful_runs: usize,
    /// Shifts that jammed
    pub failed_runs: usize,
    /// Ticks in a full shift
    pub shift_length_ticks: u64,
    /// Wall-clock time taken for the whole stress test
    pub wall_time: Duration,
    /// Seeds used for each iteration, in run order
    pub seeds_used: Vec<u64>,
    /// Seeds whose shift jammed
    pub seeds_failing: Vec<u64>,
    /// Every shift result, in run order
    pub results: Vec<ShiftResult>,
}

impl StressReport {
    pub(crate) fn from_runs(
        shift_length_ticks: u64,
        wall_time: Duration,
        seeds_used: Vec<u64>,
        results: Vec<ShiftResult>,
    ) -> Self {
        let seeds_failing: Vec<u64> = seeds_used
            .iter()
            .zip(&results)
            .filter(|(_, r)| !r.success)
            .map(|(seed, _)| *seed)
            .collect();
        let failed_runs = seeds_failing.len();

        Self {
            iterations: results.len(),
            successful_runs: results.len() - failed_runs,
            failed_runs,
            shift_length_ticks,
            wall_time,
            seeds_used,
            seeds_failing,
            results,
        }
    }

    /// Share of jammed shifts as a percentage.
    pub fn failure_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            (self.failed_runs as f64 / self.iterations as f64) * 100.0
        }
    }

    /// Share of surviving shifts as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            (self.successful_runs as f64 / self.iterations as f64) * 100.0
        }
    }

    /// Mean number of ticks a shift lasted.
    ///
    /// Surviving shifts count for the full shift length, jammed ones for
    /// the tick at which they jammed.
    pub fn average_survival_ticks(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            let total: u64 = self.results.iter().map(|r| r.duration_ticks).sum();
            total as f64 / self.results.len() as f64
        }
    }

    /// Get the average wall time per iteration.
    pub fn average_wall_time(&self) -> Duration {
        if self.iterations == 0 {
            Duration::ZERO
        } else {
            self.wall_time / self.iterations as u32
        }
    }

    /// Headline figures without the per-run data.
    pub fn summary(&self) -> StressSummary {
        StressSummary {
            iterations: self.iterations,
            successful_runs: self.successful_runs,
            failed_runs: self.failed_runs,
            failure_rate: self.failure_rate(),
            average_survival_ticks: self.average_survival_ticks(),
            wall_time_ms: self.wall_time.as_millis() as u64,
            seeds_failing: self.seeds_failing.clone(),
        }
    }
}

/// Headline figures of a [`StressReport`], suitable for machine-readable output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressSummary {
    /// Number of shifts executed
    pub iterations: usize,
    /// Shifts that ran to the end without jamming
    pub successful_runs: usize,
    /// Shifts that jammed
    pub failed_runs: usize,
    /// Share of jammed shifts, in percent
    pub failure_rate: f64,
    /// Mean ticks survived per shift
    pub average_survival_ticks: f64,
    /// Wall-clock time of the whole stress test
    pub wall_time_ms: u64,
    /// Seeds whose shift jammed
    pub seeds_failing: Vec<u64>,
}

impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Stress Test Report ===")?;
        writeln!(f, "Total Runs:        {}", self.iterations)?;
        writeln!(f, "Successful Shifts: {}", self.successful_runs)?;
        writeln!(f, "Failed Shifts:     {}", self.failed_runs)?;
        writeln!(f, "Failure Rate:      {:.2}%", self.failure_rate())?;
        writeln!(
            f,
            "Avg Survival Time: {:.0} ticks",
            self.average_survival_ticks()
        )?;
        writeln!(f, "Average Wall Time: {:?}", self.average_wall_time())?;

        if !self.seeds_failing.is_empty() {
            writeln!(f)?;
            writeln!(f, "Faulty seeds: {:?}", self.seeds_failing)?;
        }

        Ok(())
    }
}
