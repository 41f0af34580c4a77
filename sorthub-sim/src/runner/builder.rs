//! Stress test builder: many independent shifts, one seed each.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use sorthub_core::{HubConfig, ShiftResult, SimRandomProvider, SimulationResult};
use tracing::instrument;

use crate::invariants::Invariant;

use super::report::StressReport;
use super::shift::{run_shift, ShiftHooks};

/// Shifts between progress heartbeats.
const HEARTBEAT_INTERVAL: usize = 100;

/// How the shifts of a stress test are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    /// One shift after another on the calling thread.
    #[default]
    Sequential,
    /// Shifts spread over the rayon global thread pool.
    ///
    /// Shifts share no state, so results are identical to a sequential
    /// run with the same seeds; only their completion order differs.
    Parallel,
}

/// Builder pattern for configuring and running a stress test.
pub struct StressTestBuilder {
    iterations: usize,
    seeds: Vec<u64>,
    base_seed: Option<u64>,
    config: HubConfig,
    invariants: Vec<Box<dyn Invariant>>,
    execution: Execution,
}

impl Default for StressTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StressTestBuilder {
    /// Create a builder for a single shift under the default configuration.
    pub fn new() -> Self {
        Self {
            iterations: 1,
            seeds: Vec::new(),
            base_seed: None,
            config: HubConfig::default(),
            invariants: Vec::new(),
            execution: Execution::Sequential,
        }
    }

    /// Set the number of shifts to run.
    pub fn set_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set specific seeds for deterministic debugging and regression testing.
    ///
    /// Seed `i` drives iteration `i`; iterations past the end of the list
    /// get derived seeds.
    pub fn set_debug_seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Derive per-iteration seeds from this base instead of the wall clock.
    pub fn set_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    /// Hub configuration shared by every shift.
    pub fn config(mut self, config: HubConfig) -> Self {
        self.config = config;
        self
    }

    /// Add an invariant to be checked after every tick of every shift.
    pub fn invariant(mut self, i: impl Invariant + 'static) -> Self {
        self.invariants.push(Box::new(i));
        self
    }

    /// Add several boxed invariants at once.
    pub fn invariants(mut self, invariants: impl IntoIterator<Item = Box<dyn Invariant>>) -> Self {
        self.invariants.extend(invariants);
        self
    }

    /// Add a closure-based invariant.
    pub fn invariant_fn(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&sorthub_core::HubSnapshot, Option<&sorthub_core::HubSnapshot>)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.invariants.push(crate::invariants::invariant_fn(name, f));
        self
    }

    /// Choose sequential or parallel execution.
    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Seed for every iteration, explicit seeds first.
    fn resolve_seeds(&self) -> Vec<u64> {
        let base_seed = self.base_seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::SystemTime::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(12345)
        });

        (0..self.iterations)
            .map(|i| match self.seeds.get(i) {
                Some(seed) => *seed,
                None => {
                    let mut hasher = DefaultHasher::new();
                    base_seed.hash(&mut hasher);
                    i.hash(&mut hasher);
                    hasher.finish()
                }
            })
            .collect()
    }

    #[instrument(skip_all)]
    /// Run every shift and collect a report.
    ///
    /// Fails only if the configuration is invalid. Run ids are 1-based and
    /// follow iteration order regardless of execution mode.
    pub fn run(self) -> SimulationResult<StressReport> {
        self.config.validate()?;

        let seeds = self.resolve_seeds();
        let total = seeds.len();
        let finished = AtomicUsize::new(0);
        let start_time = Instant::now();

        tracing::info!(
            iterations = total,
            execution = ?self.execution,
            "Starting stress test"
        );

        let run_one = |(index, seed): (usize, &u64)| -> SimulationResult<ShiftResult> {
            let rng = SimRandomProvider::new(*seed);
            let hooks = ShiftHooks::none().with_invariants(&self.invariants);
            let result = run_shift(index as u64 + 1, &self.config, &rng, hooks)?;

            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            if done % HEARTBEAT_INTERVAL == 0 {
                tracing::info!("{}/{} shifts complete", done, total);
            }
            if !result.success {
                tracing::debug!(
                    run_id = result.run_id,
                    seed = *seed,
                    tick = result.duration_ticks,
                    "shift jammed"
                );
            }
            Ok(result)
        };

        let results = match self.execution {
            Execution::Sequential => seeds
                .iter()
                .enumerate()
                .map(run_one)
                .collect::<SimulationResult<Vec<_>>>()?,
            Execution::Parallel => seeds
                .par_iter()
                .enumerate()
                .map(run_one)
                .collect::<SimulationResult<Vec<_>>>()?,
        };

        let report = StressReport::from_runs(
            self.config.shift_length_ticks,
            start_time.elapsed(),
            seeds,
            results,
        );

        tracing::info!(
            "Stress test completed: {}/{} shifts survived",
            report.successful_runs,
            report.iterations
        );
        if report.failed_runs > 0 {
            tracing::warn!(
                "{} shifts jammed - failing seeds: {:?}",
                report.failed_runs,
                report.seeds_failing
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::builtin_invariants;

    fn short_config() -> HubConfig {
        HubConfig {
            shift_length_ticks: 2_000,
            ..HubConfig::default()
        }
    }

    #[test]
    fn test_stress_builder_basic() {
        let report = StressTestBuilder::new()
            .config(short_config())
            .set_iterations(3)
            .set_debug_seeds(vec![1, 2, 3])
            .run()
            .unwrap_or_else(|e| panic!("stress test failed: {e}"));

        assert_eq!(report.iterations, 3);
        assert_eq!(report.successful_runs + report.failed_runs, 3);
        assert_eq!(report.seeds_used, vec![1, 2, 3]);
        let ids: Vec<u64> = report.results.iter().map(|r| r.run_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_derived_seeds_follow_base_seed() {
        let a = StressTestBuilder::new()
            .set_iterations(4)
            .set_debug_seeds(vec![7])
            .set_base_seed(42)
            .resolve_seeds();
        let b = StressTestBuilder::new()
            .set_iterations(4)
            .set_debug_seeds(vec![7])
            .set_base_seed(42)
            .resolve_seeds();

        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        assert_eq!(a[0], 7);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let run = |execution: Execution| {
            StressTestBuilder::new()
                .config(short_config())
                .set_iterations(8)
                .set_base_seed(2024)
                .invariants(builtin_invariants())
                .execution(execution)
                .run()
                .map(|r| r.results)
        };

        let sequential = run(Execution::Sequential);
        assert!(sequential.is_ok());
        assert_eq!(sequential, run(Execution::Parallel));
    }

    #[test]
    fn test_invalid_config_fails_run() {
        let config = HubConfig {
            cluster_ratio: 1.5,
            ..HubConfig::default()
        };
        let result = StressTestBuilder::new().config(config).run();
        assert!(result.is_err());
    }
}
