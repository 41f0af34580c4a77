//! End-to-end stress runs over the public API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sorthub_core::{HubConfig, SimRandomProvider};
use sorthub_sim::{
    builtin_invariants, run_shift, CsvResultLog, Execution, ShiftHooks, StressTestBuilder,
};

fn short_shift() -> HubConfig {
    HubConfig {
        shift_length_ticks: 3_600,
        ..HubConfig::default()
    }
}

#[test]
fn overloaded_hub_always_jams() {
    let config = HubConfig {
        truck_arrival_probability: 0.5,
        ..short_shift()
    };
    let report = StressTestBuilder::new()
        .config(config)
        .set_iterations(20)
        .set_base_seed(1)
        .invariants(builtin_invariants())
        .execution(Execution::Parallel)
        .run()
        .unwrap_or_else(|e| panic!("stress test failed: {e}"));

    assert_eq!(report.failed_runs, 20);
    assert_eq!(report.failure_rate(), 100.0);
    assert_eq!(report.seeds_failing, report.seeds_used);
    assert!(report.average_survival_ticks() < 3_600.0);
    for result in &report.results {
        assert!(!result.success);
        assert_eq!(result.max_belt_load, 300);
    }
}

#[test]
fn idle_hub_always_survives() {
    let config = HubConfig {
        truck_arrival_probability: 0.0,
        ..short_shift()
    };
    let report = StressTestBuilder::new()
        .config(config)
        .set_iterations(5)
        .set_base_seed(2)
        .run()
        .unwrap_or_else(|e| panic!("stress test failed: {e}"));

    assert_eq!(report.successful_runs, 5);
    assert!(report.seeds_failing.is_empty());
    assert_eq!(report.average_survival_ticks(), 3_600.0);
}

#[test]
fn custom_invariant_runs_every_tick() {
    let ticks = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&ticks);
    let config = HubConfig {
        truck_arrival_probability: 0.0,
        shift_length_ticks: 250,
        ..HubConfig::default()
    };

    let report = StressTestBuilder::new()
        .config(config)
        .set_iterations(4)
        .set_debug_seeds(vec![10, 20, 30, 40])
        .invariant_fn("count_ticks", move |_, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .run();

    assert!(report.is_ok());
    assert_eq!(ticks.load(Ordering::Relaxed), 4 * 250);
}

#[test]
fn same_seed_replays_identically() {
    let config = short_shift();
    let from_stress = StressTestBuilder::new()
        .config(config.clone())
        .set_debug_seeds(vec![777])
        .run()
        .unwrap_or_else(|e| panic!("stress test failed: {e}"));

    let replay = run_shift(
        1,
        &config,
        &SimRandomProvider::new(777),
        ShiftHooks::none(),
    )
    .unwrap_or_else(|e| panic!("replay failed: {e}"));

    assert_eq!(from_stress.results, vec![replay]);
}

#[test]
fn stress_results_land_in_csv() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = dir.path().join("simulation_data.csv");

    let report = StressTestBuilder::new()
        .config(short_shift())
        .set_iterations(6)
        .set_base_seed(3)
        .run()
        .unwrap_or_else(|e| panic!("stress test failed: {e}"));

    let mut log = CsvResultLog::open(&path).unwrap_or_else(|e| panic!("open: {e}"));
    let ids = log
        .append_all(&report.results)
        .unwrap_or_else(|e| panic!("append: {e}"));
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

    let contents = std::fs::read_to_string(&path).unwrap_or_default();
    let rows: Vec<&str> = contents.lines().skip(1).collect();
    assert_eq!(rows.len(), 6);
    for (row, result) in rows.iter().zip(&report.results) {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 10);
        assert_eq!(fields[1], if result.success { "1" } else { "0" });
        assert_eq!(fields[2], result.duration_ticks.to_string());
    }
}
