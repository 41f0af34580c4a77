//! Stress test: run many shifts under the default hub and report the jam rate.
//!
//! ```bash
//! cargo run --bin sim-stress
//! cargo run --bin sim-stress -- --runs 200 --seed 42 --parallel
//! cargo run --bin sim-stress -- --no-csv --json
//! ```

use std::path::PathBuf;

use clap::Parser;
use sorthub_core::HubConfig;
use sorthub_sim::{
    builtin_invariants, eprint_report, CsvResultLog, Execution, StressTestBuilder,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "sim-stress")]
#[command(about = "Run many simulated shifts and measure how often the hub jams", long_about = None)]
struct Args {
    /// Number of shifts to simulate
    #[arg(long, default_value = "1000")]
    runs: usize,

    /// Base seed for per-run seeds (wall clock if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// CSV file results are appended to
    #[arg(long, default_value = "simulation_data.csv")]
    csv: PathBuf,

    /// Do not write the CSV log
    #[arg(long)]
    no_csv: bool,

    /// Spread shifts over all cores
    #[arg(long)]
    parallel: bool,

    /// Print the summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Check hub invariants after every tick
    #[arg(long)]
    check_invariants: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = HubConfig::default();
    tracing::info!(config = %serde_json::to_string(&config)?, "hub configuration");

    let mut builder = StressTestBuilder::new()
        .config(config)
        .set_iterations(args.runs)
        .execution(if args.parallel {
            Execution::Parallel
        } else {
            Execution::Sequential
        });
    if let Some(seed) = args.seed {
        builder = builder.set_base_seed(seed);
    }
    if args.check_invariants {
        builder = builder.invariants(builtin_invariants());
    }

    let report = builder.run()?;

    if !args.no_csv {
        let mut log = CsvResultLog::open(&args.csv)?;
        let ids = log.append_all(&report.results)?;
        tracing::info!(
            path = %args.csv.display(),
            rows = ids.len(),
            first_id = ids.first().copied().unwrap_or_default(),
            "results logged"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
    } else {
        eprint_report(&report);
    }

    Ok(())
}
