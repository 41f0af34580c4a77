//! Visual mode: run a single shift and render the hub as it goes.
//!
//! ```bash
//! cargo run --bin sim-visual -- --seed 7 --every 60
//! ```

use std::path::PathBuf;

use clap::Parser;
use sorthub_core::{HubConfig, HubSnapshot, SimRandomProvider, ThreadRandomProvider};
use sorthub_sim::{
    builtin_invariants, eprint_shift_result, eprint_snapshot, run_shift, CsvResultLog,
    ShiftHooks,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "sim-visual")]
#[command(about = "Run one shift and print the hub state tick by tick", long_about = None)]
struct Args {
    /// Seed for a reproducible shift (unseeded if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Render one row every N ticks
    #[arg(long, default_value = "1")]
    every: u64,

    /// Append the result to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
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
    let every = args.every.max(1);
    let invariants = builtin_invariants();
    let mut render = |snapshot: &HubSnapshot| {
        if snapshot.jammed || snapshot.ticks_elapsed % every == 0 {
            eprint_snapshot(snapshot);
        }
    };
    let hooks = ShiftHooks::none()
        .with_invariants(&invariants)
        .with_observer(&mut render);

    let result = match args.seed {
        Some(seed) => {
            tracing::info!(seed, "running seeded shift");
            run_shift(1, &config, &SimRandomProvider::new(seed), hooks)?
        }
        None => run_shift(1, &config, &ThreadRandomProvider::new(), hooks)?,
    };

    eprintln!(
        "\nSimulation ended. Survived for {} ticks.",
        result.duration_ticks
    );
    eprint_shift_result(&result);

    if let Some(path) = args.csv {
        let mut log = CsvResultLog::open(&path)?;
        let run_id = log.append(&result)?;
        tracing::info!(path = %path.display(), run_id, "result logged");
    }

    Ok(())
}
