//! Append-only CSV log of shift results.
//!
//! The log owns run numbering: opening an existing file resumes from the
//! id after its last row, so repeated invocations keep extending one
//! series. The `run_id` carried by a [`ShiftResult`] is ignored on write.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sorthub_core::{ShiftResult, SimulationResult};

/// Column header written at the top of a new log.
pub const CSV_HEADER: &str = "RunId,Success,Duration,TotalTrucks,TotalParcels,MinInterarrival,MaxBeltLoad,MaxStationLoad,AvgProcessingTime,StationLoadStdDev";

/// An append-only CSV file of shift results.
#[derive(Debug)]
pub struct CsvResultLog {
    path: PathBuf,
    next_id: u64,
}

impl CsvResultLog {
    /// Open (or prepare to create) the log at `path`.
    ///
    /// Nothing is written until the first append.
    pub fn open(path: impl AsRef<Path>) -> SimulationResult<Self> {
        let path = path.as_ref().to_path_buf();
        let next_id = if path.exists() {
            resume_id(&fs::read_to_string(&path)?)
        } else {
            1
        };
        tracing::debug!(path = %path.display(), next_id, "opened result log");
        Ok(Self { path, next_id })
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id the next appended row will get.
    pub fn next_run_id(&self) -> u64 {
        self.next_id
    }

    /// Append one result; returns the run id it was logged under.
    pub fn append(&mut self, result: &ShiftResult) -> SimulationResult<u64> {
        let ids = self.append_all(std::slice::from_ref(result))?;
        Ok(ids.first().copied().unwrap_or(self.next_id - 1))
    }

    /// Append results in order; returns the run ids they were logged under.
    pub fn append_all(&mut self, results: &[ShiftResult]) -> SimulationResult<Vec<u64>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;
        let mut writer = BufWriter::new(file);

        if needs_header {
            writeln!(writer, "{CSV_HEADER}")?;
        }

        let mut ids = Vec::with_capacity(results.len());
        for result in results {
            writeln!(writer, "{}", format_row(self.next_id, result))?;
            ids.push(self.next_id);
            self.next_id += 1;
        }
        writer.flush()?;

        tracing::debug!(
            path = %self.path.display(),
            rows = results.len(),
            "appended results"
        );
        Ok(ids)
    }
}

/// One CSV row for `result` under `run_id`.
///
/// Success is written as `0`/`1`, the two averages with two decimals, and a
/// missing minimum inter-arrival gap as an empty field.
pub fn format_row(run_id: u64, result: &ShiftResult) -> String {
    let min_gap = result
        .min_interarrival_ticks
        .map(|t| t.to_string())
        .unwrap_or_default();
    format!(
        "{},{},{},{},{},{},{},{},{:.2},{:.2}",
        run_id,
        u8::from(result.success),
        result.duration_ticks,
        result.total_trucks,
        result.total_parcels,
        min_gap,
        result.max_belt_load,
        result.max_station_load,
        result.avg_processing_time,
        result.station_load_std_dev,
    )
}

/// Next run id given the existing contents of a log.
fn resume_id(contents: &str) -> u64 {
    let Some(last) = contents.lines().rev().find(|l| !l.trim().is_empty()) else {
        return 1;
    };
    if last.starts_with("RunId") {
        return 1;
    }
    last.split(',')
        .next()
        .and_then(|field| field.trim().parse::<u64>().ok())
        .map_or(1, |id| id + 1)
}
