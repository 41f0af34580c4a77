//! Colored terminal display for hub snapshots, shift results and stress reports.
//!
//! Provides rich, colorized output for TTY stderr. Falls back to plain text
//! when stderr is not a terminal or `NO_COLOR` is set.

use std::io::{IsTerminal, Write};

use sorthub_core::{HubSnapshot, ShiftResult};

use super::report::StressReport;

// ---------------------------------------------------------------------------
// ANSI escape helpers
// ---------------------------------------------------------------------------

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BOLD_RED: &str = "\x1b[1;31m";
    pub const BOLD_GREEN: &str = "\x1b[1;32m";
    pub const BOLD_CYAN: &str = "\x1b[1;36m";
}

/// Whether to emit ANSI color codes.
pub fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Belt depth, as a fraction of the maximum, from which it is highlighted.
const BELT_WARNING_FRACTION: f64 = 0.9;

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a `u64` with comma separators.
fn fmt_num(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a duration as a human-readable string.
fn fmt_duration(d: std::time::Duration) -> String {
    let total_ms = d.as_millis();
    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        let mins = d.as_secs() / 60;
        let secs = d.as_secs() % 60;
        format!("{}m {:02}s", mins, secs)
    }
}

/// Wrap `text` in `style` when coloring.
fn paint(text: &str, style: &str, color: bool) -> String {
    if color {
        format!("{style}{text}{}", ansi::RESET)
    } else {
        text.to_string()
    }
}

// ---------------------------------------------------------------------------
// Progress bar
// ---------------------------------------------------------------------------

const BAR_WIDTH: usize = 20;

/// Render a progress bar: `████████░░░░░░░░░░░░  40.0%`
fn progress_bar(fraction: f64, color: bool) -> String {
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let empty = BAR_WIDTH - filled;

    let bar_color = if !color {
        ""
    } else if fraction >= 0.9 {
        ansi::GREEN
    } else if fraction >= 0.5 {
        ansi::YELLOW
    } else {
        ansi::RED
    };
    let reset = if color { ansi::RESET } else { "" };

    format!(
        "{}{}{}{}  {:.1}%",
        bar_color,
        "█".repeat(filled),
        "░".repeat(empty),
        reset,
        fraction * 100.0
    )
}

// ---------------------------------------------------------------------------
// Section header
// ---------------------------------------------------------------------------

const RULE_WIDTH: usize = 56;

/// Print a section header like: `━━━ Title ━━━━━━━━━━━━━━━━━━━━━━`
fn section_header(w: &mut impl Write, title: &str, color: bool, style: &str) {
    let prefix = "━━━ ";
    let content_len = prefix.chars().count() + title.len() + 1;
    let trail = RULE_WIDTH.saturating_sub(content_len).max(3);
    let rule = "━".repeat(trail);

    if color {
        let _ = writeln!(w, "\n{style}{prefix}{title} {rule}{}", ansi::RESET);
    } else {
        let _ = writeln!(w, "\n{prefix}{title} {rule}");
    }
}

// ---------------------------------------------------------------------------
// Per-tick rows
// ---------------------------------------------------------------------------

/// Print one snapshot row to stderr.
pub fn eprint_snapshot(snapshot: &HubSnapshot) {
    let color = use_color();
    let mut w = std::io::stderr().lock();
    write_snapshot(&mut w, snapshot, color);
}

/// Render one snapshot as a single row:
/// tick, belt depth, every station, hub status.
pub fn write_snapshot(w: &mut impl Write, snapshot: &HubSnapshot, color: bool) {
    let warn_at = (snapshot.max_belt_depth as f64 * BELT_WARNING_FRACTION).ceil() as usize;
    let belt = format!("{:>4}", snapshot.belt_depth);
    let belt = if snapshot.belt_depth >= warn_at {
        paint(&belt, ansi::BOLD_RED, color)
    } else {
        belt
    };

    let _ = write!(w, "{:>6} │ belt {} │", snapshot.ticks_elapsed, belt);

    for station in &snapshot.stations {
        let cell = if station.busy {
            paint(&format!("Busy ({})", station.remaining_ticks), ansi::RED, color)
        } else {
            paint("Idle", ansi::GREEN, color)
        };
        let _ = write!(w, " {cell}");
    }

    let status = if snapshot.jammed {
        paint("CRITICAL JAM", ansi::BOLD_RED, color)
    } else {
        paint("RUNNING", ansi::GREEN, color)
    };
    let _ = writeln!(w, " │ {status}");
}

// ---------------------------------------------------------------------------
// Shift result block
// ---------------------------------------------------------------------------

/// Print a shift result to stderr.
pub fn eprint_shift_result(result: &ShiftResult) {
    let color = use_color();
    let mut w = std::io::stderr().lock();
    write_shift_result(&mut w, result, color);
}

/// Render every field of a shift result.
pub fn write_shift_result(w: &mut impl Write, result: &ShiftResult, color: bool) {
    section_header(w, "Shift Result", color, ansi::BOLD_CYAN);

    let outcome = if result.success {
        paint("✓ survived", ansi::BOLD_GREEN, color)
    } else {
        paint("✗ jammed", ansi::BOLD_RED, color)
    };
    let min_gap = result
        .min_interarrival_ticks
        .map_or_else(|| "-".to_string(), fmt_num);

    let _ = writeln!(w, "  Run Id             {}", result.run_id);
    let _ = writeln!(w, "  Outcome            {outcome}");
    let _ = writeln!(w, "  Duration           {} ticks", fmt_num(result.duration_ticks));
    let _ = writeln!(w, "  Total Trucks       {}", fmt_num(result.total_trucks));
    let _ = writeln!(w, "  Total Parcels      {}", fmt_num(result.total_parcels));
    let _ = writeln!(w, "  Min Interarrival   {min_gap}");
    let _ = writeln!(w, "  Max Belt Load      {}", result.max_belt_load);
    let _ = writeln!(w, "  Max Station Load   {}", result.max_station_load);
    let _ = writeln!(w, "  Avg Process Time   {:.2}", result.avg_processing_time);
    let _ = writeln!(w, "  Station Load StdD  {:.2}", result.station_load_std_dev);
    let _ = writeln!(w);
}

// ---------------------------------------------------------------------------
// Stress report
// ---------------------------------------------------------------------------

/// Print the stress report to stderr with colors if supported.
pub fn eprint_report(report: &StressReport) {
    let color = use_color();
    let mut w = std::io::stderr().lock();
    write_report(&mut w, report, color);
}

/// Render a stress report.
pub fn write_report(w: &mut impl Write, report: &StressReport, color: bool) {
    section_header(w, "Stress Test Report", color, ansi::BOLD_CYAN);

    let (icon, style) = if report.failed_runs == 0 {
        ("✓", ansi::BOLD_GREEN)
    } else {
        ("✗", ansi::BOLD_RED)
    };
    let rate = paint(
        &format!("{icon} {:.2}% jammed", report.failure_rate()),
        style,
        color,
    );
    let _ = writeln!(
        w,
        "  {} shifts   {} survived   {} failed   {rate}",
        fmt_num(report.iterations as u64),
        fmt_num(report.successful_runs as u64),
        fmt_num(report.failed_runs as u64),
    );

    let _ = writeln!(w);
    let survival_fraction = if report.shift_length_ticks == 0 {
        0.0
    } else {
        report.average_survival_ticks() / report.shift_length_ticks as f64
    };
    let _ = writeln!(
        w,
        "  Survival     {}   {} ticks avg",
        progress_bar(survival_fraction, color),
        fmt_num(report.average_survival_ticks().round() as u64),
    );
    let _ = writeln!(
        w,
        "  Wall Time    {:<14} {} total",
        fmt_duration(report.average_wall_time()) + " avg",
        fmt_duration(report.wall_time),
    );

    if !report.seeds_failing.is_empty() {
        let _ = writeln!(w);
        let label = paint("Faulty seeds:", ansi::BOLD_RED, color);
        let shown: Vec<u64> = report.seeds_failing.iter().take(10).copied().collect();
        let more = report.seeds_failing.len().saturating_sub(shown.len());
        if more > 0 {
            let dim = paint(&format!("(+{more} more)"), ansi::DIM, color);
            let _ = writeln!(w, "  {label} {shown:?} {dim}");
        } else {
            let _ = writeln!(w, "  {label} {shown:?}");
        }
    }

    let _ = writeln!(w);
}
