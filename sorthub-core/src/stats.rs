//! Small numeric helpers for shift statistics.

use crate::error::{SimulationError, SimulationResult};

/// Arithmetic mean, or zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (divisor `n - 1`).
///
/// Undefined for fewer than two values, which is reported as
/// [`SimulationError::InsufficientStations`] since the values are
/// per-station loads.
pub fn sample_std_dev(values: &[f64]) -> SimulationResult<f64> {
    if values.len() < 2 {
        return Err(SimulationError::InsufficientStations(values.len()));
    }
    let mean = mean(values);
    let sum_squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok((sum_squares / (values.len() - 1) as f64).sqrt())
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub fn ratio_or_zero(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
