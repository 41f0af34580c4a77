//! Gaussian variates for batch sizes and service durations.

use std::f64::consts::PI;

use crate::random::RandomProvider;

/// Draw a normally distributed sample with the Box–Muller transform.
///
/// Both uniforms are taken as `1 - u` with `u` in `[0, 1)`, which keeps them
/// in `(0, 1]` and away from the logarithm singularity at zero. The output is
/// unbounded; callers clamp it to whatever their domain allows.
pub fn sample_normal<R: RandomProvider>(rng: &R, mean: f64, std_dev: f64) -> f64 {
    let u1 = 1.0 - rng.random_ratio();
    let u2 = 1.0 - rng.random_ratio();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin();
    mean + std_dev * z
}

/// Draw a normal sample and round it to a whole count of at least one.
///
/// Rounding is half-to-even, so `2.5` becomes `2` and `3.5` becomes `4`.
pub fn sample_positive_count<R: RandomProvider>(rng: &R, mean: f64, std_dev: f64) -> u32 {
    round_at_least_one(sample_normal(rng, mean, std_dev))
}

pub(crate) fn round_at_least_one(value: f64) -> u32 {
    // `as` saturates: NaN maps to 0 and huge values to u32::MAX.
    (value.round_ties_even() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SimRandomProvider;

    #[test]
    fn test_zero_std_dev_returns_mean() {
        let rng = SimRandomProvider::new(1);
        for _ in 0..20 {
            assert_eq!(sample_normal(&rng, 5.0, 0.0), 5.0);
        }
    }

    #[test]
    fn test_sample_moments() {
        let rng = SimRandomProvider::new(2024);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| sample_normal(&rng, 100.0, 25.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

        assert!((mean - 100.0).abs() < 1.0, "mean drifted: {mean}");
        assert!((var.sqrt() - 25.0).abs() < 1.0, "std dev drifted: {}", var.sqrt());
    }

    #[test]
    fn test_rounding_half_even_and_floor_of_one() {
        assert_eq!(round_at_least_one(2.5), 2);
        assert_eq!(round_at_least_one(3.5), 4);
        assert_eq!(round_at_least_one(4.4), 4);
        assert_eq!(round_at_least_one(0.5), 1);
        assert_eq!(round_at_least_one(-7.0), 1);
        assert_eq!(round_at_least_one(f64::NAN), 1);
    }

    #[test]
    fn test_positive_count_never_zero() {
        let rng = SimRandomProvider::new(9);
        for _ in 0..1_000 {
            assert!(sample_positive_count(&rng, 0.0, 3.0) >= 1);
        }
    }
}
