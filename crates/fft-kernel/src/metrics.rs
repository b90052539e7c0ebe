//! Stability metrics over raw and processed series.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};

/// Added to the variance so constant series have finite resilience.
pub const RESILIENCE_EPSILON: f64 = 1e-9;

fn non_empty<'a>(name: &'static str, series: &'a [f64]) -> Result<&'a [f64]> {
    if series.is_empty() {
        return Err(SignalError::invalid(name, "must not be empty"));
    }
    Ok(series)
}

pub fn mean(series: &[f64]) -> Result<f64> {
    let series = non_empty("series", series)?;
    Ok(series.iter().sum::<f64>() / series.len() as f64)
}

/// Mean squared deviation from the mean (divisor `len`).
pub fn population_variance(series: &[f64]) -> Result<f64> {
    let m = mean(series)?;
    Ok(series.iter().map(|x| (x - m).powi(2)).sum::<f64>() / series.len() as f64)
}

/// Mean absolute deviation from the mean.
pub fn mean_absolute_deviation(series: &[f64]) -> Result<f64> {
    let m = mean(series)?;
    Ok(series.iter().map(|x| (x - m).abs()).sum::<f64>() / series.len() as f64)
}

/// `1 / (variance + 1e-9)`: higher means a more stable signal.
pub fn resilience(series: &[f64]) -> Result<f64> {
    Ok(1.0 / (population_variance(series)? + RESILIENCE_EPSILON))
}

/// Relative drop in mean absolute deviation, clamped at 0.
///
/// Fails with `InvalidParameter` when `original` has zero deviation instead of
/// returning NaN or infinity.
pub fn error_reduction(original: &[f64], processed: &[f64]) -> Result<f64> {
    let original_dev = mean_absolute_deviation(non_empty("original", original)?)?;
    let processed_dev = mean_absolute_deviation(non_empty("processed", processed)?)?;

    if original_dev == 0.0 {
        return Err(SignalError::invalid(
            "original",
            "mean absolute deviation is zero; error reduction is undefined",
        ));
    }

    Ok((1.0 - processed_dev / original_dev).max(0.0))
}

/// The three scalars shown for one raw/smoothed pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub resilience_before: f64,
    pub resilience_after: f64,
    /// Fraction in `[0, 1]`
    pub error_reduction: f64,
}

impl Evaluation {
    pub fn error_reduction_percent(&self) -> f64 {
        self.error_reduction * 100.0
    }

    /// `resilience_after / resilience_before`.
    pub fn resilience_gain(&self) -> f64 {
        self.resilience_after / self.resilience_before
    }
}

/// Compute resilience before/after and error reduction.
pub fn evaluate(original: &[f64], processed: &[f64]) -> Result<Evaluation> {
    Ok(Evaluation {
        resilience_before: resilience(non_empty("original", original)?)?,
        resilience_after: resilience(non_empty("processed", processed)?)?,
        error_reduction: error_reduction(original, processed)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_uses_population_divisor() {
        let series = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&series).unwrap() - 5.0).abs() < 1e-12);
        assert!((population_variance(&series).unwrap() - 4.0).abs() < 1e-12);
        assert!((mean_absolute_deviation(&series).unwrap() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_resilience() {
        let r = resilience(&[3.0; 16]).unwrap();
        assert!((r - 1e9).abs() < 1e-3);
    }

    #[test]
    fn test_resilience_is_inverse_variance() {
        let r = resilience(&[0.0, 1.0, 0.0, -1.0]).unwrap();
        assert!((r - 1.0 / (0.5 + 1e-9)).abs() < 1e-12);
    }

    #[test]
    fn test_identical_series_has_zero_reduction() {
        let x = [0.3, -1.2, 2.5, 0.0, 0.7];
        assert_eq!(error_reduction(&x, &x).unwrap(), 0.0);
    }

    #[test]
    fn test_reduction_is_clamped_at_zero() {
        let calm = [0.0, 0.1, 0.0, -0.1];
        let wild = [0.0, 5.0, 0.0, -5.0];
        assert_eq!(error_reduction(&calm, &wild).unwrap(), 0.0);
        assert!((error_reduction(&wild, &calm).unwrap() - 0.98).abs() < 1e-12);
    }

    #[test]
    fn test_constant_processed_is_full_reduction() {
        let x = [1.0, -1.0, 1.0, -1.0];
        assert_eq!(error_reduction(&x, &[0.0; 4]).unwrap(), 1.0);
    }

    #[test]
    fn test_zero_deviation_original_is_rejected() {
        let err = error_reduction(&[2.0; 5], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            SignalError::InvalidParameter { name: "original", .. }
        ));
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        assert!(resilience(&[]).is_err());
        assert!(error_reduction(&[], &[1.0]).is_err());
        assert!(matches!(
            error_reduction(&[1.0, 2.0], &[]),
            Err(SignalError::InvalidParameter { name: "processed", .. })
        ));
    }

    #[test]
    fn test_evaluate_bundles_metrics() {
        let original = [0.0, 2.0, 0.0, -2.0];
        let processed = [0.0, 1.0, 0.0, -1.0];
        let eval = evaluate(&original, &processed).unwrap();

        assert!((eval.resilience_before - 1.0 / (2.0 + 1e-9)).abs() < 1e-12);
        assert!((eval.resilience_after - 1.0 / (0.5 + 1e-9)).abs() < 1e-12);
        assert!((eval.error_reduction - 0.5).abs() < 1e-12);
        assert!((eval.error_reduction_percent() - 50.0).abs() < 1e-9);
        assert!(eval.resilience_gain() > 3.9);
    }
}
