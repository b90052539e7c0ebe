//! Configuration types for the signal core.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};

/// Default fraction of the spectrum retained by the smoother.
pub const DEFAULT_KEEP_RATIO: f64 = 0.1;

/// Default standard deviation of the additive Gaussian noise.
pub const DEFAULT_NOISE_STD_DEV: f64 = 0.7;

/// Upper end of the sampling domain `[0, DOMAIN_END]` for the base waveform.
pub const DOMAIN_END: f64 = 20.0;

/// Signal generation parameters.
///
/// Loaded from JSON by front ends; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of simulated agents (one series each)
    pub agent_count: usize,

    /// Samples per series
    pub step_count: usize,

    /// Standard deviation of the i.i.d. Gaussian noise (0.0 disables noise)
    pub noise_std_dev: f64,

    /// Spacing between timestamps in the table index (milliseconds)
    pub sample_interval_ms: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            agent_count: 10,
            step_count: 200,
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
            sample_interval_ms: 1_000,
        }
    }
}

impl GeneratorConfig {
    /// Config with the given counts and default noise.
    pub fn new(agent_count: usize, step_count: usize) -> Self {
        Self {
            agent_count,
            step_count,
            ..Default::default()
        }
    }

    /// Same counts, noise disabled.
    pub fn noiseless(mut self) -> Self {
        self.noise_std_dev = 0.0;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.agent_count == 0 {
            return Err(SignalError::invalid("agent_count", "must be positive"));
        }
        if self.step_count == 0 {
            return Err(SignalError::invalid("step_count", "must be positive"));
        }
        if !self.noise_std_dev.is_finite() || self.noise_std_dev < 0.0 {
            return Err(SignalError::invalid(
                "noise_std_dev",
                format!("must be finite and non-negative, got {}", self.noise_std_dev),
            ));
        }
        if self.sample_interval_ms <= 0 {
            return Err(SignalError::invalid(
                "sample_interval_ms",
                format!("must be positive, got {}", self.sample_interval_ms),
            ));
        }
        Ok(())
    }
}

/// Smoother parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    /// Fraction of the raw DFT bins kept, counted from index 0
    pub keep_ratio: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            keep_ratio: DEFAULT_KEEP_RATIO,
        }
    }
}

impl SmootherConfig {
    pub fn validate(&self) -> Result<()> {
        validate_keep_ratio(self.keep_ratio)
    }
}

pub(crate) fn validate_keep_ratio(keep_ratio: f64) -> Result<()> {
    if keep_ratio.is_nan() || keep_ratio <= 0.0 {
        return Err(SignalError::invalid(
            "keep_ratio",
            format!("must be greater than 0, got {}", keep_ratio),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_tool() {
        let config = GeneratorConfig::default();
        assert_eq!(config.agent_count, 10);
        assert_eq!(config.step_count, 200);
        assert_eq!(config.noise_std_dev, 0.7);
        assert_eq!(SmootherConfig::default().keep_ratio, 0.1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GeneratorConfig = serde_json::from_str(r#"{"agent_count": 3}"#).unwrap();
        assert_eq!(config.agent_count, 3);
        assert_eq!(config.step_count, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GeneratorConfig::new(0, 10).validate().is_err());
        assert!(GeneratorConfig::new(1, 0).validate().is_err());

        let mut config = GeneratorConfig::new(1, 10);
        config.noise_std_dev = -0.1;
        assert!(config.validate().is_err());
        config.noise_std_dev = f64::NAN;
        assert!(config.validate().is_err());

        assert!(SmootherConfig { keep_ratio: 0.0 }.validate().is_err());
        assert!(SmootherConfig { keep_ratio: f64::NAN }.validate().is_err());
        assert!(SmootherConfig { keep_ratio: 1.5 }.validate().is_ok());
    }
}
