//! Synthetic signal generator.
//!
//! Each agent emits a phase-shifted sine wave sampled over `[0, 20]` with
//! additive Gaussian noise. Agents are independent; there is no interaction
//! between them.

use chrono::{DateTime, TimeDelta, Utc};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::config::{GeneratorConfig, DOMAIN_END};
use crate::error::{Result, SignalError};
use crate::series::SignalTable;

/// `n` evenly spaced samples over `[start, end]`, endpoints included.
///
/// A single sample yields `[start]`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            points[n - 1] = end;
            points
        }
    }
}

/// Generate `agent_count` noisy series of `step_count` samples using the
/// default noise level and a timestamp index starting now.
pub fn generate<R: Rng + ?Sized>(
    agent_count: usize,
    step_count: usize,
    rng: &mut R,
) -> Result<SignalTable> {
    generate_with(&GeneratorConfig::new(agent_count, step_count), Utc::now(), rng)
}

/// Generate a table from an explicit config, index start and randomness source.
pub fn generate_with<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    start: DateTime<Utc>,
    rng: &mut R,
) -> Result<SignalTable> {
    config.validate()?;

    let noise = if config.noise_std_dev > 0.0 {
        let normal = Normal::new(0.0, config.noise_std_dev)
            .map_err(|e| SignalError::invalid("noise_std_dev", e.to_string()))?;
        Some(normal)
    } else {
        None
    };

    let domain = linspace(0.0, DOMAIN_END, config.step_count);

    let series: Vec<Vec<f64>> = (0..config.agent_count)
        .map(|agent| {
            let phase = agent as f64;
            domain
                .iter()
                .map(|&x| {
                    let base = (x + phase).sin();
                    match &noise {
                        Some(normal) => base + normal.sample(&mut *rng),
                        None => base,
                    }
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    let timestamps = timestamp_index(start, config.sample_interval_ms, config.step_count)?;

    SignalTable::new(timestamps, series)
}

/// `steps` instants `interval_ms` apart, starting at `start`.
///
/// Fails instead of wrapping when an offset leaves chrono's representable range.
fn timestamp_index(
    start: DateTime<Utc>,
    interval_ms: i64,
    steps: usize,
) -> Result<Vec<DateTime<Utc>>> {
    let out_of_range = || {
        SignalError::invalid(
            "sample_interval_ms",
            format!("{} ms x {} steps overflows the timestamp index", interval_ms, steps),
        )
    };
    let interval = TimeDelta::try_milliseconds(interval_ms).ok_or_else(out_of_range)?;

    (0..steps)
        .map(|step| {
            i32::try_from(step)
                .ok()
                .and_then(|step| interval.checked_mul(step))
                .and_then(|offset| start.checked_add_signed(offset))
                .ok_or_else(out_of_range)
        })
        .collect()
}

/// Generator owning its configuration and a seedable RNG.
pub struct SignalGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    start: Option<DateTime<Utc>>,
}

impl SignalGenerator {
    /// Create a generator. `None` seeds from OS entropy, so runs differ.
    pub fn new(config: GeneratorConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            config,
            rng,
            start: None,
        }
    }

    /// Pin the first timestamp of the index instead of using the current time.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Generate a fresh table. Successive calls draw new noise.
    pub fn generate(&mut self) -> Result<SignalTable> {
        let start = self.start.unwrap_or_else(Utc::now);
        generate_with(&self.config, start, &mut self.rng)
    }
}
