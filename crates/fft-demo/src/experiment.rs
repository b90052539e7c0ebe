//! Demo runner.
//!
//! One run is one interaction of the original page:
//! 1. Generate the agent signal table
//! 2. Select the focus agent's series
//! 3. Smooth it
//! 4. Score the raw/smoothed pair

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fft_kernel::smoother::cutoff;
use fft_kernel::{evaluate, Evaluation, SignalGenerator, SignalTable, Smoother, SpectralTruncation};
use tracing::{debug, info};

use crate::config::DemoConfig;
use crate::results::{RunConfig, RunRecord, SweepResults};

/// Everything produced by one run, ready for rendering.
#[derive(Debug, Clone)]
pub struct DemoOutcome {
    pub table: SignalTable,
    pub original: Vec<f64>,
    pub smoothed: Vec<f64>,
    pub evaluation: Evaluation,
    pub record: RunRecord,
}

/// Runs the generate → smooth → evaluate pipeline.
pub struct DemoRunner {
    config: DemoConfig,
    smoother: Box<dyn Smoother>,
    start: Option<DateTime<Utc>>,
}

impl DemoRunner {
    /// Create a runner using spectral truncation at the configured keep ratio.
    pub fn new(config: DemoConfig) -> Result<Self> {
        config.validate()?;
        let smoother = SpectralTruncation::from_config(&config.smoother_config())?;
        Ok(Self {
            config,
            smoother: Box::new(smoother),
            start: None,
        })
    }

    /// Replace the smoother.
    pub fn with_smoother(mut self, smoother: Box<dyn Smoother>) -> Self {
        self.smoother = smoother;
        self
    }

    /// Pin the first timestamp of generated tables.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Execute one run. `seed` overrides the configured seed.
    pub fn run(&self, trial: usize, seed: Option<u64>) -> Result<DemoOutcome> {
        let seed = seed.or(self.config.seed);
        let started_at = Utc::now();
        let timer = Instant::now();

        let mut generator = SignalGenerator::new(self.config.generator_config(), seed);
        if let Some(start) = self.start {
            generator = generator.with_start(start);
        }
        let table = generator.generate().context("generating signals")?;
        debug!(
            agents = table.agent_count(),
            steps = table.step_count(),
            "Generated signal table"
        );

        let original = table
            .agent(self.config.focus_agent)
            .with_context(|| format!("agent {} missing from table", self.config.focus_agent))?
            .to_vec();

        let smoothed = self
            .smoother
            .smooth(&original)
            .with_context(|| format!("smoothing with {}", self.smoother.name()))?;
        let evaluation = evaluate(&original, &smoothed).context("evaluating metrics")?;

        let duration_ms = timer.elapsed().as_millis() as u64;
        info!(
            trial = trial,
            seed = ?seed,
            keep_ratio = self.config.keep_ratio,
            resilience_before = evaluation.resilience_before,
            resilience_after = evaluation.resilience_after,
            error_reduction = evaluation.error_reduction,
            duration_ms = duration_ms,
            "Completed run"
        );

        let record = RunRecord {
            config: RunConfig {
                smoother: self.smoother.name().to_string(),
                agents: self.config.agents,
                steps: self.config.steps,
                keep_ratio: self.config.keep_ratio,
                focus_agent: self.config.focus_agent,
                trial,
                seed,
            },
            started_at,
            ended_at: Utc::now(),
            duration_ms,
            evaluation,
            cutoff: cutoff(original.len(), self.config.keep_ratio),
        };

        Ok(DemoOutcome {
            table,
            original,
            smoothed,
            evaluation,
            record,
        })
    }
}

/// Repeat the pipeline for each keep ratio and trial.
///
/// With a `base_seed`, trial `t` uses seed `base_seed + t`, so every keep
/// ratio sees the same signals.
pub fn run_sweep(
    base: &DemoConfig,
    keep_ratios: &[f64],
    trials: usize,
    base_seed: Option<u64>,
) -> Result<SweepResults> {
    let mut results = SweepResults::new();
    let total = keep_ratios.len() * trials;
    let mut completed = 0;

    for &keep_ratio in keep_ratios {
        let config = DemoConfig {
            keep_ratio,
            ..base.clone()
        };
        let runner = DemoRunner::new(config)?;

        for trial in 0..trials {
            let seed = base_seed.map(|s| s.wrapping_add(trial as u64));
            let outcome = runner.run(trial, seed)?;
            results.add(outcome.record);
            completed += 1;

            debug!(
                progress = format!("{}/{}", completed, total),
                keep_ratio = keep_ratio,
                trial = trial,
                "Completed sweep run"
            );
        }
    }

    results.compute_summary();
    Ok(results)
}
