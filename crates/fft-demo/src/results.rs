//! Results collection and output for demo runs.
//!
//! Captures per-run metrics and, for sweeps, summary statistics of
//! error reduction and resilience gain per keep ratio.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use fft_kernel::Evaluation;
use serde::{Deserialize, Serialize};

/// Parameters a run was executed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Smoother name
    pub smoother: String,
    pub agents: usize,
    pub steps: usize,
    pub keep_ratio: f64,
    /// Agent whose signal was smoothed
    pub focus_agent: usize,
    /// Trial number (for repeated runs)
    pub trial: usize,
    /// Random seed (if reproducible)
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Grouping key for summaries.
    pub fn key(&self) -> String {
        format!(
            "{}:keep_ratio={:.3}:agents={}:steps={}",
            self.smoother, self.keep_ratio, self.agents, self.steps
        )
    }
}

/// Outcome of a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub config: RunConfig,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub evaluation: Evaluation,
    /// Number of DFT bins the smoother kept
    pub cutoff: usize,
}

/// Summary statistics for one configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    pub config_key: String,
    pub keep_ratio: f64,
    pub trials: usize,
    pub mean_error_reduction: f64,
    /// Standard error of the mean error reduction
    pub error_reduction_se: f64,
    /// 95% confidence interval, clamped to [0, 1]
    pub error_reduction_ci: (f64, f64),
    pub min_error_reduction: f64,
    pub max_error_reduction: f64,
    /// Mean of resilience_after / resilience_before
    pub mean_resilience_gain: f64,
    pub resilience_gain_se: f64,
}

/// Aggregate results from a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResults {
    /// All individual runs
    pub records: Vec<RunRecord>,
    /// Summary statistics by configuration key
    pub summary: HashMap<String, SweepSummary>,
}

fn mean_and_se(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / n;
    // SE = sample std dev / sqrt(n)
    let se = if values.len() > 1 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt() / n.sqrt()
    } else {
        0.0
    };
    (mean, se)
}

impl SweepResults {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            summary: HashMap::new(),
        }
    }

    pub fn add(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    /// Compute summary statistics.
    pub fn compute_summary(&mut self) {
        let mut by_config: HashMap<String, Vec<&RunRecord>> = HashMap::new();
        for record in &self.records {
            by_config.entry(record.config.key()).or_default().push(record);
        }

        self.summary.clear();
        for (key, records) in by_config {
            let reductions: Vec<f64> = records
                .iter()
                .map(|r| r.evaluation.error_reduction)
                .collect();
            let gains: Vec<f64> = records
                .iter()
                .map(|r| r.evaluation.resilience_gain())
                .collect();

            let (mean_error_reduction, error_reduction_se) = mean_and_se(&reductions);
            let (mean_resilience_gain, resilience_gain_se) = mean_and_se(&gains);

            let z = 1.96;
            let error_reduction_ci = (
                (mean_error_reduction - z * error_reduction_se).max(0.0),
                (mean_error_reduction + z * error_reduction_se).min(1.0),
            );

            let min_error_reduction = reductions.iter().copied().fold(f64::INFINITY, f64::min);
            let max_error_reduction = reductions
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);

            self.summary.insert(
                key.clone(),
                SweepSummary {
                    config_key: key,
                    keep_ratio: records[0].config.keep_ratio,
                    trials: records.len(),
                    mean_error_reduction,
                    error_reduction_se,
                    error_reduction_ci,
                    min_error_reduction,
                    max_error_reduction,
                    mean_resilience_gain,
                    resilience_gain_se,
                },
            );
        }
    }

    /// Summaries ordered by keep ratio.
    pub fn sorted_summary(&self) -> Vec<&SweepSummary> {
        let mut rows: Vec<&SweepSummary> = self.summary.values().collect();
        rows.sort_by(|a, b| {
            a.keep_ratio
                .total_cmp(&b.keep_ratio)
                .then_with(|| a.config_key.cmp(&b.config_key))
        });
        rows
    }

    /// Save results to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Load results from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let results = serde_json::from_str(&json)?;
        Ok(results)
    }
}

impl Default for SweepResults {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a timestamped output path from the given path.
/// e.g., "sweep.json" -> "sweep-20260108-010530.json"
pub fn timestamped_path(path: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("results");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}-{}.{}", stem, timestamp, ext))
}

/// Format a duration in milliseconds for display.
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{:.1}m", ms as f64 / 60_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(keep_ratio: f64, trial: usize, error_reduction: f64) -> RunRecord {
        RunRecord {
            config: RunConfig {
                smoother: "spectral_truncation".to_string(),
                agents: 10,
                steps: 200,
                keep_ratio,
                focus_agent: 0,
                trial,
                seed: Some(trial as u64),
            },
            started_at: Utc::now(),
            ended_at: Utc::now(),
            duration_ms: 3,
            evaluation: Evaluation {
                resilience_before: 1.0,
                resilience_after: 2.0 + trial as f64,
                error_reduction,
            },
            cutoff: (200.0 * keep_ratio) as usize,
        }
    }

    #[test]
    fn test_sweep_summary() {
        let mut results = SweepResults::new();
        for (trial, er) in [0.4, 0.5, 0.6].into_iter().enumerate() {
            results.add(record(0.1, trial, er));
        }
        results.add(record(0.5, 0, 0.2));
        results.compute_summary();

        assert_eq!(results.summary.len(), 2);
        let key = "spectral_truncation:keep_ratio=0.100:agents=10:steps=200";
        let summary = results.summary.get(key).unwrap();

        assert_eq!(summary.trials, 3);
        assert!((summary.mean_error_reduction - 0.5).abs() < 1e-12);
        // sample sd = 0.1, se = 0.1 / sqrt(3)
        assert!((summary.error_reduction_se - 0.1 / 3f64.sqrt()).abs() < 1e-12);
        assert!(summary.error_reduction_ci.0 < 0.5 && summary.error_reduction_ci.1 > 0.5);
        assert_eq!(summary.min_error_reduction, 0.4);
        assert_eq!(summary.max_error_reduction, 0.6);
        assert!((summary.mean_resilience_gain - 3.0).abs() < 1e-12);

        let single = results
            .summary
            .get("spectral_truncation:keep_ratio=0.500:agents=10:steps=200")
            .unwrap();
        assert_eq!(single.error_reduction_se, 0.0);

        let order: Vec<f64> = results.sorted_summary().iter().map(|s| s.keep_ratio).collect();
        assert_eq!(order, vec![0.1, 0.5]);
    }

    #[test]
    fn test_save_and_load() {
        let mut results = SweepResults::new();
        results.add(record(0.2, 0, 0.3));
        results.compute_summary();

        let path = std::env::temp_dir().join(format!("fft-demo-sweep-{}.json", std::process::id()));
        results.save(&path).unwrap();
        let loaded = SweepResults::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.summary.len(), 1);
        assert_eq!(loaded.records[0].cutoff, 40);
    }

    #[test]
    fn test_timestamped_path_keeps_stem_and_extension() {
        let path = timestamped_path(Path::new("out/sweep.json"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("sweep-"));
        assert!(name.ends_with(".json"));
        assert_eq!(path.parent().unwrap(), Path::new("out"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(90_000), "1.5m");
    }
}
