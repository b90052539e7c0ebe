//! Demo parameters and their interactive bounds.

use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{bail, Context, Result};
use fft_kernel::{GeneratorConfig, SmootherConfig, DEFAULT_KEEP_RATIO, DEFAULT_NOISE_STD_DEV};
use serde::{Deserialize, Serialize};

/// Agent counts a user may pick.
pub const AGENT_RANGE: RangeInclusive<usize> = 5..=50;

/// Step counts a user may pick.
pub const STEP_RANGE: RangeInclusive<usize> = 100..=1000;

/// Parameters for one demo interaction.
///
/// Every field is optional in a JSON config file; CLI flags override it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of simulated agents
    pub agents: usize,
    /// Samples per agent
    pub steps: usize,
    /// Fraction of DFT bins kept by the smoother
    pub keep_ratio: f64,
    /// Noise standard deviation fed to the generator
    pub noise_std_dev: f64,
    /// Agent whose signal is smoothed and scored
    pub focus_agent: usize,
    /// How many raw agent signals to chart
    pub displayed_agents: usize,
    /// Fixed seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            agents: 10,
            steps: 200,
            keep_ratio: DEFAULT_KEEP_RATIO,
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
            focus_agent: 0,
            displayed_agents: 3,
            seed: None,
        }
    }
}

impl DemoConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Check the user-facing bounds.
    pub fn validate(&self) -> Result<()> {
        if !AGENT_RANGE.contains(&self.agents) {
            bail!(
                "agent count {} out of range {}..={}",
                self.agents,
                AGENT_RANGE.start(),
                AGENT_RANGE.end()
            );
        }
        if !STEP_RANGE.contains(&self.steps) {
            bail!(
                "step count {} out of range {}..={}",
                self.steps,
                STEP_RANGE.start(),
                STEP_RANGE.end()
            );
        }
        if self.focus_agent >= self.agents {
            bail!(
                "focus agent {} does not exist (only {} agents)",
                self.focus_agent,
                self.agents
            );
        }
        if self.keep_ratio.is_nan() || self.keep_ratio <= 0.0 || self.keep_ratio > 1.0 {
            bail!("keep ratio {} must lie in (0, 1]", self.keep_ratio);
        }
        Ok(())
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            agent_count: self.agents,
            step_count: self.steps,
            noise_std_dev: self.noise_std_dev,
            ..Default::default()
        }
    }

    pub fn smoother_config(&self) -> SmootherConfig {
        SmootherConfig {
            keep_ratio: self.keep_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DemoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generator_config().agent_count, 10);
        assert_eq!(config.generator_config().step_count, 200);
        assert_eq!(config.smoother_config().keep_ratio, 0.1);
    }

    #[test]
    fn test_bounds() {
        let ok = |agents, steps| {
            DemoConfig {
                agents,
                steps,
                ..Default::default()
            }
            .validate()
            .is_ok()
        };
        assert!(ok(5, 100));
        assert!(ok(50, 1000));
        assert!(!ok(4, 200));
        assert!(!ok(51, 200));
        assert!(!ok(10, 99));
        assert!(!ok(10, 1001));
    }

    #[test]
    fn test_focus_and_ratio_checks() {
        let mut config = DemoConfig {
            focus_agent: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.focus_agent = 9;
        config.keep_ratio = 0.0;
        assert!(config.validate().is_err());
        config.keep_ratio = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_json() {
        let dir = std::env::temp_dir().join(format!("fft-demo-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("demo.json");
        std::fs::write(&path, r#"{"agents": 20, "seed": 9}"#).unwrap();

        let config = DemoConfig::load(&path).unwrap();
        assert_eq!(config.agents, 20);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.steps, 200);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
