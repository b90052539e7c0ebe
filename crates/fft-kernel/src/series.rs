//! Signal table: one time series per agent over a shared timestamp index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};

/// Index of a simulated agent within a table.
pub type AgentId = usize;

/// A set of equal-length series sharing one timestamp index.
///
/// Timestamps are cosmetic; downstream computation only depends on sample order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalTable {
    timestamps: Vec<DateTime<Utc>>,
    series: Vec<Vec<f64>>,
}

impl SignalTable {
    /// Build a table, checking that every series matches the index length.
    pub fn new(timestamps: Vec<DateTime<Utc>>, series: Vec<Vec<f64>>) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(SignalError::invalid("timestamps", "index must not be empty"));
        }
        if series.is_empty() {
            return Err(SignalError::invalid("series", "table needs at least one agent"));
        }
        if let Some((agent, s)) = series
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != timestamps.len())
        {
            return Err(SignalError::invalid(
                "series",
                format!(
                    "agent {} has {} samples, index has {}",
                    agent,
                    s.len(),
                    timestamps.len()
                ),
            ));
        }
        Ok(Self { timestamps, series })
    }

    pub fn agent_count(&self) -> usize {
        self.series.len()
    }

    pub fn step_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// The series generated for `agent`, if it exists.
    pub fn agent(&self, agent: AgentId) -> Option<&[f64]> {
        self.series.get(agent).map(Vec::as_slice)
    }

    /// Column label used by front ends.
    pub fn agent_label(agent: AgentId) -> String {
        format!("Agent_{}", agent)
    }

    /// Iterate `(agent, series)` pairs in agent order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &[f64])> {
        self.series.iter().map(Vec::as_slice).enumerate()
    }

    /// The sample row at `step` across all agents.
    pub fn row(&self, step: usize) -> Option<Vec<f64>> {
        if step >= self.step_count() {
            return None;
        }
        Some(self.series.iter().map(|s| s[step]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn index(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| start + Duration::seconds(i as i64))
            .collect()
    }

    #[test]
    fn test_table_accessors() {
        let table = SignalTable::new(index(3), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
            .unwrap();

        assert_eq!(table.agent_count(), 2);
        assert_eq!(table.step_count(), 3);
        assert_eq!(table.agent(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(table.agent(2), None);
        assert_eq!(table.row(2), Some(vec![3.0, 6.0]));
        assert_eq!(table.row(3), None);
        assert_eq!(SignalTable::agent_label(7), "Agent_7");
    }

    #[test]
    fn test_rejects_ragged_series() {
        let err = SignalTable::new(index(3), vec![vec![1.0, 2.0, 3.0], vec![4.0]]).unwrap_err();
        assert!(err.to_string().contains("agent 1"));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(SignalTable::new(index(3), vec![]).is_err());
        assert!(SignalTable::new(vec![], vec![vec![]]).is_err());
    }
}
