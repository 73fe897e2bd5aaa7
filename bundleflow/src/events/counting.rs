//! Per-step output counters and timestamp tracking.

use super::OutputListener;
use crate::bundle::{ElementMetadata, TupleTag};
use crate::time::Timestamp;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Step name under which notes without a step are counted.
pub const UNATTRIBUTED_STEP: &str = "<unattributed>";

/// Output statistics for one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutputStats {
    /// Number of main outputs.
    pub outputs: u64,
    /// Number of side outputs.
    pub side_outputs: u64,
    /// Highest element timestamp seen across both.
    pub max_timestamp: Option<Timestamp>,
}

impl StepOutputStats {
    fn observe(&mut self, ts: Timestamp) {
        if self.max_timestamp.map_or(true, |max| ts > max) {
            self.max_timestamp = Some(ts);
        }
    }
}

/// Counts outputs per step and tracks the highest timestamp each emitted.
#[derive(Debug, Default)]
pub struct CountingOutputListener {
    stats: DashMap<String, StepOutputStats>,
}

impl CountingOutputListener {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics for a step.
    #[must_use]
    pub fn stats(&self, step_name: &str) -> Option<StepOutputStats> {
        self.stats.get(step_name).map(|s| s.value().clone())
    }

    /// Returns total main outputs across all steps.
    #[must_use]
    pub fn total_outputs(&self) -> u64 {
        self.stats.iter().map(|s| s.outputs).sum()
    }

    /// Returns total side outputs across all steps.
    #[must_use]
    pub fn total_side_outputs(&self) -> u64 {
        self.stats.iter().map(|s| s.side_outputs).sum()
    }

    fn entry(&self, step_name: Option<&str>) -> dashmap::mapref::one::RefMut<'_, String, StepOutputStats> {
        self.stats
            .entry(step_name.unwrap_or(UNATTRIBUTED_STEP).to_string())
            .or_default()
    }
}

impl OutputListener for CountingOutputListener {
    fn on_output(&self, step_name: Option<&str>, output: &ElementMetadata) {
        let mut stats = self.entry(step_name);
        stats.outputs += 1;
        stats.observe(output.timestamp);
    }

    fn on_side_output(&self, step_name: Option<&str>, _tag: &TupleTag, output: &ElementMetadata) {
        let mut stats = self.entry(step_name);
        stats.side_outputs += 1;
        stats.observe(output.timestamp);
    }
}
