use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A non-fatal diagnostic recorded while resolving trial offsets
/// (spec §4.10).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrialSyncWarning {
    SyncStateMissing { trial_index: usize },
    PulseCountTruncated { n_pulses: usize, n_trials: usize },
    DriftExceedsSanityThreshold { trial_index: usize, drift_s: f64 },
}

/// Per-trial additive seconds offset from behavioral-controller time to
/// absolute hardware time (spec §3 `TrialOffsetMap`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrialOffsetMap {
    /// 1-based trial index -> offset in seconds.
    offsets: BTreeMap<usize, f64>,
}

impl TrialOffsetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, trial_index: usize, offset_s: f64) {
        self.offsets.insert(trial_index, offset_s);
    }

    pub fn get(&self, trial_index: usize) -> Option<f64> {
        self.offsets.get(&trial_index).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.offsets.iter().map(|(&i, &d)| (i, d))
    }

    /// Session-wide constant-offset view, for observability/debugging output
    /// only (spec §9 Open Question: per-trial is used for alignment, the
    /// median is never substituted back into it).
    pub fn median_offset_for_debugging(&self) -> Option<f64> {
        if self.offsets.is_empty() {
            return None;
        }
        let mut values: Vec<f64> = self.offsets.values().copied().collect();
        values.sort_by(|a, b| a.partial_cmp(b).expect("offsets are never NaN"));
        let mid = values.len() / 2;
        Some(if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        })
    }
}
