use serde::{Deserialize, Serialize};

use crate::config::{MappingStrategy, TimebaseSource};

/// Outcome of mapping a source timestamp sequence onto a reference timebase
/// (spec §3 `AlignedResult`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlignedResult {
    /// One reference index per source sample.
    Nearest { indices: Vec<usize> },
    /// One bracketing index pair + convex-combination weights per source
    /// sample. `weights.0 + weights.1 == 1.0`.
    Linear {
        brackets: Vec<(usize, usize)>,
        weights: Vec<(f64, f64)>,
    },
}

impl AlignedResult {
    pub fn len(&self) -> usize {
        match self {
            AlignedResult::Nearest { indices } => indices.len(),
            AlignedResult::Linear { brackets, .. } => brackets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Jitter statistics produced alongside an `AlignedResult`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterStats {
    pub max_s: f64,
    pub p95_s: f64,
    pub aligned_samples: usize,
}

/// Immutable sidecar record summarizing one alignment run (spec §4.11).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub timebase_source: TimebaseSource,
    pub mapping: MappingStrategy,
    pub offset_s: f64,
    pub max_jitter_s: f64,
    pub p95_jitter_s: f64,
    pub aligned_samples: usize,
}

impl AlignmentStats {
    pub fn new(
        timebase_source: TimebaseSource,
        mapping: MappingStrategy,
        offset_s: f64,
        jitter: JitterStats,
    ) -> Self {
        Self {
            timebase_source,
            mapping,
            offset_s,
            max_jitter_s: jitter.max_s,
            p95_jitter_s: jitter.p95_s,
            aligned_samples: jitter.aligned_samples,
        }
    }
}
