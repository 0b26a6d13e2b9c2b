use serde::{Deserialize, Serialize};

use crate::{AlignmentStats, Manifest, Provenance, TrialOffsetMap, TrialSyncWarning, VerificationResult};

/// Immutable result bundle produced by `SessionOrchestrator::run` (spec §4.12).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub manifest: Manifest,
    pub verification: VerificationResult,
    /// One entry per camera, in the order cameras appear in the session.
    pub alignment_stats: Vec<(String, AlignmentStats)>,
    pub trial_offsets: Option<TrialOffsetMap>,
    pub warnings: Vec<TrialSyncWarning>,
    pub provenance: Provenance,
}
