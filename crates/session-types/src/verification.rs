use serde::{Deserialize, Serialize};

/// Per-camera verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraStatus {
    Ok,
    Warn,
    Fail,
}

/// Overall verification status (spec §4.6: FAIL if any FAIL, else WARN if
/// any WARN, else PASS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Pass,
    Warn,
    Fail,
}

/// Per-camera verification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraVerification {
    pub camera_id: String,
    pub ttl_id: String,
    pub frame_count: u64,
    pub ttl_pulse_count: u64,
    pub mismatch: i64,
    pub verifiable: bool,
    pub status: CameraStatus,
}

/// Frozen outcome of `Verifier::verify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub session_id: String,
    pub overall_status: OverallStatus,
    pub cameras: Vec<CameraVerification>,
    pub generated_at: String,
}
