use std::path::PathBuf;

/// Error taxonomy for the alignment core (spec §7). Each class-level failure
/// aborts the run; per-item issues (a single trial's missing sync state, a
/// single WARN camera) are accumulated as warnings instead and never reach
/// this enum.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("session directory does not exist: {path}")]
    DiscoveryError { path: PathBuf },

    #[error("camera '{camera_id}' has no video files matching its pattern")]
    IngestError { camera_id: String },

    #[error("frame count probe failed for {path}: {reason}")]
    FrameCountError { path: PathBuf, reason: String },

    #[error("illegal state: {0}")]
    DomainError(String),

    #[error(
        "verification failed: overall status FAIL ({failing_cameras} camera(s) exceeded tolerance)"
    )]
    VerificationFailed { failing_cameras: usize },

    #[error("timebase error: {0}")]
    TimebaseError(String),

    #[error("jitter budget exceeded: max {max_s:.6}s > budget {budget_s:.6}s")]
    JitterBudgetExceeded { max_s: f64, budget_s: f64 },

    #[error("trial sync error: {0}")]
    TrialSyncError(String),

    #[error("value could not be canonicalized for hashing: {0}")]
    HashSerializationError(String),

    #[error("{source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
