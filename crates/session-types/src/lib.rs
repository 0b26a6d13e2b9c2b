//! Data model shared by `session-config` and `session-align-core`.
//!
//! Every type here is an immutable, plain-data record. None of them touch the
//! filesystem or perform validation beyond simple structural invariants
//! (e.g. a non-empty identifier) — loading and cross-field validation belongs
//! to `session-config`; computing derived records belongs to
//! `session-align-core`.

mod align;
mod config;
mod manifest;
mod provenance;
mod run_result;
mod session;
mod trial;
mod verification;

pub use align::{AlignedResult, AlignmentStats, JitterStats};
pub use config::{Config, MappingStrategy, PathLayout, TimebaseSource, TimebaseSpec, VerificationSpec};
pub use manifest::{CameraManifestEntry, Manifest, TtlManifestEntry};
pub use provenance::Provenance;
pub use run_result::RunResult;
pub use session::{
    BehavioralControllerDescriptor, CameraDescriptor, OrderRule, Session, TrialTypeDescriptor,
    TtlChannelDescriptor,
};
pub use trial::{TrialOffsetMap, TrialSyncWarning};
pub use verification::{CameraStatus, CameraVerification, OverallStatus, VerificationResult};
