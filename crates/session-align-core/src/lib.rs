//! The temporal alignment core.
//!
//! Implements manifest construction & verification, timebase providers, the
//! sample alignment engine, per-trial offset computation, jitter-budget
//! enforcement, and deterministic provenance hashing for a heterogeneous
//! multi-modal recording session.
//!
//! None of this crate parses configuration files or session metadata from
//! disk — it receives already-validated [`session_types::Config`] and
//! [`session_types::Session`] values (see `session-config` for that layer).

mod align;
mod discovery;
mod error;
mod frames;
mod hash;
mod jitter;
mod manifest;
mod orchestrator;
mod pulses;
mod timebase;
mod trial_sync;
mod verify;

pub use align::Aligner;
pub use discovery::FileDiscovery;
pub use error::Error;
pub use frames::{FfprobeProbe, FrameCounter, FrameProbe};
pub use hash::Hasher;
pub use jitter::JitterEnforcer;
pub use manifest::ManifestBuilder;
pub use orchestrator::{OrchestratorOptions, SessionOrchestrator};
pub use pulses::PulseReader;
pub use timebase::TimebaseProvider;
pub use trial_sync::{ParsedTrial, TrialSyncResolver};
pub use verify::Verifier;

pub type Result<T> = std::result::Result<T, Error>;
