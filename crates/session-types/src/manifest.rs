use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One camera's entry in a `Manifest`.
///
/// `frame_count`/`ttl_pulse_count` are both `None` in fast-discovery mode and
/// both `Some` after counting (spec §3 invariant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraManifestEntry {
    pub camera_id: String,
    pub ttl_id: String,
    pub video_paths: Vec<PathBuf>,
    pub frame_count: Option<u64>,
    pub ttl_pulse_count: Option<u64>,
}

/// One TTL channel's entry in a `Manifest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtlManifestEntry {
    pub ttl_id: String,
    pub file_paths: Vec<PathBuf>,
}

/// Frozen inventory of a session's files, with optional counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub session_id: String,
    pub cameras: Vec<CameraManifestEntry>,
    pub ttls: Vec<TtlManifestEntry>,
    pub bpod_files: Vec<PathBuf>,
}

impl Manifest {
    pub fn ttl(&self, ttl_id: &str) -> Option<&TtlManifestEntry> {
        self.ttls.iter().find(|t| t.ttl_id == ttl_id)
    }

    pub fn camera(&self, camera_id: &str) -> Option<&CameraManifestEntry> {
        self.cameras.iter().find(|c| c.camera_id == camera_id)
    }

    /// A camera is verifiable when its `ttl_id` references a TTL entry
    /// present in this same manifest (spec §3 invariant).
    pub fn camera_is_verifiable(&self, camera: &CameraManifestEntry) -> bool {
        self.ttl(&camera.ttl_id).is_some()
    }
}
