use serde::{Deserialize, Serialize};

/// Deterministic provenance record attached to every `RunResult`
/// (spec §3/§4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub config_hash: String,
    pub session_hash: String,
    pub pipeline_version: String,
    pub execution_time_iso8601: String,
}
