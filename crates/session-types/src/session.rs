use serde::{Deserialize, Serialize};

/// File-ordering rule applied by `FileDiscovery` when a glob resolves to more
/// than one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderRule {
    NameAsc,
    NameDesc,
    MtimeAsc,
    MtimeDesc,
}

/// One sync-pulse-producing behavioral state, scoped to a trial type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialTypeDescriptor {
    pub trial_type: String,
    pub sync_signal_name: String,
    pub sync_ttl_channel_id: String,
}

/// A behavioral-controller (e.g. Bpod) data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralControllerDescriptor {
    pub path_glob: String,
    pub order_rule: OrderRule,
    pub continuous_time: bool,
    pub trial_types: Vec<TrialTypeDescriptor>,
}

/// A camera recorded in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescriptor {
    pub camera_id: String,
    pub path_glob: String,
    pub order_rule: OrderRule,
    pub ttl_id: String,
    /// Nominal capture rate in Hz, used by the `NOMINAL_RATE` timebase.
    pub nominal_rate_hz: f64,
}

/// A TTL pulse channel (hardware sync line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtlChannelDescriptor {
    pub ttl_id: String,
    pub path_glob: String,
}

/// Immutable, validated description of one recording session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub cameras: Vec<CameraDescriptor>,
    #[serde(default)]
    pub ttls: Vec<TtlChannelDescriptor>,
    #[serde(default)]
    pub behavioral_controllers: Vec<BehavioralControllerDescriptor>,
}

impl Session {
    /// True if `ttl_id` names a channel present in this session.
    pub fn has_ttl(&self, ttl_id: &str) -> bool {
        self.ttls.iter().any(|t| t.ttl_id == ttl_id)
    }

    pub fn camera(&self, camera_id: &str) -> Option<&CameraDescriptor> {
        self.cameras.iter().find(|c| c.camera_id == camera_id)
    }

    pub fn ttl(&self, ttl_id: &str) -> Option<&TtlChannelDescriptor> {
        self.ttls.iter().find(|t| t.ttl_id == ttl_id)
    }
}
