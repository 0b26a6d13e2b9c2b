use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which time series a `TimebaseProvider` is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimebaseSource {
    NominalRate,
    Ttl,
    ExternalClock,
}

/// How source samples are mapped onto the reference timebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    Nearest,
    Linear,
}

/// `config.timebase` — see spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimebaseSpec {
    pub source: TimebaseSource,
    pub mapping: MappingStrategy,
    pub jitter_budget_s: f64,
    pub offset_s: f64,
    pub ttl_id: Option<String>,
    pub external_stream: Option<String>,
}

impl TimebaseSpec {
    /// Structural validation of the `source`-conditional requirements from
    /// spec §3. Does not check that the referenced channel/stream actually
    /// exists in a session — that is `ManifestBuilder`/`TimebaseProvider`'s
    /// job, since only they have a `Session`/`Manifest` to check against.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.jitter_budget_s < 0.0 {
            return Err("timebase.jitter_budget_s must be >= 0");
        }
        match self.source {
            TimebaseSource::Ttl if self.ttl_id.is_none() => {
                Err("timebase.source = ttl requires timebase.ttl_id")
            }
            TimebaseSource::ExternalClock if self.external_stream.is_none() => {
                Err("timebase.source = external_clock requires timebase.external_stream")
            }
            _ => Ok(()),
        }
    }
}

/// `config.verification` — see spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationSpec {
    pub mismatch_tolerance_frames: u64,
    pub warn_on_mismatch: bool,
}

/// `config.paths` — base directories the rest of the config's relative paths
/// are resolved against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathLayout {
    pub session_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Immutable, validated run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub timebase: TimebaseSpec,
    pub verification: VerificationSpec,
    pub paths: PathLayout,
}

impl Config {
    pub fn validate(&self) -> Result<(), &'static str> {
        self.timebase.validate()
    }
}
