//! C12 — top-level entry point tying every other component together
//! (spec §4.12).

use std::collections::BTreeMap;

use chrono::Utc;

use session_types::{
    AlignmentStats, CameraDescriptor, CameraStatus, Config, Manifest, Provenance, RunResult,
    Session,
};

use crate::trial_sync::ParsedTrial;
use crate::{Aligner, Error, FfprobeProbe, FrameProbe, Hasher, JitterEnforcer, ManifestBuilder, PulseReader, Result, TimebaseProvider, TrialSyncResolver, Verifier};

/// Caller-supplied inputs `SessionOrchestrator::run` cannot derive on its
/// own: the release identifier stamped into `Provenance`, whether a FAIL
/// verification should still proceed, and already-parsed behavioral-trial
/// data (this crate does not parse bpod/MATLAB files).
pub struct OrchestratorOptions {
    pub pipeline_version: String,
    pub override_verification_failure: bool,
    pub enforce_jitter_budget: bool,
    pub drift_sanity_threshold_s: f64,
    pub bpod_trials: Vec<ParsedTrial>,
    pub external_samples: Option<Vec<f64>>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            pipeline_version: env!("CARGO_PKG_VERSION").to_string(),
            override_verification_failure: false,
            enforce_jitter_budget: true,
            drift_sanity_threshold_s: 0.5,
            bpod_trials: Vec::new(),
            external_samples: None,
        }
    }
}

pub struct SessionOrchestrator;

impl SessionOrchestrator {
    pub fn run(
        config: &Config,
        session: &Session,
        options: &OrchestratorOptions,
    ) -> Result<RunResult> {
        Self::run_with_probe(config, session, options, &FfprobeProbe)
    }

    /// Same as [`Self::run`], but frame counting goes through `probe`
    /// instead of shelling out to `ffprobe` — lets tests exercise the full
    /// orchestration path with a fake.
    pub fn run_with_probe(
        config: &Config,
        session: &Session,
        options: &OrchestratorOptions,
        probe: &dyn FrameProbe,
    ) -> Result<RunResult> {
        let config_hash = Hasher::hash(config)?;
        let session_hash = Hasher::hash(session)?;

        let manifest = ManifestBuilder::build_with_probe(config, session, true, probe)?;

        let verification = Verifier::verify(&manifest, config.verification.mismatch_tolerance_frames)?;
        if verification.overall_status == session_types::OverallStatus::Fail
            && !options.override_verification_failure
        {
            let failing_cameras = verification
                .cameras
                .iter()
                .filter(|c| c.status == CameraStatus::Fail)
                .count();
            tracing::error!(session_id = %session.session_id, failing_cameras, "verification failed");
            return Err(Error::VerificationFailed { failing_cameras });
        }

        let alignment_stats = Self::align_all_cameras(config, &manifest, session, options)?;

        let (trial_offsets, warnings) = if options.bpod_trials.is_empty() {
            (None, Vec::new())
        } else {
            let trial_types: Vec<_> = session
                .behavioral_controllers
                .iter()
                .flat_map(|c| c.trial_types.clone())
                .collect();
            let pulses_by_channel = Self::load_channels(&manifest, &trial_types);
            let (offsets, warnings) = TrialSyncResolver::resolve(
                &trial_types,
                &options.bpod_trials,
                &pulses_by_channel,
                options.drift_sanity_threshold_s,
            )?;
            (Some(offsets), warnings)
        };

        let provenance = Provenance {
            config_hash,
            session_hash,
            pipeline_version: options.pipeline_version.clone(),
            execution_time_iso8601: Utc::now().to_rfc3339(),
        };

        Ok(RunResult {
            manifest,
            verification,
            alignment_stats,
            trial_offsets,
            warnings,
            provenance,
        })
    }

    /// Per-camera alignment, fanned out across threads when there is more
    /// than one camera (spec §5). Threads are joined in camera-id-sorted
    /// order for deterministic scheduling; the returned vector is then
    /// reassembled in the order cameras appear in the session, per spec §5's
    /// ordering guarantee.
    fn align_all_cameras(
        config: &Config,
        manifest: &Manifest,
        session: &Session,
        options: &OrchestratorOptions,
    ) -> Result<Vec<(String, AlignmentStats)>> {
        let mut by_camera_id: BTreeMap<String, Result<AlignmentStats>> = BTreeMap::new();

        if session.cameras.len() <= 1 {
            for camera in &session.cameras {
                let stats = Self::align_one_camera(config, manifest, camera, options);
                by_camera_id.insert(camera.camera_id.clone(), stats);
            }
        } else {
            std::thread::scope(|scope| {
                let handles: Vec<_> = session
                    .cameras
                    .iter()
                    .map(|camera| {
                        let camera_id = camera.camera_id.clone();
                        let handle = scope.spawn(move || {
                            (camera_id, Self::align_one_camera(config, manifest, camera, options))
                        });
                        handle
                    })
                    .collect();
                for handle in handles {
                    let (camera_id, stats) = handle.join().expect("camera alignment thread panicked");
                    by_camera_id.insert(camera_id, stats);
                }
            });
        }

        session
            .cameras
            .iter()
            .map(|camera| {
                by_camera_id
                    .remove(&camera.camera_id)
                    .expect("every session camera was aligned")
                    .map(|stats| (camera.camera_id.clone(), stats))
            })
            .collect()
    }

    fn align_one_camera(
        config: &Config,
        manifest: &Manifest,
        camera: &CameraDescriptor,
        options: &OrchestratorOptions,
    ) -> Result<AlignmentStats> {
        let ttl_entry = manifest.ttl(&camera.ttl_id).ok_or_else(|| {
            Error::DomainError(format!(
                "camera '{}' references TTL channel '{}' absent from the manifest",
                camera.camera_id, camera.ttl_id
            ))
        })?;
        let source_times = PulseReader::read_many(&ttl_entry.file_paths);

        let timebase = TimebaseProvider::from_config(
            config,
            manifest,
            camera,
            options.external_samples.as_deref(),
        )?;
        let reference_times = timebase.get_timestamps(source_times.len())?;

        let (_aligned, jitter) = Aligner::align(
            &source_times,
            &reference_times,
            config.timebase.mapping,
            config.timebase.jitter_budget_s,
            options.enforce_jitter_budget,
        )?;
        if !options.enforce_jitter_budget {
            JitterEnforcer::check(&jitter, config.timebase.jitter_budget_s)?;
        }

        Ok(AlignmentStats::new(
            timebase.source_kind(),
            config.timebase.mapping,
            config.timebase.offset_s,
            jitter,
        ))
    }

    fn load_channels(
        manifest: &Manifest,
        trial_types: &[session_types::TrialTypeDescriptor],
    ) -> BTreeMap<String, Vec<f64>> {
        let mut channels = BTreeMap::new();
        for trial_type in trial_types {
            let channel_id = &trial_type.sync_ttl_channel_id;
            if channels.contains_key(channel_id) {
                continue;
            }
            if let Some(entry) = manifest.ttl(channel_id) {
                channels.insert(channel_id.clone(), PulseReader::read_many(&entry.file_paths));
            }
        }
        channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_types::{
        CameraDescriptor, MappingStrategy, OrderRule, PathLayout, TimebaseSource, TimebaseSpec,
        TtlChannelDescriptor, VerificationSpec,
    };
    use std::io::Write;

    fn write_pulses(path: &std::path::Path, values: &[f64]) {
        let mut f = std::fs::File::create(path).unwrap();
        for v in values {
            writeln!(f, "{v}").unwrap();
        }
    }

    struct FakeProbe(u64);
    impl FrameProbe for FakeProbe {
        fn probe(&self, _path: &std::path::Path) -> std::result::Result<u64, String> {
            Ok(self.0)
        }
    }

    fn one_camera_session() -> Session {
        Session {
            session_id: "s1".into(),
            cameras: vec![CameraDescriptor {
                camera_id: "cam0".into(),
                path_glob: "videos/cam0*.mp4".into(),
                order_rule: OrderRule::NameAsc,
                ttl_id: "ttl0".into(),
                nominal_rate_hz: 1.0,
            }],
            ttls: vec![TtlChannelDescriptor {
                ttl_id: "ttl0".into(),
                path_glob: "ttl/cam0*.txt".into(),
            }],
            behavioral_controllers: vec![],
        }
    }

    fn test_config(session_dir: std::path::PathBuf) -> Config {
        Config {
            timebase: TimebaseSpec {
                source: TimebaseSource::NominalRate,
                mapping: MappingStrategy::Nearest,
                jitter_budget_s: 0.5,
                offset_s: 0.0,
                ttl_id: None,
                external_stream: None,
            },
            verification: VerificationSpec {
                mismatch_tolerance_frames: 0,
                warn_on_mismatch: true,
            },
            paths: PathLayout {
                session_dir,
                output_dir: std::path::PathBuf::from("/tmp/out"),
            },
        }
    }

    #[test]
    fn happy_path_produces_run_result_with_pass_status() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("videos")).unwrap();
        std::fs::create_dir_all(dir.path().join("ttl")).unwrap();
        std::fs::write(dir.path().join("videos/cam0_0.mp4"), b"x").unwrap();
        write_pulses(&dir.path().join("ttl/cam0.txt"), &[0.0, 1.0, 2.0]);

        let session = one_camera_session();
        let config = test_config(dir.path().to_path_buf());
        let options = OrchestratorOptions {
            pipeline_version: "test".into(),
            ..OrchestratorOptions::default()
        };

        let result = SessionOrchestrator::run_with_probe(&config, &session, &options, &FakeProbe(3))
            .unwrap();
        assert_eq!(result.verification.overall_status, session_types::OverallStatus::Pass);
        assert_eq!(result.alignment_stats.len(), 1);
        assert_eq!(result.alignment_stats[0].0, "cam0");
        assert_eq!(result.provenance.pipeline_version, "test");
        assert!(result.trial_offsets.is_none());
    }

    #[test]
    fn verification_failure_aborts_unless_overridden() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("videos")).unwrap();
        std::fs::create_dir_all(dir.path().join("ttl")).unwrap();
        std::fs::write(dir.path().join("videos/cam0_0.mp4"), b"x").unwrap();
        write_pulses(&dir.path().join("ttl/cam0.txt"), &[0.0, 1.0, 2.0]);

        let session = one_camera_session();
        let config = test_config(dir.path().to_path_buf());

        let strict = OrchestratorOptions::default();
        let err = SessionOrchestrator::run_with_probe(&config, &session, &strict, &FakeProbe(99))
            .unwrap_err();
        assert!(matches!(err, Error::VerificationFailed { .. }));

        let overridden = OrchestratorOptions {
            override_verification_failure: true,
            ..OrchestratorOptions::default()
        };
        let result =
            SessionOrchestrator::run_with_probe(&config, &session, &overridden, &FakeProbe(99))
                .unwrap();
        assert_eq!(result.verification.overall_status, session_types::OverallStatus::Fail);
    }

    #[test]
    fn multi_camera_alignment_preserves_session_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("videos")).unwrap();
        std::fs::create_dir_all(dir.path().join("ttl")).unwrap();
        std::fs::write(dir.path().join("videos/cam_b_0.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("videos/cam_a_0.mp4"), b"x").unwrap();
        write_pulses(&dir.path().join("ttl/b.txt"), &[0.0, 1.0, 2.0]);
        write_pulses(&dir.path().join("ttl/a.txt"), &[0.0, 1.0, 2.0]);

        let session = Session {
            session_id: "s1".into(),
            cameras: vec![
                CameraDescriptor {
                    camera_id: "cam_b".into(),
                    path_glob: "videos/cam_b*.mp4".into(),
                    order_rule: OrderRule::NameAsc,
                    ttl_id: "ttl_b".into(),
                    nominal_rate_hz: 1.0,
                },
                CameraDescriptor {
                    camera_id: "cam_a".into(),
                    path_glob: "videos/cam_a*.mp4".into(),
                    order_rule: OrderRule::NameAsc,
                    ttl_id: "ttl_a".into(),
                    nominal_rate_hz: 1.0,
                },
            ],
            ttls: vec![
                TtlChannelDescriptor { ttl_id: "ttl_b".into(), path_glob: "ttl/b*.txt".into() },
                TtlChannelDescriptor { ttl_id: "ttl_a".into(), path_glob: "ttl/a*.txt".into() },
            ],
            behavioral_controllers: vec![],
        };
        let config = test_config(dir.path().to_path_buf());
        let options = OrchestratorOptions::default();

        let result = SessionOrchestrator::run_with_probe(&config, &session, &options, &FakeProbe(3))
            .unwrap();
        let camera_ids: Vec<_> = result.alignment_stats.iter().map(|(id, _)| id.clone()).collect();
        assert_eq!(camera_ids, vec!["cam_b".to_string(), "cam_a".to_string()]);
    }
}
