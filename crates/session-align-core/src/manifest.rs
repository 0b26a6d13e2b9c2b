//! C5 — compose FileDiscovery + PulseReader + FrameCounter into a session
//! manifest (spec §4.5).

use std::collections::BTreeMap;
use std::path::PathBuf;

use session_types::{CameraManifestEntry, Config, Manifest, Session, TtlManifestEntry};

use crate::{Error, FfprobeProbe, FileDiscovery, FrameCounter, FrameProbe, PulseReader, Result};

pub struct ManifestBuilder;

impl ManifestBuilder {
    /// Build a manifest for `session` rooted at `config.paths.session_dir`,
    /// counting frames (if requested) via the real `ffprobe`-backed probe.
    ///
    /// In fast-discovery mode (`count_frames = false`) only file lists are
    /// populated; `frame_count`/`ttl_pulse_count` stay `None`. In counting
    /// mode both are populated for every camera. The result is deterministic
    /// for identical inputs and every path in it is absolute.
    pub fn build(config: &Config, session: &Session, count_frames: bool) -> Result<Manifest> {
        Self::build_with_probe(config, session, count_frames, &FfprobeProbe)
    }

    /// Same as [`Self::build`], but frame counting goes through `probe`
    /// instead of shelling out to `ffprobe` — lets tests exercise the
    /// counting path with a fake.
    pub fn build_with_probe(
        config: &Config,
        session: &Session,
        count_frames: bool,
        probe: &dyn FrameProbe,
    ) -> Result<Manifest> {
        let session_dir = &config.paths.session_dir;

        let mut ttls = Vec::with_capacity(session.ttls.len());
        let mut ttl_files_by_id: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for ttl in &session.ttls {
            let files = FileDiscovery::resolve(session_dir, &ttl.path_glob, session_types::OrderRule::NameAsc)?;
            if files.is_empty() {
                tracing::warn!(ttl_id = %ttl.ttl_id, pattern = %ttl.path_glob, "no TTL files found");
            }
            ttl_files_by_id.insert(ttl.ttl_id.clone(), files.clone());
            ttls.push(TtlManifestEntry {
                ttl_id: ttl.ttl_id.clone(),
                file_paths: files,
            });
        }

        let ttl_pulse_counts: BTreeMap<String, u64> = if count_frames {
            ttl_files_by_id
                .iter()
                .map(|(id, files)| (id.clone(), PulseReader::read_many(files).len() as u64))
                .collect()
        } else {
            BTreeMap::new()
        };

        let mut cameras = Vec::with_capacity(session.cameras.len());
        for camera in &session.cameras {
            let video_paths =
                FileDiscovery::resolve(session_dir, &camera.path_glob, camera.order_rule)?;
            if video_paths.is_empty() {
                return Err(Error::IngestError {
                    camera_id: camera.camera_id.clone(),
                });
            }

            let (frame_count, ttl_pulse_count) = if count_frames {
                let mut total_frames = 0u64;
                for video in &video_paths {
                    total_frames += FrameCounter::count_with(video, probe)?;
                }
                let pulse_count = ttl_pulse_counts.get(&camera.ttl_id).copied().unwrap_or(0);
                (Some(total_frames), Some(pulse_count))
            } else {
                (None, None)
            };

            cameras.push(CameraManifestEntry {
                camera_id: camera.camera_id.clone(),
                ttl_id: camera.ttl_id.clone(),
                video_paths,
                frame_count,
                ttl_pulse_count,
            });
        }

        let mut bpod_files = Vec::new();
        for controller in &session.behavioral_controllers {
            let files = FileDiscovery::resolve(session_dir, &controller.path_glob, controller.order_rule)?;
            bpod_files.extend(files);
        }

        Ok(Manifest {
            session_id: session.session_id.clone(),
            cameras,
            ttls,
            bpod_files,
        })
    }
}
