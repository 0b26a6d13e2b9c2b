//! C6 — compare per-camera frame counts against TTL pulse counts (spec
//! §4.6).

use chrono::Utc;

use session_types::{CameraStatus, CameraVerification, Manifest, OverallStatus, VerificationResult};

use crate::{Error, Result};

pub struct Verifier;

impl Verifier {
    /// Verify every camera in `manifest` against `tolerance_frames`.
    ///
    /// Always returns `Ok` — a FAIL overall status is a value in the result,
    /// not an error; deciding whether a FAIL aborts the run is the caller's
    /// job (spec §4.12 can override it). Requires `manifest` to have been
    /// built with counting enabled; a camera with no counts is a programming
    /// error, not a recoverable condition.
    pub fn verify(manifest: &Manifest, tolerance_frames: u64) -> Result<VerificationResult> {
        let mut cameras = Vec::with_capacity(manifest.cameras.len());

        for camera in &manifest.cameras {
            let frame_count = camera.frame_count.ok_or_else(|| {
                Error::DomainError(format!(
                    "camera '{}' has no frame count; manifest must be built with counting enabled before verification",
                    camera.camera_id
                ))
            })?;
            let ttl_pulse_count = camera.ttl_pulse_count.unwrap_or(0);
            let verifiable = manifest.camera_is_verifiable(camera);
            let mismatch = frame_count as i64 - ttl_pulse_count as i64;

            let status = if !verifiable {
                CameraStatus::Warn
            } else if mismatch.unsigned_abs() > tolerance_frames {
                CameraStatus::Fail
            } else if mismatch != 0 {
                CameraStatus::Warn
            } else {
                CameraStatus::Ok
            };

            cameras.push(CameraVerification {
                camera_id: camera.camera_id.clone(),
                ttl_id: camera.ttl_id.clone(),
                frame_count,
                ttl_pulse_count,
                mismatch,
                verifiable,
                status,
            });
        }

        let overall_status = if cameras.iter().any(|c| c.status == CameraStatus::Fail) {
            OverallStatus::Fail
        } else if cameras.iter().any(|c| c.status == CameraStatus::Warn) {
            OverallStatus::Warn
        } else {
            OverallStatus::Pass
        };

        Ok(VerificationResult {
            session_id: manifest.session_id.clone(),
            overall_status,
            cameras,
            generated_at: Utc::now().to_rfc3339(),
        })
    }
}
