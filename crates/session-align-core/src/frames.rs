//! C4 — frame count for a video file via an external probe (spec §4.4).
//!
//! Video decoding itself is out of scope (spec §1); the probe is a black-box
//! collaborator exactly like the one `braid-offline::calc_fps_from_data`
//! treats the camera/TTL relationship as external to the tracking core.

use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Abstraction over "ask some external tool how many frames are in this
/// video", so the default `ffprobe`-backed implementation can be swapped out
/// in tests without needing a real video decoder on the test machine.
pub trait FrameProbe {
    fn probe(&self, path: &Path) -> std::result::Result<u64, String>;
}

/// Shells out to `ffprobe -count_frames` and parses the frame count from its
/// stdout.
pub struct FfprobeProbe;

impl FrameProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> std::result::Result<u64, String> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-count_frames",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=nb_read_frames",
                "-of",
                "default=nokey=1:noprint_wrappers=1",
            ])
            .arg(path)
            .output()
            .map_err(|e| format!("failed to spawn ffprobe: {e}"))?;

        if !output.status.success() {
            return Err(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("could not parse ffprobe output '{}': {e}", stdout.trim()))
    }
}

pub struct FrameCounter;

impl FrameCounter {
    /// Count frames in `video_path` via `ffprobe`.
    ///
    /// A missing or zero-byte file returns `Ok(0)` with a warning (the file
    /// genuinely has no frames, not a probe failure). A probe invocation
    /// failure on an otherwise-present file is a fatal `FrameCountError`.
    pub fn count(video_path: &Path) -> Result<u64> {
        Self::count_with(video_path, &FfprobeProbe)
    }

    pub fn count_with(video_path: &Path, probe: &dyn FrameProbe) -> Result<u64> {
        match std::fs::metadata(video_path) {
            Ok(meta) if meta.len() == 0 => {
                tracing::warn!(path = %video_path.display(), "zero-byte video file, reporting 0 frames");
                return Ok(0);
            }
            Ok(_) => {}
            Err(_) => {
                tracing::warn!(path = %video_path.display(), "video file missing, reporting 0 frames");
                return Ok(0);
            }
        }

        probe.probe(video_path).map_err(|reason| Error::FrameCountError {
            path: video_path.to_path_buf(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeProbe(u64);
    impl FrameProbe for FakeProbe {
        fn probe(&self, _path: &Path) -> std::result::Result<u64, String> {
            Ok(self.0)
        }
    }

    struct FailingProbe;
    impl FrameProbe for FailingProbe {
        fn probe(&self, _path: &Path) -> std::result::Result<u64, String> {
            Err("decoder crashed".into())
        }
    }

    #[test]
    fn counts_via_probe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video.mp4");
        std::fs::write(&path, b"not really a video but non-empty").unwrap();
        assert_eq!(FrameCounter::count_with(&path, &FakeProbe(64)).unwrap(), 64);
    }

    #[test]
    fn zero_byte_file_is_zero_frames_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.mp4");
        std::fs::write(&path, b"").unwrap();
        assert_eq!(FrameCounter::count_with(&path, &FailingProbe).unwrap(), 0);
    }

    #[test]
    fn missing_file_is_zero_frames_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.mp4");
        assert_eq!(FrameCounter::count_with(&path, &FailingProbe).unwrap(), 0);
    }

    #[test]
    fn probe_failure_on_present_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video.mp4");
        std::fs::write(&path, b"nonempty").unwrap();
        let err = FrameCounter::count_with(&path, &FailingProbe).unwrap_err();
        assert!(matches!(err, Error::FrameCountError { .. }));
    }
}
