//! C3 — parse TTL pulse files: one timestamp per line, seconds, float
//! (spec §4.3).

use std::path::Path;

pub struct PulseReader;

impl PulseReader {
    /// Read one file of pulse timestamps.
    ///
    /// One pulse per line, whitespace trimmed, blank lines ignored, invalid
    /// lines logged and skipped. A missing file returns an empty sequence
    /// with a warning rather than an error — TTL channels may legitimately
    /// be absent for a given recording. The returned sequence is sorted
    /// ascending.
    pub fn read(path: &Path) -> Vec<f64> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "TTL pulse file missing or unreadable");
                return Vec::new();
            }
        };

        let mut pulses: Vec<f64> = contents
            .lines()
            .enumerate()
            .filter_map(|(line_no, line)| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match trimmed.parse::<f64>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        tracing::warn!(
                            path = %path.display(),
                            line = line_no + 1,
                            content = trimmed,
                            "skipping unparseable TTL pulse line"
                        );
                        None
                    }
                }
            })
            .collect();

        pulses.sort_by(|a, b| a.partial_cmp(b).expect("pulse timestamps are never NaN"));
        pulses
    }

    /// Read and merge pulse timestamps from several files under one
    /// channel, concatenating then sorting ascending — merging multiple
    /// files is the caller's responsibility per spec §4.3, this is the
    /// straightforward implementation of that merge.
    pub fn read_many(paths: &[std::path::PathBuf]) -> Vec<f64> {
        let mut all: Vec<f64> = paths.iter().flat_map(|p| Self::read(p)).collect();
        all.sort_by(|a, b| a.partial_cmp(b).expect("pulse timestamps are never NaN"));
        all
    }
}
