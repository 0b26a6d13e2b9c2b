//! C2 — resolve glob patterns against a session directory into sorted
//! absolute paths (spec §4.2).

use std::path::{Path, PathBuf};

use session_types::OrderRule;

use crate::{Error, Result};

pub struct FileDiscovery;

impl FileDiscovery {
    /// Resolve `glob_pattern` relative to `session_dir`, returning absolute
    /// paths sorted per `order`.
    ///
    /// A pattern that matches nothing returns an empty list, not an error —
    /// TTL channels and optional modalities may legitimately be absent. Only
    /// a non-existent `session_dir` is fatal.
    pub fn resolve(session_dir: &Path, glob_pattern: &str, order: OrderRule) -> Result<Vec<PathBuf>> {
        if !session_dir.exists() {
            return Err(Error::DiscoveryError {
                path: session_dir.to_path_buf(),
            });
        }

        let full_pattern = session_dir.join(glob_pattern);
        let pattern_str = full_pattern.to_string_lossy().into_owned();

        let mut paths: Vec<PathBuf> = glob::glob(&pattern_str)
            .map_err(|e| Error::DomainError(format!("invalid glob pattern '{pattern_str}': {e}")))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(absolute(&path)),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable directory entry during discovery");
                    None
                }
            })
            .collect();

        sort_paths(&mut paths, order);
        Ok(paths)
    }

    /// Find each glob pattern in `patterns`, logging how many matched for
    /// observability. Convenience wrapper for callers resolving several
    /// patterns in a row (e.g. `ManifestBuilder` over all cameras).
    pub fn resolve_all(
        session_dir: &Path,
        patterns: impl IntoIterator<Item = (String, String, OrderRule)>,
    ) -> Result<Vec<(String, Vec<PathBuf>)>> {
        patterns
            .into_iter()
            .map(|(id, pattern, order)| {
                let paths = Self::resolve(session_dir, &pattern, order)?;
                tracing::debug!(id = %id, n_files = paths.len(), "resolved glob");
                Ok((id, paths))
            })
            .collect()
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn sort_paths(paths: &mut [PathBuf], order: OrderRule) {
    match order {
        OrderRule::NameAsc => paths.sort(),
        OrderRule::NameDesc => {
            paths.sort();
            paths.reverse();
        }
        OrderRule::MtimeAsc => paths.sort_by_key(|p| mtime(p)),
        OrderRule::MtimeDesc => {
            paths.sort_by_key(|p| mtime(p));
            paths.reverse();
        }
    }
}

fn mtime(path: &Path) -> std::time::SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
}
