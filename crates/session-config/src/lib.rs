//! Loads `config.toml` and `session.toml` into the validated
//! [`session_types::Config`] and [`session_types::Session`] structures the
//! alignment core receives.
//!
//! Kept out of `session-align-core` deliberately: the core never touches
//! TOML or a config file's location on disk, it only receives already
//! validated structures (spec §1).

use std::path::{Path, PathBuf};

use session_types::{Config, Session};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("{source}")]
    TomlDe {
        #[from]
        source: toml::de::Error,
    },
    #[error("{source}")]
    ShellExpand {
        #[from]
        source: shellexpand::LookupError<std::env::VarError>,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

type Result<T> = std::result::Result<T, Error>;

/// Split `path` (which must be a file) into directory and filename component.
fn split_path(path: &Path) -> (PathBuf, PathBuf) {
    let mut components = path.components();
    let filename = components.next_back().expect("path has a filename").as_os_str().into();
    let dirname = components.as_path().into();
    (dirname, filename)
}

/// If `path` is relative, make it relative to `dirname`. `path` may start
/// with `~`, expanded to the home directory.
fn fixup_relative_path(path: &mut PathBuf, dirname: &Path) -> Result<()> {
    let pathstr = path.to_string_lossy().into_owned();
    let expanded = shellexpand::full(&pathstr)?;
    *path = PathBuf::from(expanded.into_owned());
    if path.is_relative() {
        *path = dirname.join(&path);
    }
    Ok(())
}

/// Load and validate `config.toml`.
///
/// Performs the structural validation from spec §3
/// (`source = TTL ⇒ ttl_id present`, `source = EXTERNAL_CLOCK ⇒
/// external_stream present`, `jitter_budget_s >= 0`) and resolves
/// `paths.session_dir`/`paths.output_dir` relative to the config file's own
/// directory.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let mut cfg: Config = toml::from_str(&contents)?;

    let (dirname, _) = split_path(path);
    fixup_relative_path(&mut cfg.paths.session_dir, &dirname)?;
    fixup_relative_path(&mut cfg.paths.output_dir, &dirname)?;

    cfg.validate().map_err(|e| Error::Validation(e.to_string()))?;

    tracing::debug!(session_dir = %cfg.paths.session_dir.display(), "loaded config");
    Ok(cfg)
}

/// Load and validate `session.toml`.
///
/// Performs the camera/trial-type TTL reference validation from spec §3: a
/// camera or trial-type sync channel naming a TTL that is not present in
/// `session.ttls` is a `Validation` error. A dangling reference caught here
/// is a different concern from the manifest-time "unverifiable camera" of
/// spec §4.6 — this check guards against a session file that is simply
/// wrong, not against hardware that failed to record a TTL file at runtime.
pub fn load_session<P: AsRef<Path>>(path: P) -> Result<Session> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let session: Session = toml::from_str(&contents)?;
    validate_ttl_references(&session)?;
    tracing::debug!(session_id = %session.session_id, n_cameras = session.cameras.len(), "loaded session");
    Ok(session)
}

fn validate_ttl_references(session: &Session) -> Result<()> {
    for camera in &session.cameras {
        if !session.has_ttl(&camera.ttl_id) {
            return Err(Error::Validation(format!(
                "camera '{}' references unknown ttl_id '{}'",
                camera.camera_id, camera.ttl_id
            )));
        }
    }
    for controller in &session.behavioral_controllers {
        for trial_type in &controller.trial_types {
            if !session.has_ttl(&trial_type.sync_ttl_channel_id) {
                return Err(Error::Validation(format!(
                    "trial type '{}' references unknown ttl_id '{}'",
                    trial_type.trial_type, trial_type.sync_ttl_channel_id
                )));
            }
        }
    }
    Ok(())
}
