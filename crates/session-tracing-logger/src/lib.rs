//! Global `tracing` setup used by every binary and test harness in this
//! workspace, so every crate logs through `tracing` rather than `println!`.

use tracing_subscriber::{
    fmt::{self, format, time},
    prelude::*,
    EnvFilter,
};

struct Guard {}

impl Drop for Guard {
    fn drop(&mut self) {}
}

/// Install a global `tracing` subscriber reading `RUST_LOG` for filtering.
///
/// Panics if a global subscriber is already installed. Intended to be called
/// once, near the start of `main`.
pub fn init() -> impl Drop {
    init_result()
        .map_err(|e| e.1)
        .expect("could not set global tracing subscriber")
}

/// Like [`init`], but tolerant of a subscriber already being installed (e.g.
/// because an earlier test in the same process called it). Intended for
/// `#[test]` functions.
pub fn init_for_tests() {
    let evt_fmt = format().with_timer(time::Uptime::default()).compact();
    let fmt_layer = fmt::layer().with_test_writer().event_format(evt_fmt);
    let _ = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::from_default_env())
        .try_init();
}

fn init_result() -> Result<impl Drop, (impl Drop, tracing::subscriber::SetGlobalDefaultError)> {
    let evt_fmt = format().with_timer(time::Uptime::default()).compact();
    let fmt_layer = fmt::layer().event_format(evt_fmt);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::from_default_env())
        .init();

    let _guard = Guard {};

    Ok::<_, (Guard, tracing::subscriber::SetGlobalDefaultError)>(_guard)
}
