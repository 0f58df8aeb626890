//! Diagnostics output setup.
//!
//! Skipped lines are reported through `tracing` events. `RUST_LOG`
//! overrides the default level, e.g. `RUST_LOG=damef_rs=debug`.

use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr subscriber. `verbose` lowers the default level to `debug`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Subscriber for tests, captured by the test harness.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
