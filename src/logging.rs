//! Logging setup for the command-line tool

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber; `RUST_LOG` wins over the default level
///
/// Safe to call more than once: later calls leave the first subscriber in
/// place.
pub fn init(verbose: bool) {
    let default_level = if verbose { "quizdoc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
