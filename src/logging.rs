//! Diagnostic logging setup for the binary

use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber
///
/// `RUST_LOG` wins when set. Otherwise `-v` picks info, `-vv` debug, and with
/// no flag the configured level applies.
pub fn init(verbosity: u8, configured_level: &str) {
    let level = match verbosity {
        0 => configured_level,
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trialkeeper={}", level)));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
