//! Stderr logging for the lockstamp binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary (or to whatever application embeds the library).

use crate::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`. If a subscriber is already
/// installed, this does nothing.
pub fn init(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
