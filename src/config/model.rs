//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for lockstamp.
///
/// This struct represents the contents of `.lockstamp.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lock file used when `--lock` is not given (default: ".lockstamp.lock").
    /// Relative paths are resolved against the current directory.
    #[serde(default = "default_lock_path")]
    pub lock_path: PathBuf,

    /// Log level when `RUST_LOG` is not set.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_path: default_lock_path(),
            log_level: LogLevel::default(),
        }
    }
}
