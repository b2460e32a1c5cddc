//! Command implementations for lockstamp.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations and resolves the config and lock path they run against.

mod init;
mod stamp;

use crate::cli::{Cli, Command};
use lockstamp::config::{Config, LogLevel};
use lockstamp::error::Result;
use lockstamp::logging;
use std::path::{Path, PathBuf};

/// Resolved settings for commands that operate on a lock file.
pub(crate) struct StampContext {
    pub lock_path: PathBuf,
}

impl StampContext {
    /// Load the config, start logging, and pick the lock file.
    ///
    /// `--lock` wins over `lock_path` from the config.
    fn resolve(config_path: Option<&Path>, lock_override: Option<PathBuf>) -> Result<Self> {
        let config = Config::discover(config_path)?;
        logging::init(config.log_level);

        Ok(Self {
            lock_path: lock_override.unwrap_or(config.lock_path),
        })
    }
}

/// Dispatch a command to its implementation.
///
/// Returns the process exit code on success.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let Cli {
        config,
        lock,
        command,
    } = cli;

    match command {
        Command::Init(args) => {
            // The config may not exist or may be broken; that is what init fixes.
            logging::init(LogLevel::default());
            init::cmd_init(config.as_deref(), args)
        }
        Command::Touch => {
            let ctx = StampContext::resolve(config.as_deref(), lock)?;
            stamp::cmd_touch(&ctx)
        }
        Command::Show(args) => {
            let ctx = StampContext::resolve(config.as_deref(), lock)?;
            stamp::cmd_show(&ctx, args)
        }
        Command::Check(args) => {
            let ctx = StampContext::resolve(config.as_deref(), lock)?;
            stamp::cmd_check(&ctx, args)
        }
    }
}
