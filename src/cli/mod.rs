//! CLI argument parsing for lockstamp.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lockstamp: last-write tokens for shared lock files.
///
/// Writers stamp a lock file with a fresh token after every change.
/// Readers keep the token they saw and ask later whether it is still current.
#[derive(Parser, Debug)]
#[command(name = "lockstamp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: .lockstamp.yaml in the current directory, if present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Lock file to operate on (overrides `lock_path` from the config).
    #[arg(long, global = true, value_name = "PATH")]
    pub lock: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for lockstamp.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config file.
    Init(InitArgs),

    /// Record a write: stamp the lock file with a new token.
    ///
    /// Takes the exclusive lock and prints the new token as hex.
    Touch,

    /// Print the token currently stored in the lock file.
    Show(ShowArgs),

    /// Check whether the lock file was written since a token.
    ///
    /// Prints `unchanged` (exit 0) or `modified` (exit 2).
    Check(CheckArgs),
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Print a JSON object instead of bare hex.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Token from an earlier `touch` or `show`, as hex.
    pub since: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
