//! Lockstamp: last-write tokens for shared lock files.
//!
//! This is the main entry point for the `lockstamp` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and maps errors to exit
//! codes.

mod cli;
mod commands;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
