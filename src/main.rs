//! Agentwire: structured editor for agent-framework project entrypoints.
//!
//! This is the main entry point for the `agentwire` CLI. It parses arguments,
//! installs logging, dispatches to the appropriate command handler, and
//! handles errors with proper exit codes.

mod binding;
mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod frameworks;
pub mod fs;
mod locate;
mod logging;
pub mod records;
mod source;
mod validate;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init_logging(cli.verbose);

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
