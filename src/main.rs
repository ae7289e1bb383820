//! Malboxes: build and configure malware analysis VMs.
//!
//! This is the main entry point for the `malboxes` CLI. It parses arguments,
//! sets up logging, resolves the configuration directory, dispatches to the
//! appropriate command handler, and handles errors with proper exit codes.

mod cli;
mod commands;

#[cfg(test)]
mod test_support;

use cli::Cli;
use malboxes::context::AppContext;
use malboxes::{exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.debug);

    let result = AppContext::resolve(cli.config_dir).and_then(|ctx| {
        tracing::debug!(config_dir = %ctx.config_dir.display(), "resolved configuration directory");
        commands::dispatch(&ctx, cli.command)
    });

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
