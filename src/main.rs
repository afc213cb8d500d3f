//! Fanout: run a templated command across many inputs on a bounded worker
//! pool.
//!
//! This is the main entry point for the `fanout` CLI. It parses arguments,
//! hands them to the run driver, and maps errors to exit codes.

mod cli;
mod dispatch;
mod error;
mod exit_codes;
mod pattern;
mod run;

use cli::Cli;
use run::RunConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let config = RunConfig {
        command: cli.command,
        values: cli.values,
        jobs: cli.jobs,
        timeout_ms: cli.timeout_ms,
        quiet: cli.quiet,
        json: cli.json,
    };

    match run::run(config) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
