//! CLI argument parsing for fanout.
//!
//! Uses clap derive macros for declarative argument definitions. This
//! module only defines the surface; validation that belongs to the core
//! (worker count, command contents) happens in the `run` module so it is
//! enforced for every caller, not just the CLI.

use clap::Parser;

/// Fanout: run a templated command across many inputs in parallel.
///
/// The command is given as one shell-quoted string and is split into words
/// before pattern parsing, so a value containing spaces stays a single
/// argument. Each word may contain placeholders:
///
///   {}        the whole value          {{text}}  literal "{text}"
///   {:n}      nth character            {:n:m}    characters [n, m)
///   {d:n}     nth component by "d"     {d:n:m}   components [n, m)
///
/// Negative indices count from the end of the value.
#[derive(Parser, Debug)]
#[command(name = "fanout")]
#[command(author, version, about)]
pub struct Cli {
    /// Number of worker threads to execute jobs on.
    #[arg(short = 'j', long = "jobs", default_value_t = 1)]
    pub jobs: usize,

    /// Maximum runtime in milliseconds for each job. Zero means no
    /// deadline.
    #[arg(short = 't', long = "timeout-ms", default_value_t = 0)]
    pub timeout_ms: u64,

    /// Discard subprocess stdout and stderr.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the run summary as a single JSON object on stdout.
    #[arg(long)]
    pub json: bool,

    /// Command pattern to run for each value, as one shell-quoted string.
    pub command: String,

    /// Replacement values, one job per value. A single "-" reads
    /// newline-delimited values from stdin.
    pub values: Vec<String>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
