//! Driver wiring the pattern engine to the dispatcher.
//!
//! Pre-flight (command splitting, pattern parsing, configuration checks)
//! is all-or-nothing: any failure aborts before a single job exists.
//! After that the run always completes, per-job failures are aggregated
//! into the summary, and the exit status reflects whether every job
//! succeeded.

use crate::dispatch::{Dispatcher, JobResult, PoolConfig};
use crate::error::{FanoutError, Result};
use crate::pattern::Template;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, BufRead};
use std::time::Duration;

/// Everything the driver needs for one run, as collected by the CLI.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Command pattern as one shell-quoted string.
    pub command: String,
    /// Replacement values; a single `-` reads them from stdin.
    pub values: Vec<String>,
    /// Worker thread count.
    pub jobs: usize,
    /// Per-job deadline in milliseconds, zero for unbounded.
    pub timeout_ms: u64,
    /// Discard child stdout/stderr.
    pub quiet: bool,
    /// Emit the summary as JSON instead of the human format.
    pub json: bool,
}

/// Aggregate result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl RunSummary {
    fn new(started_at: DateTime<Utc>, finished_at: DateTime<Utc>, results: &[JobResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.outcome.is_success()).count();
        RunSummary {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            started_at,
            finished_at,
            duration_ms: finished_at
                .signed_duration_since(started_at)
                .num_milliseconds(),
        }
    }

    /// Serialize as a single-line JSON object.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            FanoutError::Config(format!("failed to serialize run summary: {}", e))
        })
    }
}

/// Execute one full run: parse, resolve, dispatch, summarize.
///
/// Returns `Ok(())` only when every job succeeded; a run whose jobs all
/// completed but where some failed returns [`FanoutError::JobsFailed`],
/// so the process exit status distinguishes the two.
pub fn run(config: RunConfig) -> Result<()> {
    let templates = parse_command(&config.command)?;
    let dispatcher = Dispatcher::new(PoolConfig {
        workers: config.jobs,
        deadline: (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms)),
        quiet: config.quiet,
    })?;
    let values = gather_values(config.values)?;

    let commands: Vec<Vec<String>> = values
        .iter()
        .map(|value| resolve_command(&templates, value))
        .collect();

    eprintln!(
        "running {} job(s) on {} worker(s)",
        commands.len(),
        config.jobs
    );

    let started_at = Utc::now();
    let results = dispatcher.run(commands);
    let finished_at = Utc::now();

    let summary = RunSummary::new(started_at, finished_at, &results);
    if config.json {
        println!("{}", summary.to_json()?);
    } else {
        print_summary(&summary);
    }

    if summary.failed > 0 {
        return Err(FanoutError::JobsFailed {
            failed: summary.failed,
            total: summary.total,
        });
    }
    Ok(())
}

/// Split the command string into words and parse each word as a pattern.
///
/// The split happens before substitution, so a replacement value
/// containing spaces stays a single argument.
fn parse_command(command: &str) -> Result<Vec<Template>> {
    let words = shell_words::split(command).map_err(|e| {
        FanoutError::Config(format!(
            "failed to parse command '{}': {}\n\
             Fix: check for unmatched quotes or invalid escape sequences.",
            command, e
        ))
    })?;

    if words.is_empty() {
        return Err(FanoutError::Config(
            "no command supplied".to_string(),
        ));
    }

    words
        .iter()
        .map(|word| Template::parse(word).map_err(FanoutError::from))
        .collect()
}

/// Instantiate every template word against one replacement value.
fn resolve_command(templates: &[Template], value: &str) -> Vec<String> {
    templates
        .iter()
        .map(|template| template.resolve(value))
        .collect()
}

/// Expand the stdin sentinel: a single `-` means the value list arrives
/// newline-delimited on stdin.
fn gather_values(values: Vec<String>) -> Result<Vec<String>> {
    if values.len() == 1 && values[0] == "-" {
        eprintln!("reading values from stdin");
        return read_values(io::stdin().lock());
    }
    Ok(values)
}

/// Read newline-delimited values, skipping blank lines.
fn read_values<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut values = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| {
            FanoutError::Config(format!("failed to read values from stdin: {}", e))
        })?;
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            values.push(line.to_string());
        }
    }
    Ok(values)
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Started:          {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S%.3f UTC")
    );
    println!(
        "Finished:         {}",
        summary.finished_at.format("%Y-%m-%d %H:%M:%S%.3f UTC")
    );
    println!("Total time:       {:.3}s", summary.duration_ms as f64 / 1000.0);
    println!("Successful jobs:  {}", summary.succeeded);
    println!("Failed jobs:      {}", summary.failed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn config(command: &str, values: &[&str]) -> RunConfig {
        RunConfig {
            command: command.to_string(),
            values: values.iter().map(|s| s.to_string()).collect(),
            jobs: 2,
            timeout_ms: 0,
            quiet: true,
            json: false,
        }
    }

    #[test]
    fn run_succeeds_when_all_jobs_succeed() {
        let result = run(config("echo {}", &["a", "b", "c"]));
        assert!(result.is_ok());
    }

    #[test]
    fn run_reports_failed_jobs() {
        let result = run(config("false", &["x", "y"]));
        match result.unwrap_err() {
            FanoutError::JobsFailed { failed, total } => {
                assert_eq!(failed, 2);
                assert_eq!(total, 2);
            }
            err => panic!("unexpected error: {:?}", err),
        }
    }

    #[test]
    fn run_mixes_success_and_failure() {
        // One value resolves to "true", the other to "false".
        let result = run(config("{}", &["true", "false"]));
        match result.unwrap_err() {
            FanoutError::JobsFailed { failed, total } => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
            }
            err => panic!("unexpected error: {:?}", err),
        }
    }

    #[test]
    fn run_with_no_values_is_an_empty_success() {
        let result = run(config("echo {}", &[]));
        assert!(result.is_ok());
    }

    #[test]
    fn broken_pattern_aborts_before_any_job() {
        let result = run(config("echo {oops", &["a"]));
        assert!(matches!(result.unwrap_err(), FanoutError::Pattern(_)));
    }

    #[test]
    fn empty_command_is_rejected() {
        let result = run(config("", &["a"]));
        let err = result.unwrap_err();
        assert!(matches!(err, FanoutError::Config(_)));
        assert!(err.to_string().contains("no command supplied"));
    }

    #[test]
    fn unmatched_quote_is_rejected() {
        let result = run(config("echo \"unmatched", &["a"]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn zero_workers_is_rejected_before_spawning() {
        let mut cfg = config("echo {}", &["a"]);
        cfg.jobs = 0;
        let result = run(cfg);
        assert!(matches!(result.unwrap_err(), FanoutError::Config(_)));
    }

    #[test]
    fn parse_command_splits_before_substitution() {
        let templates = parse_command("cp {} {/:-1}.bak").unwrap();
        assert_eq!(templates.len(), 3);

        let argv = resolve_command(&templates, "dir/sub/name");
        assert_eq!(argv, vec!["cp", "dir/sub/name", "name.bak"]);
    }

    #[test]
    fn value_with_spaces_stays_one_argument() {
        let templates = parse_command("touch {}").unwrap();
        let argv = resolve_command(&templates, "a file name");
        assert_eq!(argv, vec!["touch", "a file name"]);
    }

    #[test]
    fn read_values_splits_lines_and_skips_blanks() {
        let input = Cursor::new("a.txt\nb.txt\n\nc.txt\n");
        let values = read_values(input).unwrap();
        assert_eq!(values, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn read_values_handles_crlf() {
        let input = Cursor::new("a\r\nb\r\n");
        let values = read_values(input).unwrap();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn read_values_empty_input() {
        let values = read_values(Cursor::new("")).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn gather_values_passes_plain_values_through() {
        let values = gather_values(vec!["a".to_string(), "-".to_string()]).unwrap();
        // "-" only acts as the stdin sentinel when it is the sole value.
        assert_eq!(values, vec!["a", "-"]);
    }

    #[test]
    fn summary_counts_and_serializes() {
        use crate::dispatch::{FailureKind, JobOutcome};

        let started_at = Utc::now();
        let finished_at = started_at + chrono::Duration::milliseconds(250);
        let results = vec![
            JobResult {
                id: 0,
                outcome: JobOutcome::Success,
            },
            JobResult {
                id: 1,
                outcome: JobOutcome::Failure(FailureKind::Exit(1)),
            },
        ];

        let summary = RunSummary::new(started_at, finished_at, &results);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.duration_ms, 250);

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["duration_ms"], 250);
        assert!(json["started_at"].is_string());
        assert!(json["finished_at"].is_string());
    }
}
