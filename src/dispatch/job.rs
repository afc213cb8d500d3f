//! Job and result types.

use std::time::Duration;
use thiserror::Error;

/// A fully resolved, ready-to-execute command.
///
/// Jobs are immutable once created and owned exclusively by the dispatcher
/// until their result is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Sequence number, assigned in replacement-list order.
    pub id: u64,
    /// Command words; the first word is the executable.
    pub argv: Vec<String>,
    /// Maximum wall-clock runtime, `None` for unbounded.
    pub deadline: Option<Duration>,
}

impl Job {
    pub fn new(id: u64, argv: Vec<String>, deadline: Option<Duration>) -> Self {
        Job { id, argv, deadline }
    }
}

/// Why a job failed.
///
/// The `Display` form is the detail string surfaced to the driver, and it
/// distinguishes every cause: a command that never started, a non-zero
/// exit, a signal death, a deadline kill, and an internal execution error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// The command could not be started.
    #[error("could not start: {0}")]
    Spawn(String),

    /// The child exited with a non-zero status.
    #[error("exited with status {0}")]
    Exit(i32),

    /// The child was terminated by a signal not sent by the dispatcher.
    #[error("terminated by signal")]
    Signal,

    /// The per-job deadline elapsed and the child was killed.
    #[error("deadline exceeded")]
    Timeout,

    /// The execution path itself failed (wait error or caught panic).
    #[error("execution error: {0}")]
    Internal(String),
}

/// Terminal outcome of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The child exited with status zero within its deadline.
    Success,
    /// The job failed; see [`FailureKind`] for the cause.
    Failure(FailureKind),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success)
    }
}

/// Produced exactly once per job by the worker that executed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub id: u64,
    pub outcome: JobOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_is_success() {
        assert!(JobOutcome::Success.is_success());
        assert!(!JobOutcome::Failure(FailureKind::Timeout).is_success());
    }

    #[test]
    fn failure_kinds_are_distinguishable_by_display() {
        let details = [
            FailureKind::Spawn("No such file or directory".to_string()).to_string(),
            FailureKind::Exit(1).to_string(),
            FailureKind::Signal.to_string(),
            FailureKind::Timeout.to_string(),
            FailureKind::Internal("boom".to_string()).to_string(),
        ];
        for (i, a) in details.iter().enumerate() {
            for (j, b) in details.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn failure_display_messages() {
        assert_eq!(
            FailureKind::Spawn("not found".to_string()).to_string(),
            "could not start: not found"
        );
        assert_eq!(FailureKind::Exit(2).to_string(), "exited with status 2");
        assert_eq!(FailureKind::Timeout.to_string(), "deadline exceeded");
    }
}
