//! Subprocess execution for a single job.
//!
//! Spawns the job's command, waits for it bounded by the job's deadline,
//! and converts every way the execution can end into a [`JobOutcome`].
//! Errors never escape this module; the worker pool relies on getting an
//! outcome for every job it hands us.

use crate::dispatch::job::{FailureKind, Job, JobOutcome};
use std::io;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// How often a deadline-bounded wait polls the child.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Execute one job to completion.
///
/// With `quiet` set, the child's stdout and stderr are discarded;
/// otherwise they are inherited and interleave freely with other jobs'
/// output.
pub(crate) fn execute_job(job: &Job, quiet: bool) -> JobOutcome {
    let Some((program, args)) = job.argv.split_first() else {
        return JobOutcome::Failure(FailureKind::Spawn("empty command".to_string()));
    };

    let mut command = Command::new(program);
    command.args(args);
    if quiet {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => return JobOutcome::Failure(FailureKind::Spawn(err.to_string())),
    };

    match wait_with_deadline(&mut child, job.deadline) {
        Ok(WaitOutcome::Exited(status)) => match status {
            Some(0) => JobOutcome::Success,
            Some(code) => JobOutcome::Failure(FailureKind::Exit(code)),
            None => JobOutcome::Failure(FailureKind::Signal),
        },
        Ok(WaitOutcome::DeadlineExceeded) => JobOutcome::Failure(FailureKind::Timeout),
        Err(err) => JobOutcome::Failure(FailureKind::Internal(err.to_string())),
    }
}

enum WaitOutcome {
    /// The child exited on its own; `None` means it died to a signal.
    Exited(Option<i32>),
    /// The deadline elapsed; the child has been killed and reaped.
    DeadlineExceeded,
}

/// Wait for a child process, killing it if the deadline elapses first.
///
/// The kill is followed by a blocking `wait` so the process is reaped
/// before the outcome is reported; a job's process never outlives its
/// result.
fn wait_with_deadline(child: &mut Child, deadline: Option<Duration>) -> io::Result<WaitOutcome> {
    let Some(deadline) = deadline else {
        let status = child.wait()?;
        return Ok(WaitOutcome::Exited(status.code()));
    };

    let start = Instant::now();
    loop {
        match child.try_wait()? {
            Some(status) => return Ok(WaitOutcome::Exited(status.code())),
            None => {
                if start.elapsed() >= deadline {
                    kill_child(child);
                    return Ok(WaitOutcome::DeadlineExceeded);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

/// Kill a child and wait for it to terminate.
fn kill_child(child: &mut Child) {
    // On Unix this is SIGKILL; on Windows it is TerminateProcess. The kill
    // reaches the process itself, not necessarily its grandchildren.
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(argv: &[&str], deadline: Option<Duration>) -> Job {
        Job::new(0, argv.iter().map(|s| s.to_string()).collect(), deadline)
    }

    #[test]
    fn zero_exit_is_success() {
        let outcome = execute_job(&job(&["true"], None), true);
        assert_eq!(outcome, JobOutcome::Success);
    }

    #[test]
    fn nonzero_exit_is_failure_with_code() {
        let outcome = execute_job(&job(&["sh", "-c", "exit 3"], None), true);
        assert_eq!(outcome, JobOutcome::Failure(FailureKind::Exit(3)));
    }

    #[test]
    fn missing_executable_is_spawn_failure() {
        let outcome = execute_job(&job(&["fanout-test-no-such-binary"], None), true);
        assert!(matches!(
            outcome,
            JobOutcome::Failure(FailureKind::Spawn(_))
        ));
    }

    #[test]
    fn empty_argv_is_spawn_failure() {
        let outcome = execute_job(&Job::new(0, Vec::new(), None), true);
        assert_eq!(
            outcome,
            JobOutcome::Failure(FailureKind::Spawn("empty command".to_string()))
        );
    }

    #[test]
    fn sleep_past_deadline_times_out() {
        let started = Instant::now();
        let outcome = execute_job(
            &job(&["sleep", "10"], Some(Duration::from_millis(100))),
            true,
        );
        assert_eq!(outcome, JobOutcome::Failure(FailureKind::Timeout));
        // The wait must return at the deadline, not after the sleep.
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn timed_out_process_is_actually_killed() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("marker");
        let script = format!("sleep 1 && touch {}", marker.display());

        let outcome = execute_job(
            &job(&["sh", "-c", &script], Some(Duration::from_millis(100))),
            true,
        );
        assert_eq!(outcome, JobOutcome::Failure(FailureKind::Timeout));

        // Were the shell still alive it would create the marker once the
        // sleep finishes.
        std::thread::sleep(Duration::from_millis(1200));
        assert!(!marker.exists());
    }

    #[test]
    fn fast_command_beats_deadline() {
        let outcome = execute_job(&job(&["true"], Some(Duration::from_secs(10))), true);
        assert_eq!(outcome, JobOutcome::Success);
    }
}
