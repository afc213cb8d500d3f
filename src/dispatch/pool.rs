//! Fixed worker pool and result aggregation.
//!
//! Hand-off is message passing end to end: jobs flow through an `mpsc`
//! channel whose receiver is shared behind `Arc<Mutex<..>>` (the mutex is
//! held only for the receive itself, never across an execution), and
//! results flow back through a second channel with one sender clone per
//! worker. Jobs and results are immutable, so no further locking exists.

use crate::dispatch::executor::execute_job;
use crate::dispatch::job::{FailureKind, Job, JobOutcome, JobResult};
use crate::error::{FanoutError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Dispatcher configuration, supplied by the driver.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads. Must be at least one.
    pub workers: usize,
    /// Per-job deadline, `None` for unbounded.
    pub deadline: Option<Duration>,
    /// Discard child stdout/stderr instead of inheriting them.
    pub quiet: bool,
}

/// Executes batches of commands on a fixed worker pool.
#[derive(Debug)]
pub struct Dispatcher {
    config: PoolConfig,
}

impl Dispatcher {
    /// Create a dispatcher, rejecting a zero worker count before anything
    /// is spawned.
    pub fn new(config: PoolConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(FanoutError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(Dispatcher { config })
    }

    /// Execute one job per command, returning exactly one result per job.
    ///
    /// Jobs are queued in list order and raced for by the workers, so
    /// results arrive in completion order. The call returns once every
    /// worker has drained the queue and exited.
    pub fn run(&self, commands: Vec<Vec<String>>) -> Vec<JobResult> {
        let total = commands.len();

        let (work_tx, work_rx) = mpsc::channel::<Job>();
        let work_rx = Arc::new(Mutex::new(work_rx));
        let (done_tx, done_rx) = mpsc::channel::<JobResult>();

        let mut handles = Vec::with_capacity(self.config.workers);
        for worker in 0..self.config.workers {
            let queue = Arc::clone(&work_rx);
            let done = done_tx.clone();
            let quiet = self.config.quiet;
            handles.push(thread::spawn(move || worker_loop(worker, queue, done, quiet)));
        }
        // Workers hold the only remaining result senders, so the receive
        // loop below terminates when the last worker exits.
        drop(done_tx);

        for (id, argv) in commands.into_iter().enumerate() {
            let job = Job::new(id as u64, argv, self.config.deadline);
            if work_tx.send(job).is_err() {
                break;
            }
        }
        drop(work_tx);

        let mut results = Vec::with_capacity(total);
        for result in done_rx {
            results.push(result);
        }

        for handle in handles {
            let _ = handle.join();
        }
        results
    }
}

/// Pull jobs off the shared queue until it closes.
///
/// Execution is wrapped in `catch_unwind` so that a panic anywhere in the
/// execution path still produces a failure result instead of losing the
/// job.
fn worker_loop(
    worker: usize,
    queue: Arc<Mutex<Receiver<Job>>>,
    done: Sender<JobResult>,
    quiet: bool,
) {
    loop {
        let job = {
            let receiver = queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            receiver.recv()
        };
        let Ok(job) = job else {
            break;
        };

        eprintln!(
            "[worker {}] job {}: {}",
            worker,
            job.id,
            shell_words::join(&job.argv)
        );

        let id = job.id;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| execute_job(&job, quiet)))
            .unwrap_or_else(|_| {
                JobOutcome::Failure(FailureKind::Internal("job execution panicked".to_string()))
            });

        if let JobOutcome::Failure(kind) = &outcome {
            eprintln!("[worker {}] job {} failed: {}", worker, id, kind);
        }

        let _ = done.send(JobResult { id, outcome });
    }
}
