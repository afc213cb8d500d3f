//! Concurrent job dispatch onto a bounded worker pool.
//!
//! This module owns everything between "a list of resolved commands" and
//! "one result per command":
//!
//! - Fixed worker pool sized by configuration
//! - Shared work queue and result channel (message passing, no shared
//!   mutable job state)
//! - Per-job deadline enforcement with process termination
//! - Exactly-once result aggregation, including on execution panics

mod executor;
mod job;
mod pool;

pub use job::{FailureKind, Job, JobOutcome, JobResult};
pub use pool::{Dispatcher, PoolConfig};
