//! Exit code constants for the fanout CLI.
//!
//! - 0: Success (every job succeeded)
//! - 1: User error (bad arguments, invalid configuration)
//! - 2: Pattern error (malformed command pattern)
//! - 3: Job failure (at least one job ended in failure)

/// Successful execution with every job succeeding.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, zero workers, empty command, unreadable stdin.
pub const USER_ERROR: i32 = 1;

/// Pattern error: a command word failed to parse as a pattern.
pub const PATTERN_ERROR: i32 = 2;

/// At least one job failed (spawn failure, non-zero exit, or timeout).
pub const JOB_FAILURE: i32 = 3;
