//! Error types for the fanout CLI.
//!
//! Uses thiserror for derive macros. Every variant maps to one exit code;
//! per-job runtime failures are not errors in this sense, they are
//! aggregated into the run summary and only surface here as `JobsFailed`.

use crate::exit_codes;
use crate::pattern::PatternError;
use thiserror::Error;

/// Main error type for fanout operations.
#[derive(Error, Debug)]
pub enum FanoutError {
    /// A command word failed to parse as a pattern. Fatal before any job
    /// is created; a broken template never partially executes.
    #[error("invalid command pattern: {0}")]
    Pattern(#[from] PatternError),

    /// Invalid arguments or configuration (zero workers, empty command,
    /// unreadable stdin).
    #[error("{0}")]
    Config(String),

    /// The run completed but at least one job ended in failure.
    #[error("{failed} of {total} job(s) failed")]
    JobsFailed { failed: usize, total: usize },
}

impl FanoutError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FanoutError::Pattern(_) => exit_codes::PATTERN_ERROR,
            FanoutError::Config(_) => exit_codes::USER_ERROR,
            FanoutError::JobsFailed { .. } => exit_codes::JOB_FAILURE,
        }
    }
}

/// Result type alias for fanout operations.
pub type Result<T> = std::result::Result<T, FanoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_error_has_correct_exit_code() {
        let err = FanoutError::Pattern(PatternError::Unterminated { position: 0 });
        assert_eq!(err.exit_code(), exit_codes::PATTERN_ERROR);
    }

    #[test]
    fn config_error_has_correct_exit_code() {
        let err = FanoutError::Config("worker count must be at least 1".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn jobs_failed_has_correct_exit_code() {
        let err = FanoutError::JobsFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(err.exit_code(), exit_codes::JOB_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = FanoutError::JobsFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(err.to_string(), "2 of 5 job(s) failed");

        let err = FanoutError::Pattern(PatternError::UnbalancedClose { position: 3 });
        assert_eq!(err.to_string(), "invalid command pattern: unbalanced '}' at byte 3");
    }

    #[test]
    fn pattern_error_converts_via_from() {
        fn parse() -> Result<()> {
            crate::pattern::Template::validate("{oops")?;
            Ok(())
        }
        let err = parse().unwrap_err();
        assert!(matches!(err, FanoutError::Pattern(_)));
    }
}
