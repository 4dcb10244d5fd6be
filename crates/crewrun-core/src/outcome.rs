//! Per-attempt execution outcomes.

use thiserror::Error;

/// Why a single attempt failed.
///
/// Every variant renders a distinguishable message; the terminal
/// [`AgentResult`](crate::result::AgentResult) carries the last attempt's
/// message verbatim.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AttemptError {
    /// The command could not be started at all (e.g. shell unavailable).
    #[error("launch failure: {0}")]
    Launch(String),

    /// The command ran to completion but reported failure.
    #[error("exit code {0}")]
    NonZeroExit(i32),

    /// The attempt exceeded its configured timeout and was killed.
    #[error("timed out after {0}s")]
    TimedOut(f64),
}

/// Result of exactly one execution attempt.
///
/// Transient: produced and consumed within a single retry iteration.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    /// Failure classification; `None` when the attempt succeeded.
    pub error: Option<AttemptError>,

    /// Wall-clock duration of the attempt in seconds.
    pub elapsed_seconds: f64,
}

impl AttemptOutcome {
    /// A successful attempt.
    pub fn success(elapsed_seconds: f64) -> Self {
        Self {
            error: None,
            elapsed_seconds,
        }
    }

    /// A failed attempt.
    pub fn failure(error: AttemptError, elapsed_seconds: f64) -> Self {
        Self {
            error: Some(error),
            elapsed_seconds,
        }
    }

    /// Whether the attempt succeeded.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_error() {
        let outcome = AttemptOutcome::success(0.25);
        assert!(outcome.succeeded());
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_failure_carries_classification() {
        let outcome = AttemptOutcome::failure(AttemptError::NonZeroExit(2), 0.5);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.error, Some(AttemptError::NonZeroExit(2)));
    }

    #[test]
    fn test_error_messages_distinguishable() {
        let launch = AttemptError::Launch("no such shell".to_string()).to_string();
        let exit = AttemptError::NonZeroExit(1).to_string();
        let timeout = AttemptError::TimedOut(5.0).to_string();

        assert!(launch.contains("launch failure"));
        assert!(exit.contains("exit code 1"));
        assert!(timeout.contains("timed out after 5s"));
        assert_ne!(launch, exit);
        assert_ne!(exit, timeout);
    }
}
