//! Retry, backoff and cancellation policy.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crewrun_core::{
    AgentResult, AgentSpec, AgentStartedEvent, AgentTerminalEvent, AttemptFinishedEvent,
    EventSink, RunEvent,
};

use crate::executor::AgentExecutor;

/// Default base delay between retry attempts.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(250);

/// Drives one agent to its terminal state: repeated attempts bounded by
/// `maxRetries`, linear backoff between failures, cancellation honoured at
/// attempt boundaries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Base backoff; the delay after failed attempt `n` is `backoff_base * n`.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl RetryPolicy {
    pub fn new(backoff_base: Duration) -> Self {
        Self { backoff_base }
    }

    /// Run `spec` to a terminal state, publishing lifecycle events.
    ///
    /// Cancellation is advisory: checked before each attempt, never
    /// mid-attempt. An attempt already running finishes on its own terms
    /// (or through its own timeout). With `maxRetries = 0` exactly one
    /// attempt runs and no backoff sleep is ever applied.
    pub async fn execute(
        &self,
        spec: &AgentSpec,
        cancel: &CancellationToken,
        sink: &Arc<dyn EventSink>,
    ) -> AgentResult {
        let allowed = spec.max_retries.saturating_add(1);
        let timeout = spec.timeout();

        let mut attempt = 0u32;
        let result = loop {
            if cancel.is_cancelled() {
                break AgentResult::cancelled(spec.name.as_str(), attempt);
            }

            if attempt == 0 {
                sink.publish(RunEvent::AgentStarted(AgentStartedEvent::new(
                    spec.name.as_str(),
                    spec.kind,
                )))
                .await;
            }

            attempt += 1;
            let outcome = AgentExecutor::execute_attempt(spec, timeout).await;
            sink.publish(RunEvent::AttemptFinished(AttemptFinishedEvent::new(
                spec.name.as_str(),
                attempt,
                outcome.succeeded(),
                outcome.elapsed_seconds,
            )))
            .await;

            match outcome.error {
                None => {
                    break AgentResult::ok(spec.name.as_str(), attempt, outcome.elapsed_seconds)
                }
                Some(error) if attempt >= allowed => {
                    break AgentResult::failed(
                        spec.name.as_str(),
                        attempt,
                        outcome.elapsed_seconds,
                        error.to_string(),
                    );
                }
                Some(error) => {
                    debug!(agent = %spec.name, attempt = attempt, error = %error, "attempt failed, backing off");
                    // Wake early on shutdown; the loop head re-checks the
                    // token and terminates as Cancelled.
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = tokio::time::sleep(self.backoff_base * attempt) => {}
                    }
                }
            }
        };

        sink.publish(RunEvent::AgentTerminal(AgentTerminalEvent::new(
            result.clone(),
        )))
        .await;

        result
    }
}
