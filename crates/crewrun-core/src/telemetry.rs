//! Centralised tracing initialisation and the tracing-backed event sink.
//!
//! Call [`init_tracing`] once at program start to configure the global
//! subscriber with an `EnvFilter` and optional JSON formatting.
//!
//! Safe to call more than once — subsequent calls are silently ignored
//! (the global subscriber can only be set once per process).

use async_trait::async_trait;
use tracing::{info, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::events::{EventSink, RunEvent};

/// Initialise the global tracing subscriber.
///
/// * `json` — when `true`, emit newline-delimited JSON log lines.
/// * `level` — default verbosity when `RUST_LOG` is not set.
///
/// Respects the `RUST_LOG` environment variable for fine-grained filtering.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}

/// Event sink that renders lifecycle events as structured log lines.
///
/// This is the production sink: the engine publishes, the subscriber decides
/// destination and format.
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn publish(&self, event: RunEvent) {
        match event {
            RunEvent::AgentStarted(e) => {
                info!(event = "agent.started", agent = %e.name, kind = e.kind.name());
            }
            RunEvent::AttemptFinished(e) => {
                info!(
                    event = "agent.attempt_finished",
                    agent = %e.name,
                    attempt = e.attempt,
                    succeeded = e.succeeded,
                    elapsed_seconds = e.elapsed_seconds,
                );
            }
            RunEvent::AgentTerminal(e) => {
                info!(
                    event = "agent.terminal",
                    agent = %e.name,
                    status = ?e.result.status,
                    attempts = e.result.attempts,
                    error = e.result.error.as_deref().unwrap_or(""),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_idempotent() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
    }
}
