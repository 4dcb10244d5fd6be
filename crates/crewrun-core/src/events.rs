//! Agent lifecycle events.
//!
//! The engine exposes its progress as an ordered notification stream; the
//! logging/reporting collaborator decides how to render it. Within one agent
//! the order is always started, zero or more attempt-finished, terminal.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result::AgentResult;
use crate::spec::AgentKind;

/// A unique event ID (UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        EventId(Uuid::new_v4())
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle events emitted while a run executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RunEvent {
    /// An agent's first attempt is about to begin.
    AgentStarted(AgentStartedEvent),

    /// One execution attempt finished, successfully or not.
    AttemptFinished(AttemptFinishedEvent),

    /// The agent reached its terminal state.
    AgentTerminal(AgentTerminalEvent),
}

impl RunEvent {
    /// Name of the agent this event belongs to.
    pub fn agent_name(&self) -> &str {
        match self {
            RunEvent::AgentStarted(e) => &e.name,
            RunEvent::AttemptFinished(e) => &e.name,
            RunEvent::AgentTerminal(e) => &e.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStartedEvent {
    pub event_id: EventId,
    pub name: String,
    pub kind: AgentKind,
    pub timestamp: DateTime<Utc>,
}

impl AgentStartedEvent {
    pub fn new(name: impl Into<String>, kind: AgentKind) -> Self {
        Self {
            event_id: EventId::new(),
            name: name.into(),
            kind,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptFinishedEvent {
    pub event_id: EventId,
    pub name: String,
    /// 1-based attempt number.
    pub attempt: u32,
    pub succeeded: bool,
    pub elapsed_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

impl AttemptFinishedEvent {
    pub fn new(
        name: impl Into<String>,
        attempt: u32,
        succeeded: bool,
        elapsed_seconds: f64,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            name: name.into(),
            attempt,
            succeeded,
            elapsed_seconds,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTerminalEvent {
    pub event_id: EventId,
    pub name: String,
    pub result: AgentResult,
    pub timestamp: DateTime<Utc>,
}

impl AgentTerminalEvent {
    pub fn new(result: AgentResult) -> Self {
        Self {
            event_id: EventId::new(),
            name: result.name.clone(),
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Receives lifecycle events from the engine.
///
/// Implementations must be cheap: workers await `publish` inline between
/// attempts. Backend-agnostic; an in-memory fake is provided in
/// [`fakes`](crate::fakes) for tests.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: RunEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn publish(&self, _event: RunEvent) {}
}
