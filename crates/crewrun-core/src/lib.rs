//! crewrun core - data model and lifecycle events for the orchestrator
//!
//! Provides the shared vocabulary of the engine and its collaborators:
//! - Agent specifications ([`AgentSpec`]) validated at config-load time
//! - Per-attempt outcomes and the failure taxonomy ([`AttemptOutcome`])
//! - Final per-agent results ([`AgentResult`])
//! - The observable lifecycle event stream ([`RunEvent`] / [`EventSink`])

pub mod error;
pub mod events;
pub mod fakes;
pub mod outcome;
pub mod result;
pub mod spec;
pub mod telemetry;

// Re-export key types
pub use error::{ConfigError, EngineError};
pub use events::{
    AgentStartedEvent, AgentTerminalEvent, AttemptFinishedEvent, EventId, EventSink, NullSink,
    RunEvent,
};
pub use outcome::{AttemptError, AttemptOutcome};
pub use result::{AgentResult, AgentStatus};
pub use spec::{AgentKind, AgentSpec};
pub use telemetry::{init_tracing, TracingSink};
