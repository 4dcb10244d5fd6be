//! Terminal per-agent results.

use serde::{Deserialize, Serialize};

/// Terminal status of an agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// The agent completed successfully within its attempt budget.
    Ok,

    /// Every allowed attempt failed.
    Failed,

    /// Shutdown was requested before the agent's next attempt began.
    Cancelled,
}

/// Final result for one agent.
///
/// Exactly one is produced per submitted
/// [`AgentSpec`](crate::spec::AgentSpec), immutable once created. The serde
/// field names (`name`, `status`, `attempts`, `durationSeconds`, `error`)
/// are the machine-consumption schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentResult {
    /// Copied from the spec.
    pub name: String,

    /// Terminal classification.
    pub status: AgentStatus,

    /// Attempts actually executed (0 only when cancelled before the first).
    pub attempts: u32,

    /// Wall time of the last attempt in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    /// Error message, present iff status is not Ok.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResult {
    /// A successful terminal result.
    pub fn ok(name: impl Into<String>, attempts: u32, duration_seconds: f64) -> Self {
        Self {
            name: name.into(),
            status: AgentStatus::Ok,
            attempts,
            duration_seconds: Some(duration_seconds),
            error: None,
        }
    }

    /// A terminal failure after the attempt budget was exhausted.
    pub fn failed(
        name: impl Into<String>,
        attempts: u32,
        duration_seconds: f64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: AgentStatus::Failed,
            attempts,
            duration_seconds: Some(duration_seconds),
            error: Some(error.into()),
        }
    }

    /// A cancellation observed before the agent's next attempt began.
    pub fn cancelled(name: impl Into<String>, attempts: u32) -> Self {
        Self {
            name: name.into(),
            status: AgentStatus::Cancelled,
            attempts,
            duration_seconds: None,
            error: Some("cancelled".to_string()),
        }
    }

    /// Whether this agent terminated Ok.
    pub fn succeeded(&self) -> bool {
        self.status == AgentStatus::Ok
    }
}
