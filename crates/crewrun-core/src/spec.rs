//! Agent specifications.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// The kind of work an agent performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Completes immediately without doing anything.
    NoOp,

    /// Runs an external command through `sh -c`.
    Shell,
}

impl AgentKind {
    /// Get the kind name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::NoOp => "no_op",
            AgentKind::Shell => "shell",
        }
    }
}

/// Specification of one unit of work.
///
/// Constructed once from configuration and never mutated afterwards.
/// Shell-kind specs must carry a non-empty `command`; [`AgentSpec::validate`]
/// enforces this at load time so the engine can assume specs are well formed
/// on entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSpec {
    /// Agent name, unique within a run (assumed by result consumers,
    /// not enforced here).
    pub name: String,

    /// What this agent does.
    pub kind: AgentKind,

    /// Command line for Shell agents; ignored for NoOp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Per-attempt timeout in seconds; absent means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<f64>,

    /// Additional attempts allowed after a failure (0 = single attempt).
    #[serde(default)]
    pub max_retries: u32,
}

impl AgentSpec {
    /// Create a no-op agent.
    pub fn no_op(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AgentKind::NoOp,
            command: None,
            timeout_seconds: None,
            max_retries: 0,
        }
    }

    /// Create a shell agent.
    pub fn shell(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AgentKind::Shell,
            command: Some(command.into()),
            timeout_seconds: None,
            max_retries: 0,
        }
    }

    /// Set the per-attempt timeout in seconds.
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Set the retry budget (attempts allowed = retries + 1).
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Resolved per-attempt timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs_f64)
    }

    /// Check the load-time invariants.
    ///
    /// The engine assumes every spec it receives has passed this check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if self.kind == AgentKind::Shell {
            let has_command = self
                .command
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty());
            if !has_command {
                return Err(ConfigError::MissingCommand {
                    name: self.name.clone(),
                });
            }
        }

        if let Some(value) = self.timeout_seconds {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTimeout {
                    name: self.name.clone(),
                    value,
                });
            }
        }

        Ok(())
    }
}
