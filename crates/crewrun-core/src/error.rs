//! Error types for the orchestrator.

use thiserror::Error;

/// Configuration errors, detected at load time.
///
/// Surfaced before the engine starts; the engine assumes specs it receives
/// have already passed validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("agent name must not be empty")]
    EmptyName,

    #[error("shell agent '{name}' has no command")]
    MissingCommand { name: String },

    #[error("agent '{name}' has invalid timeoutSeconds: {value}")]
    InvalidTimeout { name: String, value: f64 },

    #[error("maxWorkers must be at least 1")]
    NoWorkers,

    #[error("unsupported config format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Internal engine defects.
///
/// An agent failing is never an `EngineError`: every submitted agent yields
/// exactly one `AgentResult`, even under shutdown. Only a defect in the
/// engine itself (a panicked worker task) is fatal to the whole run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("worker for agent '{name}' panicked: {detail}")]
    WorkerPanicked { name: String, detail: String },
}
