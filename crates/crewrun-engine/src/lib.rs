//! crewrun engine - concurrent execution of agent specifications
//!
//! Turns an ordered list of [`AgentSpec`](crewrun_core::AgentSpec)s into a
//! concurrently run, retried, timed-out, cancellable set of tasks:
//! - [`AgentExecutor`] performs exactly one attempt
//! - [`RetryPolicy`] wraps attempts with timeout, retry and backoff
//! - [`CrewRunner`] owns the worker pool, result ordering and shutdown

pub mod executor;
pub mod policy;
pub mod runner;

// Re-export key types
pub use executor::AgentExecutor;
pub use policy::{RetryPolicy, DEFAULT_BACKOFF_BASE};
pub use runner::{CrewRunner, ShutdownHandle};
