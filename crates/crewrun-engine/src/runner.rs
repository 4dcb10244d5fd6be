//! Concurrent agent orchestration.
//!
//! One tokio task per agent, bounded by a semaphore of `max_workers`
//! permits. A worker holds its permit for the agent's full terminal
//! lifetime, retries included, so at most `max_workers` agents ever have an
//! attempt in flight.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crewrun_core::{AgentResult, AgentSpec, EngineError, EventSink};

use crate::policy::RetryPolicy;

/// Idempotent handle for requesting graceful shutdown.
///
/// Cloneable and safe to trigger from outside the worker pool (e.g. an
/// interrupt-signal handler); repeated calls have the same effect as one.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    token: CancellationToken,
}

impl ShutdownHandle {
    /// Ask the runner to stop starting new attempts. Agents already
    /// mid-attempt finish naturally; agents not yet started terminate
    /// Cancelled.
    pub fn request_shutdown(&self) {
        self.token.cancel();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Runs a batch of agents under a bounded worker pool.
pub struct CrewRunner {
    max_workers: usize,
    policy: RetryPolicy,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
}

impl CrewRunner {
    /// Create a runner with `max_workers` parallel workers.
    ///
    /// `max_workers` must be at least 1; configuration validation enforces
    /// this before a runner is constructed.
    pub fn new(max_workers: usize, sink: Arc<dyn EventSink>) -> Self {
        Self {
            max_workers,
            policy: RetryPolicy::default(),
            sink,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the default retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Handle for requesting graceful shutdown from outside the pool.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            token: self.cancel.clone(),
        }
    }

    /// Execute every spec and return one result per spec, in submission
    /// order regardless of completion order.
    ///
    /// No agent's failure affects any other agent. The only fatal condition
    /// is an internal defect (a panicked worker task); even under shutdown
    /// every submitted agent yields exactly one result.
    pub async fn run(&self, specs: Vec<AgentSpec>) -> Result<Vec<AgentResult>, EngineError> {
        let total = specs.len();
        info!(
            agents = total,
            max_workers = self.max_workers,
            "starting run"
        );

        let sem = Arc::new(Semaphore::new(self.max_workers));
        let mut workers = Vec::with_capacity(total);

        for spec in specs {
            let sem = Arc::clone(&sem);
            let sink = Arc::clone(&self.sink);
            let cancel = self.cancel.clone();
            let policy = self.policy.clone();
            let name = spec.name.clone();

            let task = tokio::spawn(async move {
                // Queue until a worker slot frees up. acquire_owned only
                // fails when the semaphore is closed, which never happens
                // here.
                let _permit = sem.acquire_owned().await.ok();
                policy.execute(&spec, &cancel, &sink).await
            });

            workers.push((name, task));
        }

        // One slot per submission index, written exactly once as each worker
        // is joined. Joining in submission order preserves input ordering
        // without any shared results collection.
        let mut results = Vec::with_capacity(total);
        for (name, task) in workers {
            match task.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(agent = %name, error = %e, "worker task failed");
                    return Err(EngineError::WorkerPanicked {
                        name,
                        detail: e.to_string(),
                    });
                }
            }
        }

        let ok = results.iter().filter(|r| r.succeeded()).count();
        info!(agents = total, ok = ok, failed = total - ok, "run complete");

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewrun_core::fakes::MemorySink;
    use crewrun_core::{AgentStatus, NullSink};

    #[tokio::test]
    async fn test_empty_input_yields_empty_results() {
        let runner = CrewRunner::new(2, Arc::new(NullSink));
        let results = runner.run(Vec::new()).await.expect("run failed");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_results_match_input_order() {
        let runner = CrewRunner::new(4, Arc::new(NullSink));
        let specs = vec![
            AgentSpec::shell("slowest", "sleep 0.3"),
            AgentSpec::shell("middle", "sleep 0.1"),
            AgentSpec::no_op("fastest"),
        ];

        let results = runner.run(specs).await.expect("run failed");

        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["slowest", "middle", "fastest"]);
        assert!(results.iter().all(|r| r.status == AgentStatus::Ok));
    }

    #[tokio::test]
    async fn test_failure_isolated_per_agent() {
        let sink = Arc::new(MemorySink::new());
        let runner = CrewRunner::new(2, sink);
        let specs = vec![
            AgentSpec::no_op("before"),
            AgentSpec::shell("broken", "exit 1"),
            AgentSpec::no_op("after"),
        ];

        let results = runner.run(specs).await.expect("run failed");

        assert_eq!(results[0].status, AgentStatus::Ok);
        assert_eq!(results[1].status, AgentStatus::Failed);
        assert_eq!(results[2].status, AgentStatus::Ok);
    }

    #[tokio::test]
    async fn test_shutdown_handle_is_idempotent() {
        let runner = CrewRunner::new(1, Arc::new(NullSink));
        let handle = runner.shutdown_handle();

        assert!(!handle.is_shutdown_requested());
        handle.request_shutdown();
        handle.request_shutdown();
        assert!(handle.is_shutdown_requested());
    }
}
