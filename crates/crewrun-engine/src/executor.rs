//! Single-attempt agent execution.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};

use crewrun_core::{AgentKind, AgentSpec, AttemptError, AttemptOutcome};

/// Executes exactly one attempt at running an agent.
///
/// Retry and backoff live in [`RetryPolicy`](crate::policy::RetryPolicy);
/// this type only performs a single attempt and classifies its failure.
pub struct AgentExecutor;

impl AgentExecutor {
    /// Run one attempt with the already-resolved timeout.
    ///
    /// A Shell agent that outlives `timeout` has its whole process group
    /// killed before this returns; no child survives the call.
    pub async fn execute_attempt(spec: &AgentSpec, timeout: Option<Duration>) -> AttemptOutcome {
        let start = Instant::now();

        match spec.kind {
            AgentKind::NoOp => AttemptOutcome::success(start.elapsed().as_secs_f64()),
            AgentKind::Shell => {
                // Validated at load time; an empty command here is a caller
                // bug and surfaces as a launch failure, not a panic.
                let command = spec.command.as_deref().unwrap_or_default();
                run_shell(command, timeout, start).await
            }
        }
    }
}

async fn run_shell(command: &str, timeout: Option<Duration>, start: Instant) -> AttemptOutcome {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    // Own process group so a timeout can kill the command and all of its
    // descendants with one signal.
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            return AttemptOutcome::failure(
                AttemptError::Launch(e.to_string()),
                start.elapsed().as_secs_f64(),
            );
        }
    };

    let waited = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(waited) => waited,
            Err(_) => {
                terminate(&mut child).await;
                return AttemptOutcome::failure(
                    AttemptError::TimedOut(limit.as_secs_f64()),
                    start.elapsed().as_secs_f64(),
                );
            }
        },
        None => child.wait().await,
    };

    let elapsed = start.elapsed().as_secs_f64();
    match waited {
        Ok(status) if status.success() => AttemptOutcome::success(elapsed),
        Ok(status) => AttemptOutcome::failure(
            AttemptError::NonZeroExit(status.code().unwrap_or(-1)),
            elapsed,
        ),
        Err(e) => AttemptOutcome::failure(AttemptError::Launch(e.to_string()), elapsed),
    }
}

/// Kill the child's process group and reap it.
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // The child is its own group leader (process_group(0) at spawn),
        // so its pid doubles as the pgid.
        unsafe {
            libc::killpg(pid as libc::pid_t, libc::SIGKILL);
        }
    }

    let _ = child.kill().await;
    let _ = child.wait().await;
}
