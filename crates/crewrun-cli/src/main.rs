//! crewrun - concurrent agent orchestrator
//!
//! Executes a configured list of independent agents (no-op or shell command)
//! under a bounded worker pool with per-agent timeout and retry policy.
//!
//! ## Commands
//!
//! - `run`: execute every agent in a configuration file
//! - `validate`: load and validate a configuration without running it

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use crewrun_core::{init_tracing, AgentResult, EventSink, TracingSink};
use crewrun_engine::{CrewRunner, ShutdownHandle};

mod config;
use config::RunConfig;

#[derive(Parser)]
#[command(name = "crewrun")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent agent orchestrator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute every agent in a configuration file
    Run {
        /// Path to the run configuration (.json, .yaml or .yml)
        config: PathBuf,

        /// Override the configured worker bound
        #[arg(long)]
        max_workers: Option<usize>,

        /// Write the ordered result list as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load and validate a configuration without running it
    Validate {
        /// Path to the run configuration
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            config,
            max_workers,
            output,
        } => cmd_run(&config, max_workers, output.as_deref()).await,
        Commands::Validate { config } => cmd_validate(&config),
    }
}

/// Execute every agent in a configuration file
async fn cmd_run(
    path: &Path,
    max_workers_override: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let mut config =
        RunConfig::load(path).with_context(|| format!("failed to load config: {:?}", path))?;

    if let Some(n) = max_workers_override {
        config.max_workers = n;
        config
            .validate()
            .context("invalid --max-workers override")?;
    }

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let runner = CrewRunner::new(config.max_workers, sink);

    // Interrupt signals request shutdown; in-flight attempts still finish.
    spawn_signal_listener(runner.shutdown_handle());

    let results = runner
        .run(config.agents)
        .await
        .context("engine failure")?;

    print_summary(&results);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&results)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write results to {:?}", path))?;
        info!(path = %path.display(), "results written");
    }

    let failed = results.iter().filter(|r| !r.succeeded()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} agents did not succeed", failed, results.len());
    }
    Ok(())
}

/// Load and validate a configuration without running it
fn cmd_validate(path: &Path) -> Result<()> {
    let config =
        RunConfig::load(path).with_context(|| format!("failed to load config: {:?}", path))?;

    println!(
        "Configuration OK: {} agents, maxWorkers={}",
        config.agents.len(),
        config.max_workers
    );
    for agent in &config.agents {
        println!("  {} ({})", agent.name, agent.kind.name());
    }

    Ok(())
}

/// Print a per-agent summary and overall counts.
fn print_summary(results: &[AgentResult]) {
    for result in results {
        let status = if result.succeeded() { "✓" } else { "✗" };
        let duration = result
            .duration_seconds
            .map(|s| format!("{:.2}s", s))
            .unwrap_or_else(|| "-".to_string());

        match &result.error {
            Some(error) => println!(
                "  {} {} ({} attempts, {}): {}",
                status, result.name, result.attempts, duration, error
            ),
            None => println!(
                "  {} {} ({} attempts, {})",
                status, result.name, result.attempts, duration
            ),
        }
    }

    let ok = results.iter().filter(|r| r.succeeded()).count();
    println!();
    println!("Summary: {}/{} agents succeeded", ok, results.len());
}

/// Forward SIGINT/SIGTERM to the engine as an idempotent shutdown request.
fn spawn_signal_listener(shutdown: ShutdownHandle) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("shutdown requested, letting in-flight agents finish");
        shutdown.request_shutdown();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("create config");
        file.write_all(content.as_bytes()).expect("write config");
        path
    }

    #[test]
    fn test_cmd_validate_accepts_good_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            "run.json",
            r#"{"maxWorkers": 2, "agents": [{"name": "a", "kind": "no_op"}]}"#,
        );

        assert!(cmd_validate(&path).is_ok());
    }

    #[test]
    fn test_cmd_validate_rejects_bad_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            "run.json",
            r#"{"agents": [{"name": "a", "kind": "shell"}]}"#,
        );

        assert!(cmd_validate(&path).is_err());
    }

    #[tokio::test]
    async fn test_cmd_run_writes_results_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = write_config(
            &dir,
            "run.json",
            r#"{"maxWorkers": 2, "agents": [
                {"name": "a", "kind": "no_op"},
                {"name": "b", "kind": "no_op"}
            ]}"#,
        );
        let output = dir.path().join("results.json");

        cmd_run(&config, None, Some(output.as_path()))
            .await
            .expect("run should succeed");

        let written = std::fs::read_to_string(&output).expect("results file");
        let results: Vec<AgentResult> = serde_json::from_str(&written).expect("valid JSON");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "a");
        assert_eq!(results[1].name, "b");
    }

    #[tokio::test]
    async fn test_cmd_run_fails_when_an_agent_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = write_config(
            &dir,
            "run.json",
            r#"{"agents": [{"name": "broken", "kind": "shell", "command": "exit 1"}]}"#,
        );

        let err = cmd_run(&config, None, None).await.unwrap_err();
        assert!(err.to_string().contains("did not succeed"));
    }

    #[tokio::test]
    async fn test_cmd_run_rejects_zero_worker_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = write_config(&dir, "run.json", r#"{"agents": []}"#);

        assert!(cmd_run(&config, Some(0), None).await.is_err());
    }
}
