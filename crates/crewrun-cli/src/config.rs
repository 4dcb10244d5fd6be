//! Run configuration loading and validation.
//!
//! Everything the engine assumes about its input is checked here, before a
//! runner is constructed: worker bound, Shell commands, timeout values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crewrun_core::{AgentSpec, ConfigError};

fn default_max_workers() -> usize {
    4
}

/// A complete run configuration: worker bound plus the ordered agent list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Upper bound on concurrently running agents.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Agents in submission order.
    pub agents: Vec<AgentSpec>,
}

impl RunConfig {
    /// Load a configuration from a JSON or YAML file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        let config: RunConfig = match ext {
            "json" => {
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check every load-time invariant the engine assumes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        for agent in &self.agents {
            agent.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("create config");
        file.write_all(content.as_bytes()).expect("write config");
        path
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            "run.json",
            r#"{
                "maxWorkers": 2,
                "agents": [
                    {"name": "a", "kind": "no_op"},
                    {"name": "b", "kind": "shell", "command": "true", "maxRetries": 1}
                ]
            }"#,
        );

        let config = RunConfig::load(&path).expect("should load");
        assert_eq!(config.max_workers, 2);
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[1].max_retries, 1);
    }

    #[test]
    fn test_load_yaml_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            "run.yaml",
            "maxWorkers: 3\nagents:\n  - name: fetch\n    kind: shell\n    command: \"echo hi\"\n    timeoutSeconds: 5.0\n",
        );

        let config = RunConfig::load(&path).expect("should load");
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.agents[0].timeout_seconds, Some(5.0));
    }

    #[test]
    fn test_max_workers_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "run.json", r#"{"agents": []}"#);

        let config = RunConfig::load(&path).expect("should load");
        assert_eq!(config.max_workers, 4);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "run.json", r#"{"maxWorkers": 0, "agents": []}"#);

        assert!(matches!(
            RunConfig::load(&path),
            Err(ConfigError::NoWorkers)
        ));
    }

    #[test]
    fn test_invalid_spec_rejected_at_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            "run.json",
            r#"{"agents": [{"name": "broken", "kind": "shell"}]}"#,
        );

        assert!(matches!(
            RunConfig::load(&path),
            Err(ConfigError::MissingCommand { .. })
        ));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "run.toml", "agents = []");

        assert!(matches!(
            RunConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "run.json", "{not json");

        assert!(matches!(RunConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
