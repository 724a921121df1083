use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{MonitorError, Result};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitorConfig {
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_stop_grace")]
    pub stop_grace_ms: u64,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default = "default_seed_demo_targets")]
    pub seed_demo_targets: bool,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TargetConfig {
    pub url: String,
    pub name: Option<String>,
}

fn default_check_interval() -> u64 { 30 }
fn default_probe_timeout() -> u64 { 10_000 }
fn default_stop_grace() -> u64 { 5_000 }
fn default_api_port() -> u16 { 8080 }
fn default_max_concurrency() -> usize { 1 }
fn default_user_agent() -> String { "API-Monitor/1.0".into() }
fn default_seed_demo_targets() -> bool { true }

pub fn demo_targets() -> Vec<TargetConfig> {
    [
        ("https://httpbin.org/status/200", "HTTPBin OK"),
        ("https://httpbin.org/status/404", "HTTPBin 404"),
        ("https://jsonplaceholder.typicode.com/posts/1", "JSONPlaceholder"),
    ]
    .into_iter()
    .map(|(url, name)| TargetConfig {
        url: url.into(),
        name: Some(name.into()),
    })
    .collect()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            probe_timeout_ms: default_probe_timeout(),
            stop_grace_ms: default_stop_grace(),
            api_port: default_api_port(),
            max_concurrency: default_max_concurrency(),
            user_agent: default_user_agent(),
            auto_start: false,
            seed_demo_targets: default_seed_demo_targets(),
            targets: Vec::new(),
        }
    }
}

impl MonitorConfig {
    /// Reads a JSON config file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: MonitorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.check_interval == 0 {
            return Err(MonitorError::Config("check_interval must be greater than 0".into()));
        }
        if self.probe_timeout_ms == 0 {
            return Err(MonitorError::Config("probe_timeout_ms must be greater than 0".into()));
        }
        if self.max_concurrency == 0 {
            return Err(MonitorError::Config("max_concurrency must be greater than 0".into()));
        }
        Ok(())
    }

    /// Targets to register at startup: configured ones, else the demo set when enabled.
    pub fn initial_targets(&self) -> Vec<TargetConfig> {
        if self.targets.is_empty() && self.seed_demo_targets {
            demo_targets()
        } else {
            self.targets.clone()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(30));
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert_eq!(config.stop_grace(), Duration::from_secs(5));
        assert_eq!(config.max_concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: MonitorConfig = serde_json::from_str(
            r#"{"check_interval": 5, "targets": [{"url": "http://localhost:9000/health"}]}"#,
        )
        .unwrap();
        assert_eq!(config.check_interval, 5);
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.user_agent, "API-Monitor/1.0");
        assert_eq!(config.initial_targets().len(), 1);
        assert!(config.initial_targets()[0].name.is_none());
    }

    #[test]
    fn test_demo_targets_seeded_when_none_configured() {
        let config = MonitorConfig::default();
        let targets = config.initial_targets();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].name.as_deref(), Some("HTTPBin OK"));

        let config = MonitorConfig {
            seed_demo_targets: false,
            ..MonitorConfig::default()
        };
        assert!(config.initial_targets().is_empty());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = MonitorConfig {
            check_interval: 0,
            ..MonitorConfig::default()
        };
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));

        let config = MonitorConfig {
            max_concurrency: 0,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = MonitorConfig::load("definitely/not/here.json").unwrap();
        assert_eq!(config.check_interval, 30);
    }
}
