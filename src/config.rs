//! Harness timing configuration
//!
//! External latency varies between environments, so every wait bound is
//! tunable rather than hard-coded, as is whether an initial
//! loading-indicator wait precedes form interaction. Defaults are generous:
//! 10 s waits for course population and save completion.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HarnessResult;

/// Per-wait timeouts and polling cadence for a workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Interval between condition probes inside a single wait
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Bound on the initial wait for the form to become interactive
    #[serde(default = "default_load_timeout")]
    pub load_timeout_ms: u64,

    /// Bound on the wait for course options to populate
    #[serde(default = "default_course_timeout")]
    pub course_timeout_ms: u64,

    /// Bound on the wait for the save completion indicator
    #[serde(default = "default_save_timeout")]
    pub save_timeout_ms: u64,

    /// Bound on the wait for the registrant list entry to render
    #[serde(default = "default_verify_timeout")]
    pub verify_timeout_ms: u64,

    /// Whether `initialize` waits for the loading indicator to disappear
    /// before treating the form as interactive
    #[serde(default = "default_wait_for_loading_indicator")]
    pub wait_for_loading_indicator: bool,
}

fn default_poll_interval() -> u64 {
    100
}

fn default_load_timeout() -> u64 {
    3_000
}

fn default_course_timeout() -> u64 {
    10_000
}

fn default_save_timeout() -> u64 {
    10_000
}

fn default_verify_timeout() -> u64 {
    5_000
}

fn default_wait_for_loading_indicator() -> bool {
    true
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            load_timeout_ms: default_load_timeout(),
            course_timeout_ms: default_course_timeout(),
            save_timeout_ms: default_save_timeout(),
            verify_timeout_ms: default_verify_timeout(),
            wait_for_loading_indicator: default_wait_for_loading_indicator(),
        }
    }
}

impl HarnessConfig {
    /// Parse a config from a YAML string
    pub fn from_yaml(yaml: &str) -> HarnessResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a config from a YAML file
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn course_timeout(&self) -> Duration {
        Duration::from_millis(self.course_timeout_ms)
    }

    pub fn save_timeout(&self) -> Duration {
        Duration::from_millis(self.save_timeout_ms)
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_millis(self.verify_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.course_timeout_ms, 10_000);
        assert!(config.wait_for_loading_indicator);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
course_timeout_ms: 2500
wait_for_loading_indicator: false
"#;
        let config = HarnessConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.course_timeout_ms, 2_500);
        assert!(!config.wait_for_loading_indicator);
        // Unspecified fields keep their defaults
        assert_eq!(config.save_timeout_ms, 10_000);
        assert_eq!(config.poll_interval_ms, 100);
    }

    #[test]
    fn test_duration_accessors() {
        let config = HarnessConfig {
            poll_interval_ms: 50,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.load_timeout(), Duration::from_secs(3));
    }
}
