//! Auditor configuration.
//!
//! Thresholds are read from an optional TOML file layered with
//! `APPAUDIT_*` environment variables. Nested keys use `__` as separator:
//!
//! ```bash
//! APPAUDIT_TOP_N=10
//! APPAUDIT_CHECKS__CONTAINER_CPU__THRESHOLD=90
//! ```
//!
//! ```toml
//! top_n = 5
//!
//! [checks.node_cpu]
//! threshold = 85
//! severity = "critical"
//! ```

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::report::{CheckId, Severity};

/// Default threshold for CPU checks, in percent.
pub const DEFAULT_CPU_THRESHOLD: f64 = 80.0;

/// Default number of series kept by Top-N charts.
pub const DEFAULT_TOP_N: usize = 5;

/// Threshold and breach severity of one check kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    pub threshold: f64,
    #[serde(default = "default_severity")]
    pub severity: Severity,
}

fn default_severity() -> Severity {
    Severity::Warning
}

impl CheckConfig {
    /// A check breaching at `threshold` with a warning.
    pub const fn new(threshold: f64) -> Self {
        Self {
            threshold,
            severity: Severity::Warning,
        }
    }

    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Per-check configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfigs {
    /// CPU usage of a container relative to its limit, percent.
    pub container_cpu: CheckConfig,
    /// CPU utilization of a node, percent.
    pub node_cpu: CheckConfig,
    /// Last `up` sample at or below which a Redis instance is down.
    pub redis_availability: CheckConfig,
}

impl Default for CheckConfigs {
    fn default() -> Self {
        Self {
            container_cpu: CheckConfig::new(DEFAULT_CPU_THRESHOLD),
            node_cpu: CheckConfig::new(DEFAULT_CPU_THRESHOLD),
            redis_availability: CheckConfig::new(0.0),
        }
    }
}

impl CheckConfigs {
    pub fn get(&self, id: CheckId) -> CheckConfig {
        match id {
            CheckId::ContainerCpu => self.container_cpu,
            CheckId::NodeCpu => self.node_cpu,
            CheckId::RedisAvailability => self.redis_availability,
        }
    }
}

/// Configuration of an audit pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditorConfig {
    pub checks: CheckConfigs,
    /// Number of series kept by Top-N charts before folding into `other`.
    pub top_n: usize,
}

fn environment() -> Environment {
    Environment::with_prefix("APPAUDIT")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            checks: CheckConfigs::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AuditorConfig {
    /// Load configuration from an optional file and the environment.
    ///
    /// Anything not set falls back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, AuditError> {
        Self::load_from(path, environment())
    }

    fn load_from(path: Option<&Path>, env: Environment) -> Result<Self, AuditError> {
        let defaults = CheckConfigs::default();
        let mut builder = Config::builder().set_default("top_n", DEFAULT_TOP_N as i64)?;
        for id in CheckId::ALL {
            let key = format!("checks.{}.threshold", id.key());
            builder = builder.set_default(key, defaults.get(id).threshold)?;
        }
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config: AuditorConfig = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject breach severities that would hide a violation.
    fn validate(&self) -> Result<(), ConfigError> {
        for id in CheckId::ALL {
            let severity = self.check(id).severity;
            if severity < Severity::Warning {
                return Err(ConfigError::Message(format!(
                    "checks.{}.severity must be warning or critical, got {}",
                    id.key(),
                    severity
                )));
            }
        }
        Ok(())
    }

    /// Configuration of a check kind.
    pub fn check(&self, id: CheckId) -> CheckConfig {
        self.checks.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AuditorConfig::default();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.check(CheckId::ContainerCpu).threshold, 80.0);
        assert_eq!(config.check(CheckId::NodeCpu).threshold, 80.0);
        assert_eq!(
            config.check(CheckId::ContainerCpu).severity,
            Severity::Warning
        );
        assert_eq!(config.check(CheckId::RedisAvailability).threshold, 0.0);
    }

    #[test]
    fn test_load_partial_file() {
        let file = toml_file(
            r#"
            [checks.node_cpu]
            threshold = 90
            severity = "critical"
            "#,
        );

        let config = AuditorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.check(CheckId::NodeCpu).threshold, 90.0);
        assert_eq!(config.check(CheckId::NodeCpu).severity, Severity::Critical);
        assert_eq!(config.check(CheckId::ContainerCpu).threshold, 80.0);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = AuditorConfig::load(Some(Path::new("/nonexistent/appaudit.toml")));
        assert!(matches!(result, Err(AuditError::Config(_))));
    }

    #[test]
    fn test_severity_only_keeps_default_threshold() {
        let file = toml_file(
            r#"
            [checks.node_cpu]
            severity = "critical"
            "#,
        );

        let config = AuditorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.check(CheckId::NodeCpu).threshold, 80.0);
        assert_eq!(config.check(CheckId::NodeCpu).severity, Severity::Critical);
        assert_eq!(config.check(CheckId::RedisAvailability).threshold, 0.0);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = toml_file(
            r#"
            top_n = 3

            [checks.container_cpu]
            threshold = 70
            "#,
        );
        let vars: config::Map<String, String> = [
            ("APPAUDIT_TOP_N", "10"),
            ("APPAUDIT_CHECKS__CONTAINER_CPU__THRESHOLD", "90"),
            ("APPAUDIT_CHECKS__NODE_CPU__SEVERITY", "critical"),
            ("OTHER_TOP_N", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config =
            AuditorConfig::load_from(Some(file.path()), environment().source(Some(vars))).unwrap();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.check(CheckId::ContainerCpu).threshold, 90.0);
        assert_eq!(config.check(CheckId::NodeCpu).threshold, 80.0);
        assert_eq!(config.check(CheckId::NodeCpu).severity, Severity::Critical);
    }

    #[test]
    fn test_non_breach_severity_is_rejected() {
        for severity in ["ok", "unknown"] {
            let file = toml_file(&format!(
                "[checks.container_cpu]\nthreshold = 70\nseverity = \"{severity}\"\n"
            ));
            let err = AuditorConfig::load(Some(file.path())).unwrap_err();
            assert!(err.to_string().contains("checks.container_cpu.severity"));
        }
    }

    #[test]
    fn test_invalid_severity_fails() {
        let file = toml_file(
            r#"
            [checks.container_cpu]
            threshold = 70
            severity = "panic"
            "#,
        );
        assert!(AuditorConfig::load(Some(file.path())).is_err());
    }
}
