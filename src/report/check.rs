//! Checks and their severity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Health classification of a check or table cell.
///
/// Ordered from least to most severe, so `max` picks the worst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Unknown,
    Ok,
    Warning,
    Critical,
}

impl Severity {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Unknown => "??",
            Severity::Ok => "OK",
            Severity::Warning => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The kinds of checks an audit pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    ContainerCpu,
    NodeCpu,
    RedisAvailability,
}

impl CheckId {
    pub const ALL: [CheckId; 3] = [
        CheckId::ContainerCpu,
        CheckId::NodeCpu,
        CheckId::RedisAvailability,
    ];

    /// Key of the check in configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            CheckId::ContainerCpu => "container_cpu",
            CheckId::NodeCpu => "node_cpu",
            CheckId::RedisAvailability => "redis_availability",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            CheckId::ContainerCpu => "Container CPU",
            CheckId::NodeCpu => "Node CPU",
            CheckId::RedisAvailability => "Redis availability",
        }
    }

    /// Message reported when `count` entities violate the check.
    pub fn violation_message(&self, count: usize) -> String {
        match self {
            CheckId::ContainerCpu => format!(
                "high CPU usage of {}",
                plural(count, "container", "containers")
            ),
            CheckId::NodeCpu => format!(
                "high CPU utilization of {}",
                plural(count, "node", "nodes")
            ),
            CheckId::RedisAvailability => format!(
                "{} down",
                plural(count, "Redis instance", "Redis instances")
            ),
        }
    }
}

/// Formats `count` followed by the singular or plural noun.
pub fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// A health verdict for one check in one audit pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    pub id: CheckId,
    pub title: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Check {
    /// A passing check.
    pub fn new(id: CheckId) -> Self {
        Self {
            id,
            title: id.title(),
            severity: Severity::Ok,
            message: String::new(),
        }
    }

    /// Raise the check to `severity`. A lower severity than the current one
    /// is ignored.
    pub fn set_status(&mut self, severity: Severity, message: impl Into<String>) -> &mut Self {
        if severity >= self.severity {
            self.severity = severity;
            self.message = message.into();
        }
        self
    }
}
