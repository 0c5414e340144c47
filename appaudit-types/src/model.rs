//! The application model consumed by an audit pass.
//!
//! These are snapshots produced by a collection pipeline. Every metric is
//! optional: an entity lacking a series is audited with what it has.

use crate::{NamedSeriesSet, TimeSeries};

/// An application: a set of instances serving the same workload.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Application {
    /// Application name.
    pub name: String,

    /// Instances of the application.
    #[cfg_attr(feature = "serde", serde(default))]
    pub instances: Vec<Instance>,
}

impl Application {
    /// Create an application without instances.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instances: Vec::new(),
        }
    }

    /// Add an instance.
    pub fn instance(mut self, instance: Instance) -> Self {
        self.instances.push(instance);
        self
    }
}

/// A single running instance of an application.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    /// Instance name, unique within the application.
    pub name: String,

    /// Containers of this instance.
    #[cfg_attr(feature = "serde", serde(default))]
    pub containers: Vec<Container>,

    /// The node the instance runs on, if known.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub node: Option<Node>,

    /// Redis metrics, present only for Redis instances.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub redis: Option<RedisInstance>,
}

impl Instance {
    /// Create an instance with no containers, node or protocol metrics.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a container.
    pub fn container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    /// Set the node.
    pub fn node(mut self, node: Node) -> Self {
        self.node = Some(node);
        self
    }

    /// Attach Redis metrics.
    pub fn redis(mut self, redis: RedisInstance) -> Self {
        self.redis = Some(redis);
        self
    }
}

/// CPU metrics of a container.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    /// Container name. The same container of different instances shares a name.
    pub name: String,

    /// CPU usage in cores.
    pub cpu_usage: Option<TimeSeries>,

    /// CPU limit in cores.
    pub cpu_limit: Option<TimeSeries>,

    /// Time spent waiting for a CPU, seconds per second.
    pub cpu_delay: Option<TimeSeries>,

    /// Time throttled by the CPU limit, seconds per second.
    pub throttled_time: Option<TimeSeries>,
}

impl Container {
    /// Create a container with no metrics.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn cpu_usage(mut self, series: TimeSeries) -> Self {
        self.cpu_usage = Some(series);
        self
    }

    pub fn cpu_limit(mut self, series: TimeSeries) -> Self {
        self.cpu_limit = Some(series);
        self
    }

    pub fn cpu_delay(mut self, series: TimeSeries) -> Self {
        self.cpu_delay = Some(series);
        self
    }

    pub fn throttled_time(mut self, series: TimeSeries) -> Self {
        self.throttled_time = Some(series);
        self
    }
}

/// CPU metrics of a node. Several instances may share a node.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Node name, unique within a snapshot.
    pub name: String,

    /// Overall CPU utilization, percent.
    pub cpu_usage_percent: Option<TimeSeries>,

    /// CPU utilization per mode (`user`, `system`, `iowait`, ...), percent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cpu_usage_by_mode: NamedSeriesSet,

    /// Number of cores.
    pub cpu_capacity: Option<TimeSeries>,

    /// CPU usage in cores of each workload running on the node.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cpu_consumers: NamedSeriesSet,
}

impl Node {
    /// Create a node with no metrics.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn cpu_usage_percent(mut self, series: TimeSeries) -> Self {
        self.cpu_usage_percent = Some(series);
        self
    }

    pub fn cpu_capacity(mut self, series: TimeSeries) -> Self {
        self.cpu_capacity = Some(series);
        self
    }

    /// Add the utilization of one CPU mode.
    pub fn cpu_mode(mut self, mode: impl Into<String>, series: TimeSeries) -> Self {
        self.cpu_usage_by_mode.insert(mode, series);
        self
    }

    /// Add the CPU usage of one workload.
    pub fn cpu_consumer(mut self, name: impl Into<String>, series: TimeSeries) -> Self {
        self.cpu_consumers.insert(name, series);
        self
    }
}

/// Metrics scraped from a Redis server.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RedisInstance {
    /// `1` while the exporter can reach the server.
    pub up: Option<TimeSeries>,

    /// Replication role as reported by the server.
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: Option<String>,

    /// Server version.
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Option<String>,

    /// Calls per second, by command.
    #[cfg_attr(feature = "serde", serde(default))]
    pub calls: NamedSeriesSet,

    /// Seconds spent per second, by command.
    #[cfg_attr(feature = "serde", serde(default))]
    pub calls_time: NamedSeriesSet,
}

impl RedisInstance {
    /// Create a bundle with no metrics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn up(mut self, series: TimeSeries) -> Self {
        self.up = Some(series);
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Record call rate and time spent for one command.
    pub fn command(mut self, name: &str, calls: TimeSeries, calls_time: TimeSeries) -> Self {
        self.calls.insert(name, calls);
        self.calls_time.insert(name, calls_time);
        self
    }
}
