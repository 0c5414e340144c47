//! CPU auditor.

use std::collections::BTreeSet;
use std::str::FromStr;

use tracing::debug;

use appaudit_types::{top, AggregateOp, Node, TimeSeries};

use super::AppAuditor;
use crate::report::CheckId;
use crate::threshold::EntityKey;

pub(crate) const CONTAINER_CPU_USAGE: &str = "CPU usage of container <selector>, cores";
pub(crate) const CONTAINER_CPU_DELAY: &str = "CPU delay of container <selector>, seconds/second";
pub(crate) const CONTAINER_THROTTLED_TIME: &str =
    "Throttled time of container <selector>, seconds/second";
pub(crate) const NODE_CPU_USAGE: &str = "Node CPU usage <selector>, %";
pub(crate) const NODE_CPU_CONSUMERS: &str = "CPU consumers on <selector>, cores";

/// Group of the node CPU chart that shows every node.
pub(crate) const OVERVIEW_GROUP: &str = "overview";

/// CPU time categories reported by node exporters, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CpuMode {
    User,
    Nice,
    System,
    IoWait,
    Irq,
    SoftIrq,
    Steal,
}

impl CpuMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CpuMode::User => "user",
            CpuMode::Nice => "nice",
            CpuMode::System => "system",
            CpuMode::IoWait => "iowait",
            CpuMode::Irq => "irq",
            CpuMode::SoftIrq => "softirq",
            CpuMode::Steal => "steal",
        }
    }
}

impl FromStr for CpuMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(CpuMode::User),
            "nice" => Ok(CpuMode::Nice),
            "system" => Ok(CpuMode::System),
            "wait" | "iowait" => Ok(CpuMode::IoWait),
            "irq" => Ok(CpuMode::Irq),
            "softirq" => Ok(CpuMode::SoftIrq),
            "steal" => Ok(CpuMode::Steal),
            other => Err(format!("unknown CPU mode: {other}")),
        }
    }
}

impl AppAuditor<'_> {
    pub(super) fn cpu(&mut self) {
        let app = self.app;
        let ctx = self.report.context;
        let mut relevant_nodes: BTreeSet<&str> = BTreeSet::new();
        let mut overloaded_containers = self.evaluator(CheckId::ContainerCpu);
        let mut overloaded_nodes = self.evaluator(CheckId::NodeCpu);

        for instance in &app.instances {
            for c in &instance.containers {
                self.report
                    .chart_in_group(CONTAINER_CPU_USAGE, &c.name)
                    .add_series(&instance.name, c.cpu_usage.as_ref())
                    .set_threshold("limit", c.cpu_limit.as_ref(), AggregateOp::Max);
                self.report
                    .chart_in_group(CONTAINER_CPU_DELAY, &c.name)
                    .add_series(&instance.name, c.cpu_delay.as_ref());
                self.report
                    .chart_in_group(CONTAINER_THROTTLED_TIME, &c.name)
                    .add_series(&instance.name, c.throttled_time.as_ref());

                if let (Some(usage), Some(limit)) = (&c.cpu_usage, &c.cpu_limit) {
                    if !ctx.is_aligned(usage) || !ctx.is_aligned(limit) {
                        continue;
                    }
                    overloaded_containers.observe_ratio(
                        EntityKey::new(&c.name, &instance.name),
                        usage.last(),
                        limit.last(),
                    );
                }
            }

            let Some(node) = &instance.node else {
                continue;
            };
            if !relevant_nodes.insert(node.name.as_str()) {
                continue;
            }

            self.node_charts(node);
            if let Some(usage) = node.cpu_usage_percent.as_ref().filter(|u| ctx.is_aligned(u)) {
                overloaded_nodes.observe(EntityKey::global(&node.name), usage.last());
            }
        }

        self.add_check(overloaded_containers.finish());
        self.add_check(overloaded_nodes.finish());
    }

    fn node_charts(&mut self, node: &Node) {
        self.report
            .chart_in_group(NODE_CPU_USAGE, OVERVIEW_GROUP)
            .add_series(&node.name, node.cpu_usage_percent.as_ref())
            .feature();

        let by_mode = self
            .report
            .chart_in_group(NODE_CPU_USAGE, &node.name)
            .sorted()
            .stacked();
        for (mode, series) in cpu_by_mode(node) {
            by_mode.add_series(mode.as_str(), Some(series));
        }

        let points = self.report.context.points;
        self.report
            .chart_in_group(NODE_CPU_CONSUMERS, &node.name)
            .stacked()
            .sorted()
            .set_threshold("total", node.cpu_capacity.as_ref(), AggregateOp::Max)
            .add_top(top(
                &node.cpu_consumers,
                AggregateOp::NanSum,
                self.config.top_n,
                points,
            ));
    }
}

/// Per-mode series of a node in drawing order. Unrecognized modes are dropped.
fn cpu_by_mode(node: &Node) -> Vec<(CpuMode, &TimeSeries)> {
    let mut modes: Vec<(CpuMode, &TimeSeries)> = node
        .cpu_usage_by_mode
        .iter()
        .filter_map(|(name, series)| match name.parse::<CpuMode>() {
            Ok(mode) => Some((mode, series)),
            Err(err) => {
                debug!(node = %node.name, "{}", err);
                None
            }
        })
        .collect();
    modes.sort_by_key(|(mode, _)| *mode);
    modes
}
