//! Redis auditor.

use std::str::FromStr;

use tracing::debug;

use appaudit_types::{aggregate, top, Aggregate, AggregateOp, RedisInstance, TimeSeries};

use super::AppAuditor;
use crate::report::{CheckId, Icon, Severity, TableCell};
use crate::threshold::EntityKey;

pub(crate) const REDIS_LATENCY: &str = "Redis latency, seconds";
pub(crate) const REDIS_QUERIES: &str = "Redis queries on <selector>, per second";
pub(crate) const INSTANCES_TABLE: [&str; 3] = ["Instance", "Role", "Status"];

/// Replication role of a Redis server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedisRole {
    Master,
    Replica,
}

impl RedisRole {
    pub fn icon(&self) -> Icon {
        match self {
            RedisRole::Master => Icon {
                name: "mdi-database-edit-outline",
                color: "rgba(0,0,0,0.87)",
            },
            RedisRole::Replica => Icon {
                name: "mdi-database-import-outline",
                color: "grey",
            },
        }
    }
}

impl FromStr for RedisRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(RedisRole::Master),
            "slave" | "replica" => Ok(RedisRole::Replica),
            other => Err(format!("unknown Redis role: {other}")),
        }
    }
}

impl AppAuditor<'_> {
    pub(super) fn redis(&mut self) {
        let app = self.app;
        if !app.instances.iter().any(|i| i.redis.is_some()) {
            return;
        }

        let points = self.report.context.points;
        let mut down = self.evaluator(CheckId::RedisAvailability);

        for instance in &app.instances {
            let Some(redis) = &instance.redis else {
                continue;
            };

            let up = redis.up.as_ref().map_or(f64::NAN, TimeSeries::last);
            let mut status = TableCell::new("").with_status(Severity::Ok, "up");
            if down.observe_at_most(EntityKey::global(&instance.name), up) {
                status.set_status(Severity::Warning, "down (no metrics)");
            }

            let role = redis.role.as_deref().unwrap_or_default();
            let mut role_cell = TableCell::new(role);
            match role.parse::<RedisRole>() {
                Ok(role) => role_cell = role_cell.icon(role.icon()),
                Err(err) if !role.is_empty() => {
                    debug!(instance = %instance.name, "{}", err);
                }
                Err(_) => {}
            }

            let version = redis.version.as_deref().unwrap_or_default();
            self.report.table(&INSTANCES_TABLE).add_row(vec![
                TableCell::new(&instance.name).tag(format!("version: {version}")),
                role_cell,
                status,
            ]);

            self.report
                .chart(REDIS_LATENCY)
                .add_series(&instance.name, latency(redis, points).as_ref());
            self.report
                .chart_in_group(REDIS_QUERIES, &instance.name)
                .stacked()
                .sorted()
                .add_top(top(&redis.calls, AggregateOp::NanSum, self.config.top_n, points));
        }

        self.add_check(down.finish());
    }
}

/// Average seconds per call across commands reported in both maps.
///
/// A command only counts when both its time and its call count are on the
/// grid of `points` samples.
fn latency(redis: &RedisInstance, points: usize) -> Option<TimeSeries> {
    let mut total = Aggregate::new(AggregateOp::NanSum, points);
    let mut calls = Aggregate::new(AggregateOp::NanSum, points);
    for (cmd, time) in redis.calls_time.iter() {
        let Some(count) = redis.calls.get(cmd) else {
            continue;
        };
        if time.len() != points || count.len() != points {
            debug!(command = cmd, "skipping command not aligned with the audit grid");
            continue;
        }
        total.add_input(time);
        calls.add_input(count);
    }
    aggregate(AggregateOp::Div, points, [&total.finish()?, &calls.finish()?])
}
