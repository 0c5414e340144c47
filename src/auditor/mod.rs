//! Audit passes.
//!
//! An [`AppAuditor`] runs every auditor over one application and returns the
//! resulting [`Report`]. All state of a pass (violation sets, visited nodes)
//! lives in locals of the pass, so independent applications can be audited in
//! parallel and repeated passes over the same input produce the same report.
//!
//! ```text
//! Application snapshot
//!        │
//!        ▼
//! AppAuditor::audit()
//!        │
//!        ├──▶ cpu()    charts per container / node, ContainerCpu + NodeCpu checks
//!        │
//!        └──▶ redis()  instance table, latency + queries charts, RedisAvailability check
//! ```

mod cpu;
mod redis;

pub use cpu::CpuMode;
pub use redis::RedisRole;

use tracing::debug;

use appaudit_types::{Application, AuditContext};

use crate::config::AuditorConfig;
use crate::report::{Check, CheckId, Report};
use crate::threshold::ThresholdEvaluator;

/// Runs one audit pass over an application.
#[derive(Debug)]
pub struct AppAuditor<'a> {
    app: &'a Application,
    config: &'a AuditorConfig,
    report: Report,
}

impl<'a> AppAuditor<'a> {
    pub fn new(ctx: &AuditContext, app: &'a Application, config: &'a AuditorConfig) -> Self {
        Self {
            app,
            config,
            report: Report::new(ctx, &app.name),
        }
    }

    /// Run every auditor and return the report.
    pub fn audit(mut self) -> Report {
        self.cpu();
        self.redis();

        debug!(
            application = %self.app.name,
            charts = self.report.charts.len(),
            checks = self.report.checks.len(),
            "audit pass finished"
        );
        self.report
    }

    fn evaluator(&self, id: CheckId) -> ThresholdEvaluator {
        ThresholdEvaluator::new(id, self.config.check(id))
    }

    fn add_check(&mut self, check: Check) {
        self.report.insert_check(check);
    }
}

/// Audit one application.
pub fn audit(ctx: &AuditContext, app: &Application, config: &AuditorConfig) -> Report {
    AppAuditor::new(ctx, app, config).audit()
}
