//! # appaudit
//!
//! Health auditing for distributed applications.
//!
//! This crate turns per-instance, per-container and per-node time series into
//! a [`Report`]: charts summarizing the series, tables describing instances,
//! and checks classifying the application against configured thresholds.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  AuditSnapshot ──▶ AppAuditor ──▶ Report ──▶ renderer / export │
//! │   (snapshot)        (auditor)      (report)                    │
//! │                        │                                      │
//! │          ┌─────────────┼──────────────┐                       │
//! │          ▼             ▼              ▼                       │
//! │     aggregate()      top()     ThresholdEvaluator             │
//! │   (appaudit-types) (appaudit-types)  (threshold)              │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`auditor`]**: one audit pass per application (CPU and Redis auditors)
//! - **[`threshold`]**: violating-entity collection and check verdicts
//! - **[`report`]**: charts, tables, checks and severities
//! - **[`config`]**: thresholds and Top-N size, from a file and the environment
//! - **[`snapshot`]**: the JSON input of a pass
//!
//! ## Usage
//!
//! ```
//! use appaudit::{audit, AuditorConfig, CheckId, Severity};
//! use appaudit_types::{Application, AuditContext, Container, Instance, TimeSeries};
//!
//! let ctx = AuditContext::new(1_700_000_000, 60, 2);
//! let app = Application::new("checkout").instance(
//!     Instance::new("checkout-1").container(
//!         Container::new("app")
//!             .cpu_usage(TimeSeries::new(vec![0.5, 0.9]))
//!             .cpu_limit(TimeSeries::new(vec![1.0, 1.0])),
//!     ),
//! );
//!
//! let report = audit(&ctx, &app, &AuditorConfig::default());
//! let check = report.check(CheckId::ContainerCpu).unwrap();
//! assert_eq!(check.severity, Severity::Warning);
//! assert_eq!(check.message, "high CPU usage of 1 container");
//! ```

pub mod auditor;
pub mod config;
pub mod error;
pub mod report;
pub mod snapshot;
pub mod threshold;

use std::sync::Arc;

use tracing::info;

use appaudit_types::{Application, AuditContext};

pub use auditor::{audit, AppAuditor};
pub use config::{AuditorConfig, CheckConfig};
pub use error::AuditError;
pub use report::{Chart, Check, CheckId, Report, Severity, Table};
pub use snapshot::AuditSnapshot;
pub use threshold::{EntityKey, ThresholdEvaluator};

/// Audit independent applications concurrently.
///
/// Each application is audited on the blocking pool with its own local state.
/// Reports are returned in the order of `applications`.
pub async fn audit_applications(
    ctx: AuditContext,
    applications: Vec<Application>,
    config: Arc<AuditorConfig>,
) -> Result<Vec<Report>, AuditError> {
    let handles: Vec<_> = applications
        .into_iter()
        .map(|app| {
            let config = Arc::clone(&config);
            let name = app.name.clone();
            let handle = tokio::task::spawn_blocking(move || audit(&ctx, &app, &config));
            (name, handle)
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for (application, handle) in handles {
        let report = handle.await.map_err(|e| AuditError::Aborted {
            application,
            reason: e.to_string(),
        })?;
        info!(
            application = %report.name,
            severity = %report.severity(),
            "application audited"
        );
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appaudit_types::{Instance, Node, TimeSeries};

    #[test]
    fn test_audit_applications_keeps_order() {
        let ctx = AuditContext::new(0, 60, 1);
        let apps: Vec<_> = (0..4)
            .map(|i| {
                Application::new(format!("app-{i}")).instance(
                    Instance::new(format!("app-{i}-1")).node(
                        Node::new(format!("node-{i}"))
                            .cpu_usage_percent(TimeSeries::new(vec![i as f64 * 30.0])),
                    ),
                )
            })
            .collect();

        let reports = tokio_test::block_on(audit_applications(
            ctx,
            apps,
            Arc::new(AuditorConfig::default()),
        ))
        .unwrap();

        let names: Vec<_> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["app-0", "app-1", "app-2", "app-3"]);
        // only app-3 at 90% crosses the default threshold
        let severities: Vec<_> = reports.iter().map(|r| r.severity()).collect();
        assert_eq!(
            severities,
            vec![Severity::Ok, Severity::Ok, Severity::Ok, Severity::Warning]
        );
    }
}
