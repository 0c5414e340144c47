//! The output of an audit pass.
//!
//! A [`Report`] is assembled by the auditors and handed to a renderer. It
//! carries only structure: charts of series, tables of cells, and checks.
//!
//! ## Submodules
//!
//! - [`chart`]: [`Chart`], its series and threshold overlay
//! - [`check`]: [`Check`], [`CheckId`] and [`Severity`]
//! - [`table`]: [`Table`] and [`TableCell`]

pub mod chart;
pub mod check;
pub mod table;

pub use chart::{Chart, ChartKey, Series};
pub use check::{plural, Check, CheckId, Severity};
pub use table::{Icon, Status, Table, TableCell};

use serde::Serialize;

use appaudit_types::AuditContext;

/// Charts, tables and checks produced for one application in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub name: String,
    pub context: AuditContext,
    pub charts: Vec<Chart>,
    pub tables: Vec<Table>,
    pub checks: Vec<Check>,
}

impl Report {
    /// Create an empty report on the grid of `ctx`.
    pub fn new(ctx: &AuditContext, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: *ctx,
            charts: Vec::new(),
            tables: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Get or create an ungrouped chart.
    pub fn chart(&mut self, title: &str) -> &mut Chart {
        self.get_or_create_chart(ChartKey::new(title, None))
    }

    /// Get or create the chart for `group` among the charts titled `title`.
    pub fn chart_in_group(&mut self, title: &str, group: &str) -> &mut Chart {
        self.get_or_create_chart(ChartKey::new(title, Some(group.to_string())))
    }

    fn get_or_create_chart(&mut self, key: ChartKey) -> &mut Chart {
        let index = match self.charts.iter().position(|c| c.key == key) {
            Some(index) => index,
            None => {
                self.charts.push(Chart::new(key, self.context.points));
                self.charts.len() - 1
            }
        };
        &mut self.charts[index]
    }

    /// Look up a chart.
    pub fn find_chart(&self, title: &str, group: Option<&str>) -> Option<&Chart> {
        self.charts
            .iter()
            .find(|c| c.key.title == title && c.key.group.as_deref() == group)
    }

    /// Get or create the table with this header.
    pub fn table(&mut self, header: &[&str]) -> &mut Table {
        let index = match self.tables.iter().position(|t| t.header == header) {
            Some(index) => index,
            None => {
                self.tables.push(Table::new(header));
                self.tables.len() - 1
            }
        };
        &mut self.tables[index]
    }

    /// Add a passing check, replacing an earlier check with the same id.
    pub fn add_check(&mut self, id: CheckId) -> &mut Check {
        self.insert_check(Check::new(id))
    }

    /// Add a finished check, replacing an earlier check with the same id.
    pub fn insert_check(&mut self, check: Check) -> &mut Check {
        let index = match self.checks.iter().position(|c| c.id == check.id) {
            Some(index) => {
                self.checks[index] = check;
                index
            }
            None => {
                self.checks.push(check);
                self.checks.len() - 1
            }
        };
        &mut self.checks[index]
    }

    /// Look up a check.
    pub fn check(&self, id: CheckId) -> Option<&Check> {
        self.checks.iter().find(|c| c.id == id)
    }

    /// The worst severity across all checks, `Ok` when there are none.
    pub fn severity(&self) -> Severity {
        self.checks
            .iter()
            .map(|c| c.severity)
            .max()
            .unwrap_or(Severity::Ok)
    }
}
