//! Tables of per-instance cells.

use serde::Serialize;

use super::Severity;

/// An icon hint for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub name: &'static str,
    pub color: &'static str,
}

/// Status attached to a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TableCell {
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl TableCell {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Replace the cell status.
    pub fn set_status(&mut self, severity: Severity, message: impl Into<String>) -> &mut Self {
        self.status = Some(Status {
            severity,
            message: message.into(),
        });
        self
    }

    /// Builder-style variant of [`TableCell::set_status`].
    pub fn with_status(mut self, severity: Severity, message: impl Into<String>) -> Self {
        self.set_status(severity, message);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<TableCell>) -> &mut Self {
        self.rows.push(row);
        self
    }
}
