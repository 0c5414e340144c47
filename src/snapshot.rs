//! Audit snapshots.
//!
//! A snapshot is what the collection pipeline hands over for one pass: the
//! audit window and every application observed in it. On disk it is JSON:
//!
//! ```json
//! {
//!   "context": { "from": 1700000000, "step": 60, "points": 3 },
//!   "applications": [
//!     {
//!       "name": "checkout",
//!       "instances": [
//!         {
//!           "name": "checkout-1",
//!           "containers": [
//!             { "name": "app", "cpu_usage": [0.2, null, 0.9], "cpu_limit": [1, 1, 1] }
//!           ]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use appaudit_types::{AuditContext, Application};

use crate::error::AuditError;

/// Input of one audit pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSnapshot {
    pub context: AuditContext,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl AuditSnapshot {
    pub fn new(context: AuditContext, applications: Vec<Application>) -> Self {
        Self {
            context,
            applications,
        }
    }

    /// Load and parse a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, AuditError> {
        let content = fs::read_to_string(path).map_err(|source| AuditError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a snapshot from a JSON string.
    pub fn parse(content: &str) -> Result<Self, AuditError> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "context": { "from": 1700000000, "step": 60, "points": 2 },
            "applications": [
                {
                    "name": "checkout",
                    "instances": [
                        {
                            "name": "checkout-1",
                            "containers": [
                                { "name": "app", "cpu_usage": [0.5, null], "cpu_limit": [1.0, 1.0] }
                            ],
                            "node": { "name": "node-a", "cpu_usage_percent": [40.0, 42.0] }
                        }
                    ]
                },
                { "name": "empty" }
            ]
        }"#
    }

    #[test]
    fn test_parse_snapshot() {
        let snapshot = AuditSnapshot::parse(sample_json()).unwrap();
        assert_eq!(snapshot.context, AuditContext::new(1_700_000_000, 60, 2));
        assert_eq!(snapshot.applications.len(), 2);
        assert!(snapshot.applications[1].instances.is_empty());

        let instance = &snapshot.applications[0].instances[0];
        assert_eq!(instance.node.as_ref().unwrap().name, "node-a");
        assert!(instance.containers[0]
            .cpu_usage
            .as_ref()
            .unwrap()
            .get(1)
            .is_nan());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();
        file.flush().unwrap();

        let snapshot = AuditSnapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.applications[0].name, "checkout");
    }

    #[test]
    fn test_load_missing_file() {
        let err = AuditSnapshot::load(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, AuditError::Read { .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = AuditSnapshot::parse("{ not json").unwrap_err();
        assert!(matches!(err, AuditError::Parse(_)));
    }
}
