//! Error types for loading audit inputs.
//!
//! Auditing itself never fails; these errors come from the boundary, when
//! reading snapshots and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur before or around an audit pass.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Snapshot file could not be read.
    #[error("Failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Snapshot is not valid JSON or does not match the model.
    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// An audit worker panicked or was cancelled.
    #[error("Audit of application {application} did not complete: {reason}")]
    Aborted { application: String, reason: String },
}
