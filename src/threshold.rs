//! Threshold evaluation.
//!
//! A [`ThresholdEvaluator`] is created per check kind at the start of a pass,
//! observes a scalar for every audited entity, and collects the entities that
//! breach the configured threshold. [`ThresholdEvaluator::finish`] turns the
//! collected set into a [`Check`].

use std::collections::BTreeSet;
use std::fmt;

use crate::config::CheckConfig;
use crate::report::{Check, CheckId};

/// Identifies an audited entity.
///
/// Containers are qualified with their instance so that identically named
/// containers of different instances count separately.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    pub entity: String,
    pub instance: Option<String>,
}

impl EntityKey {
    /// An entity scoped to an instance.
    pub fn new(entity: &str, instance: &str) -> Self {
        Self {
            entity: entity.to_string(),
            instance: Some(instance.to_string()),
        }
    }

    /// An entity with a globally unique name, such as a node or an instance.
    pub fn global(entity: &str) -> Self {
        Self {
            entity: entity.to_string(),
            instance: None,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{}@{}", self.entity, instance),
            None => f.write_str(&self.entity),
        }
    }
}

/// Collects the entities violating one check during one pass.
#[derive(Debug, Clone)]
pub struct ThresholdEvaluator {
    id: CheckId,
    config: CheckConfig,
    violations: BTreeSet<EntityKey>,
}

impl ThresholdEvaluator {
    pub fn new(id: CheckId, config: CheckConfig) -> Self {
        Self {
            id,
            config,
            violations: BTreeSet::new(),
        }
    }

    /// Flag `key` if `value` exceeds the threshold. Missing values never do.
    pub fn observe(&mut self, key: EntityKey, value: f64) -> bool {
        if value.is_nan() || value <= self.config.threshold {
            return false;
        }
        self.violations.insert(key);
        true
    }

    /// Flag `key` if `numerator / denominator`, as a percentage, exceeds the
    /// threshold. Entities with a missing or zero denominator are skipped.
    pub fn observe_ratio(&mut self, key: EntityKey, numerator: f64, denominator: f64) -> bool {
        if numerator.is_nan() || denominator.is_nan() || denominator == 0.0 {
            return false;
        }
        self.observe(key, numerator / denominator * 100.0)
    }

    /// Flag `key` if `value` is missing or does not exceed the threshold.
    ///
    /// Used for liveness indicators, where the absence of a sample is itself
    /// a violation.
    pub fn observe_at_most(&mut self, key: EntityKey, value: f64) -> bool {
        if !value.is_nan() && value > self.config.threshold {
            return false;
        }
        self.violations.insert(key);
        true
    }

    /// Entities flagged so far, in key order.
    pub fn violations(&self) -> impl Iterator<Item = &EntityKey> {
        self.violations.iter()
    }

    /// Number of distinct entities flagged so far.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The check for this pass: OK with no violations, otherwise the
    /// configured severity with a message counting the violating entities.
    pub fn finish(self) -> Check {
        let mut check = Check::new(self.id);
        if !self.violations.is_empty() {
            check.set_status(
                self.config.severity,
                self.id.violation_message(self.violations.len()),
            );
        }
        check
    }
}
