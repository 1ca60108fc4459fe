//! Reconciliation policies and outcome
//!
//! [`ModesConfig`] selects how an instance [`ModesManager`](crate::ModesManager)
//! is matched against its generic manager and what happens to generic modes
//! that find no instance slot.

use crate::error::TechObjectError;
use crate::mode::ModeId;
use serde::{Deserialize, Serialize};

/// How instance modes are paired with generic modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStrategy {
    /// Index `i` of the generic list updates index `i` of the instance list
    #[default]
    Positional,

    /// Pair modes sharing the same bound lua name
    ///
    /// Unbound modes never match. If the generic list binds one lua name
    /// more than once, only the first of them is used.
    ByBaseOperation,
}

/// What to do with generic modes that have no instance counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Leave them out and list them in [`ReconcileReport::skipped`]
    #[default]
    Skip,

    /// Append a copy of each to the instance list
    ///
    /// Under [`ReconcileStrategy::ByBaseOperation`] only modes with a
    /// resolvable, not yet used binding are appended; the rest are skipped.
    Extend,

    /// Fail before any mode is touched
    Reject,
}

/// Reconciliation configuration for a modes manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModesConfig {
    /// Pairing strategy
    pub strategy: ReconcileStrategy,
    /// Policy for unpaired generic modes
    pub shortfall: ShortfallPolicy,
}

impl ModesConfig {
    /// Create default configuration (positional, skip)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With pairing strategy
    #[inline]
    #[must_use]
    pub fn with_strategy(mut self, strategy: ReconcileStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// With shortfall policy
    #[inline]
    #[must_use]
    pub fn with_shortfall(mut self, shortfall: ShortfallPolicy) -> Self {
        self.shortfall = shortfall;
        self
    }
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Instance indices that received the name and binding updates
    pub updated: Vec<usize>,
    /// Number of effective renames
    pub renamed: usize,
    /// Number of effective rebinds
    pub rebound: usize,
    /// Generic indices that were not applied
    pub skipped: Vec<usize>,
    /// Modes appended to the instance list
    pub appended: Vec<ModeId>,
    /// Bindings the instance registry refused, by instance index
    pub unresolved: Vec<(usize, TechObjectError)>,
}

impl ReconcileReport {
    /// Check if every generic mode landed in the instance without problems
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.unresolved.is_empty()
    }

    /// Check if the pass changed anything observable
    #[inline]
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.renamed > 0 || self.rebound > 0 || !self.appended.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ModesConfig::new();
        assert_eq!(config.strategy, ReconcileStrategy::Positional);
        assert_eq!(config.shortfall, ShortfallPolicy::Skip);
    }

    #[test]
    fn config_builders() {
        let config = ModesConfig::new()
            .with_strategy(ReconcileStrategy::ByBaseOperation)
            .with_shortfall(ShortfallPolicy::Reject);
        assert_eq!(config.strategy, ReconcileStrategy::ByBaseOperation);
        assert_eq!(config.shortfall, ShortfallPolicy::Reject);
    }

    #[test]
    fn config_deserializes_snake_case() {
        let config: ModesConfig =
            serde_json::from_str(r#"{"strategy":"by_base_operation"}"#).unwrap();
        assert_eq!(config.strategy, ReconcileStrategy::ByBaseOperation);
        assert_eq!(config.shortfall, ShortfallPolicy::Skip);
    }

    #[test]
    fn empty_report_is_complete() {
        let report = ReconcileReport::default();
        assert!(report.is_complete());
        assert!(!report.has_changes());
    }
}
