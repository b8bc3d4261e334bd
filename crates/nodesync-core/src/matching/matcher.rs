//! Rule evaluation and action generation
//!
//! For each item the matcher drops the actions previously derived from
//! rules, evaluates the rules, validates the resulting candidates and stores
//! the accepted ones. Manual actions are never touched.

use nodesync_meta::{Inventory, SessionSettings};
use serde::Serialize;

use super::conditions::evaluate;
use crate::Result;
use crate::actions::{
    ActionBatch, AtomicAction, AtomicActionConsistencyChecker, AtomicActionRepository, ValidationResult,
};
use crate::comparison::{ComparisonItem, PathIdentity};
use crate::rules::{ConditionMode, SynchronizationRule};

/// What one item's re-evaluation changed
#[derive(Debug, Clone, Serialize)]
pub struct ItemMatch {
    pub path_identity: PathIdentity,
    /// Rule-derived actions removed from the repository
    pub removed: Vec<AtomicAction>,
    /// Candidates that passed validation and were stored
    pub accepted: Vec<AtomicAction>,
    /// Candidates that failed validation
    pub rejected: Vec<(AtomicAction, ValidationResult)>,
}

/// Outcome of [`SynchronizationRuleMatcher::make_matches`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    pub items: Vec<ItemMatch>,
}

impl MatchReport {
    pub fn accepted(&self) -> impl Iterator<Item = &AtomicAction> {
        self.items.iter().flat_map(|i| i.accepted.iter())
    }

    pub fn rejected(&self) -> impl Iterator<Item = &(AtomicAction, ValidationResult)> {
        self.items.iter().flat_map(|i| i.rejected.iter())
    }

    pub fn accepted_count(&self) -> usize {
        self.items.iter().map(|i| i.accepted.len()).sum()
    }

    pub fn rejected_count(&self) -> usize {
        self.items.iter().map(|i| i.rejected.len()).sum()
    }
}

/// Applies synchronization rules to comparison items
pub struct SynchronizationRuleMatcher<'a> {
    inventories: &'a [Inventory],
    repository: &'a dyn AtomicActionRepository,
    checker: AtomicActionConsistencyChecker<'a>,
}

impl<'a> SynchronizationRuleMatcher<'a> {
    pub fn new(
        settings: SessionSettings,
        inventories: &'a [Inventory],
        repository: &'a dyn AtomicActionRepository,
    ) -> Self {
        Self {
            inventories,
            repository,
            checker: AtomicActionConsistencyChecker::new(settings, inventories),
        }
    }

    /// Re-evaluate `rules` for every item and update the repository
    ///
    /// Rules are validated up front, so an invalid rule leaves the
    /// repository untouched.
    pub fn make_matches(&self, items: &[ComparisonItem], rules: &[SynchronizationRule]) -> Result<MatchReport> {
        rules.iter().try_for_each(SynchronizationRule::validate)?;

        let mut report = MatchReport::default();
        for item in items {
            report.items.push(self.match_item(item, rules)?);
        }

        tracing::debug!(
            items = items.len(),
            rules = rules.len(),
            accepted = report.accepted_count(),
            rejected = report.rejected_count(),
            "Matched rules"
        );
        Ok(report)
    }

    /// Re-evaluate `rules` for a single item
    pub fn make_matches_for_item(&self, item: &ComparisonItem, rules: &[SynchronizationRule]) -> Result<ItemMatch> {
        rules.iter().try_for_each(SynchronizationRule::validate)?;
        self.match_item(item, rules)
    }

    /// Whether `rule` applies to `item`
    ///
    /// A rule without conditions never matches.
    pub fn rule_matches(&self, rule: &SynchronizationRule, item: &ComparisonItem) -> Result<bool> {
        if rule.file_system_type != item.file_system_type() || rule.conditions.is_empty() {
            return Ok(false);
        }

        match rule.condition_mode {
            ConditionMode::All => {
                for condition in &rule.conditions {
                    if !evaluate(condition, item, self.inventories)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ConditionMode::Any => {
                for condition in &rule.conditions {
                    if evaluate(condition, item, self.inventories)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn match_item(&self, item: &ComparisonItem, rules: &[SynchronizationRule]) -> Result<ItemMatch> {
        let (removed, manual): (Vec<_>, Vec<_>) = self
            .repository
            .get_atomic_actions(item.path_identity())
            .into_iter()
            .partition(AtomicAction::is_from_rule);

        let mut candidates = Vec::new();
        for rule in rules {
            if self.rule_matches(rule, item)? {
                tracing::trace!(item = %item.path_identity().link_data, rule = %rule.name, "rule matched");
                candidates.extend(
                    rule.actions
                        .iter()
                        .map(|template| AtomicAction::from_template(template, item.path_identity(), rule.id)),
                );
            }
        }

        let applicable = self.checker.get_applicable_actions(item, candidates, &manual);
        let stored = applicable.accepted.clone();

        self.repository
            .apply_batch(ActionBatch::new(removed.clone(), stored));

        Ok(ItemMatch {
            path_identity: item.path_identity().clone(),
            removed,
            accepted: applicable.accepted,
            rejected: applicable.rejected,
        })
    }
}
