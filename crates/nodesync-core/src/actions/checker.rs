//! Consistency checks for candidate actions

use chrono::{DateTime, Utc};
use nodesync_meta::{FileSystemType, Inventory, MatchingMode, SessionSettings};

use super::{ActionOperator, AtomicAction, FailureReason, ValidationResult};
use crate::comparison::{ComparisonItem, ContentCore, ContentIdentity, ContentIdentityCore};
use crate::matching::localization::{localize, localize_all, matching_parts, resolve_parts};
use crate::rules::DataPart;

type Check = std::result::Result<(), FailureReason>;

/// Outcome of filtering candidate actions for one item
#[derive(Debug, Clone, Default)]
pub struct ApplicableActions {
    pub accepted: Vec<AtomicAction>,
    pub rejected: Vec<(AtomicAction, ValidationResult)>,
}

/// Validates candidate actions against an item and the actions around it
///
/// Accessibility depends on the matching mode: in Tree mode only the item's
/// own descriptions matter, in Flat mode any incomplete part is untrusted.
#[derive(Debug, Clone, Copy)]
pub struct AtomicActionConsistencyChecker<'a> {
    settings: SessionSettings,
    inventories: &'a [Inventory],
}

impl<'a> AtomicActionConsistencyChecker<'a> {
    pub fn new(settings: SessionSettings, inventories: &'a [Inventory]) -> Self {
        Self {
            settings,
            inventories,
        }
    }

    /// Check `action` against `item` alone
    pub fn check_can_add(&self, action: &AtomicAction, item: &ComparisonItem) -> ValidationResult {
        self.check_can_add_among(action, item, &[])
    }

    /// Check `action` against `item` and the actions already set for it
    pub fn check_can_add_among(
        &self,
        action: &AtomicAction,
        item: &ComparisonItem,
        others: &[AtomicAction],
    ) -> ValidationResult {
        let result = self.check(action, item, others);
        if let Err(reason) = result {
            tracing::trace!(action = %action, %reason, "action rejected");
        }
        result.into()
    }

    /// Filter candidates in order, each checked against `existing` plus the
    /// candidates accepted before it
    pub fn get_applicable_actions(
        &self,
        item: &ComparisonItem,
        candidates: Vec<AtomicAction>,
        existing: &[AtomicAction],
    ) -> ApplicableActions {
        let mut applicable = ApplicableActions::default();
        let mut context: Vec<AtomicAction> = existing.to_vec();

        for candidate in candidates {
            let result = self.check_can_add_among(&candidate, item, &context);
            if result.is_valid {
                context.push(candidate.clone());
                applicable.accepted.push(candidate);
            } else {
                applicable.rejected.push((candidate, result));
            }
        }

        applicable
    }

    fn check(&self, action: &AtomicAction, item: &ComparisonItem, others: &[AtomicAction]) -> Check {
        check_structure(action, item)?;
        self.check_known_data_parts(action)?;

        if action.operator == ActionOperator::DoNothing {
            return check_do_nothing(action, item, others);
        }

        if action.operator == ActionOperator::Create {
            self.check_create_destination(action)?;
        }

        let source = match (&action.source, action.operator.is_synchronize()) {
            (Some(source), true) => Some(self.check_source(source, item)?),
            _ => None,
        };

        if let Some(destination) = &action.destination {
            self.check_destination(action.operator, destination, item)?;
            if let (Some(identity), Some(source)) = (source, &action.source) {
                check_nothing_to_copy(action.operator, (identity, source), destination, item)?;
            }
        }

        check_conflicts(action, item, others)
    }

    fn check_known_data_parts(&self, action: &AtomicAction) -> Check {
        let unknown = action
            .source
            .iter()
            .chain(action.destination.iter())
            .any(|dp| dp.resolve(self.inventories).is_err());
        if unknown {
            return Err(FailureReason::UnknownDataPart);
        }
        Ok(())
    }

    fn check_create_destination(&self, action: &AtomicAction) -> Check {
        if let Some(destination) = &action.destination
            && resolve_parts(destination, self.inventories)
                .iter()
                .any(|(_, part)| part.part_type != FileSystemType::Directory)
        {
            return Err(FailureReason::CreateDestinationMustBeDirectoryPart);
        }
        Ok(())
    }

    fn check_source<'i>(
        &self,
        source: &DataPart,
        item: &'i ComparisonItem,
    ) -> std::result::Result<&'i ContentIdentity, FailureReason> {
        let identity = localize(item, source).ok_or(FailureReason::SourceNotFound)?;
        if matching_parts(identity, source).any(|p| identity.has_analysis_error(p)) {
            return Err(FailureReason::SourceHasAnalysisError);
        }
        if !self.is_accessible(source, item) {
            return Err(FailureReason::SourceNotAccessible);
        }
        Ok(identity)
    }

    fn check_destination(
        &self,
        operator: ActionOperator,
        destination: &DataPart,
        item: &ComparisonItem,
    ) -> Check {
        let identities = localize_all(item, destination);
        let needs_target = matches!(operator, ActionOperator::Delete | ActionOperator::SynchronizeDate);
        if needs_target && identities.is_empty() {
            return Err(FailureReason::TargetNotPresent);
        }
        if operator.is_synchronize()
            && identities
                .iter()
                .any(|ci| matching_parts(ci, destination).any(|p| ci.has_analysis_error(p)))
        {
            return Err(FailureReason::AtLeastOneTargetsHasAnalysisError);
        }
        if !self.is_accessible(destination, item) {
            return Err(FailureReason::AtLeastOneTargetsNotAccessible);
        }
        Ok(())
    }

    /// Accessibility policy for one side of an action
    ///
    /// An identity that is absent for the data part counts as accessible; a
    /// present one must have been read on every matching part.
    fn is_accessible(&self, data_part: &DataPart, item: &ComparisonItem) -> bool {
        if self.settings.matching_mode == MatchingMode::Flat
            && resolve_parts(data_part, self.inventories)
                .iter()
                .any(|(_, part)| part.is_incomplete_due_to_access)
        {
            return false;
        }

        localize_all(item, data_part).into_iter().all(|identity| {
            matching_parts(identity, data_part).all(|p| identity.is_accessible_on(p))
        })
    }
}

fn check_structure(action: &AtomicAction, item: &ComparisonItem) -> Check {
    let operator = action.operator;

    if operator.is_synchronize() && action.source.is_none() {
        return Err(FailureReason::SourceRequired);
    }
    if operator != ActionOperator::DoNothing && action.destination.is_none() {
        return Err(FailureReason::DestinationRequired);
    }
    match operator {
        ActionOperator::Delete if action.source.is_some() => {
            return Err(FailureReason::SourceNotAllowedForDeleteOperation);
        }
        ActionOperator::Create if action.source.is_some() => {
            return Err(FailureReason::SourceNotAllowedForCreateOperation);
        }
        ActionOperator::Create if item.file_system_type() == FileSystemType::File => {
            return Err(FailureReason::CreateOperationOnFileNotAllowed);
        }
        _ if operator.is_synchronize() && item.file_system_type() == FileSystemType::Directory => {
            return Err(FailureReason::SynchronizeOperationOnDirectoryNotAllowed);
        }
        _ => {}
    }

    if let (Some(source), Some(destination)) = (&action.source, &action.destination)
        && overlaps(source, destination)
    {
        return Err(FailureReason::SourceEqualsDestination);
    }
    Ok(())
}

fn check_do_nothing(action: &AtomicAction, item: &ComparisonItem, others: &[AtomicAction]) -> Check {
    let conflicting = same_item(action, item, others).any(|other| other.operator != ActionOperator::DoNothing);
    if conflicting {
        return Err(FailureReason::DoNothingConflict);
    }
    Ok(())
}

fn check_nothing_to_copy(
    operator: ActionOperator,
    (source, source_part): (&ContentIdentity, &DataPart),
    destination: &DataPart,
    item: &ComparisonItem,
) -> Check {
    let Some(source_core) = hashed_core(source) else {
        return Ok(());
    };
    let targets = localize_all(item, destination);
    if targets.is_empty() || !targets.iter().all(|ci| hashed_core(ci) == Some(source_core)) {
        return Ok(());
    }

    match operator {
        ActionOperator::SynchronizeContentOnly => Err(FailureReason::NothingToCopyContentIdentical),
        ActionOperator::SynchronizeContentAndDate => {
            let source_time = identity_times(source, source_part).first().copied();
            let target_times: Vec<_> = targets
                .iter()
                .flat_map(|ci| identity_times(ci, destination))
                .collect();
            let same_date = source_time.is_some()
                && !target_times.is_empty()
                && target_times.iter().all(|t| Some(*t) == source_time);
            if same_date {
                Err(FailureReason::NothingToCopyContentAndDateIdentical)
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

fn check_conflicts(action: &AtomicAction, item: &ComparisonItem, others: &[AtomicAction]) -> Check {
    for other in same_item(action, item, others) {
        if other.operator == ActionOperator::DoNothing {
            return Err(FailureReason::DoNothingConflict);
        }
        if let (Some(mine), Some(theirs)) = (&action.destination, &other.destination)
            && overlaps(mine, theirs)
        {
            return Err(FailureReason::TargetAlreadyUsed);
        }
        if let (Some(mine), Some(theirs)) = (&action.source, &other.destination)
            && overlaps(mine, theirs)
        {
            return Err(FailureReason::SourceIsTargetOfAnotherAction);
        }
        if let (Some(mine), Some(theirs)) = (&action.destination, &other.source)
            && overlaps(mine, theirs)
        {
            return Err(FailureReason::TargetIsSourceOfAnotherAction);
        }
    }
    Ok(())
}

fn same_item<'o>(
    action: &'o AtomicAction,
    item: &'o ComparisonItem,
    others: &'o [AtomicAction],
) -> impl Iterator<Item = &'o AtomicAction> {
    others
        .iter()
        .filter(move |o| o.id != action.id && &o.path_identity == item.path_identity())
}

/// Two data parts overlap when one covers a part the other covers
fn overlaps(a: &DataPart, b: &DataPart) -> bool {
    a.inventory == b.inventory
        && match (&a.part, &b.part) {
            (Some(x), Some(y)) => x == y,
            _ => true,
        }
}

fn hashed_core(identity: &ContentIdentity) -> Option<&ContentIdentityCore> {
    match identity.core() {
        ContentCore::Known(core) if core.is_hashed() => Some(core),
        _ => None,
    }
}

fn identity_times(identity: &ContentIdentity, data_part: &DataPart) -> Vec<DateTime<Utc>> {
    matching_parts(identity, data_part)
        .filter_map(|p| identity.last_write_time(p))
        .collect()
}
