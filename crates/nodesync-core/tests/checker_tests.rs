//! Tests for AtomicActionConsistencyChecker

use nodesync_core::{
    ActionOperator, AtomicAction, AtomicActionConsistencyChecker, ComparisonItem, ComparisonResult,
    DataPart, FailureReason, InventoryComparer, ValidationResult,
};
use nodesync_meta::{Inventory, SessionSettings};
use nodesync_test_utils::{InventoryBuilder, PartBuilder, data_part, inventory_part, ts};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn compare(settings: SessionSettings, inventories: Vec<Inventory>) -> ComparisonResult {
    InventoryComparer::new(settings).compare(inventories).unwrap()
}

fn item<'a>(result: &'a ComparisonResult, path: &str) -> &'a ComparisonItem {
    result
        .items
        .iter()
        .find(|i| i.path_identity().original_path.as_str() == path)
        .unwrap_or_else(|| panic!("no item for {path}"))
}

fn action(
    item: &ComparisonItem,
    operator: ActionOperator,
    source: Option<DataPart>,
    destination: Option<DataPart>,
) -> AtomicAction {
    AtomicAction::manual(operator, source, destination, item.path_identity())
}

fn sync(item: &ComparisonItem, source: &str, destination: &str) -> AtomicAction {
    action(
        item,
        ActionOperator::SynchronizeContentOnly,
        Some(data_part(source)),
        Some(data_part(destination)),
    )
}

fn reason(result: ValidationResult) -> Option<FailureReason> {
    result.failure_reason
}

/// A, B, C each hold `/f.txt` with distinct content; `/d` exists on A only
fn three_nodes() -> ComparisonResult {
    compare(
        SessionSettings::tree(),
        vec![
            InventoryBuilder::new("A")
                .part(PartBuilder::directory("A1").file("/f.txt", "alpha").dir("/d"))
                .build(),
            InventoryBuilder::new("B")
                .part(PartBuilder::directory("B1").file("/f.txt", "beta"))
                .build(),
            InventoryBuilder::new("C")
                .part(PartBuilder::directory("C1").file("/f.txt", "gamma"))
                .part(PartBuilder::single_file("C2"))
                .build(),
        ],
    )
}

fn incomplete_destination(settings: SessionSettings) -> ComparisonResult {
    compare(
        settings,
        vec![
            InventoryBuilder::new("A")
                .part(PartBuilder::directory("A1").file("/f.txt", "new"))
                .build(),
            InventoryBuilder::new("B")
                .part(PartBuilder::directory("B1").incomplete().file("/f.txt", "old"))
                .build(),
        ],
    )
}

#[test]
fn test_incomplete_destination_part_is_valid_in_tree_mode() {
    let settings = SessionSettings::tree();
    let result = incomplete_destination(settings);
    let checker = AtomicActionConsistencyChecker::new(settings, &result.inventories);
    let f = item(&result, "/f.txt");

    assert_eq!(checker.check_can_add(&sync(f, "A", "B"), f), ValidationResult::success());
}

#[test]
fn test_incomplete_destination_part_is_invalid_in_flat_mode() {
    let settings = SessionSettings::flat();
    let result = incomplete_destination(settings);
    let checker = AtomicActionConsistencyChecker::new(settings, &result.inventories);
    let f = item(&result, "/f.txt");

    assert_eq!(
        checker.check_can_add(&sync(f, "A", "B"), f),
        ValidationResult::failure(FailureReason::AtLeastOneTargetsNotAccessible)
    );
}

#[test]
fn test_incomplete_source_part_is_invalid_in_flat_mode() {
    let settings = SessionSettings::flat();
    let result = incomplete_destination(settings);
    let checker = AtomicActionConsistencyChecker::new(settings, &result.inventories);
    let f = item(&result, "/f.txt");

    assert_eq!(
        reason(checker.check_can_add(&sync(f, "B", "A"), f)),
        Some(FailureReason::SourceNotAccessible)
    );
}

/// B could not list `/locked`; A and C could
fn locked_on_b() -> ComparisonResult {
    compare(
        SessionSettings::tree(),
        vec![
            InventoryBuilder::new("A")
                .part(
                    PartBuilder::directory("A1")
                        .dir("/locked")
                        .dir("/locked/sub")
                        .file("/locked/f.txt", "alpha"),
                )
                .build(),
            InventoryBuilder::new("B")
                .part(PartBuilder::directory("B1").incomplete().inaccessible_dir("/locked"))
                .build(),
            InventoryBuilder::new("C")
                .part(PartBuilder::directory("C1").dir("/locked/sub").file("/locked/f.txt", "gamma"))
                .build(),
        ],
    )
}

/// `/d` exists on A only; B's scan is incomplete
fn directory_missing_on_incomplete(settings: SessionSettings) -> ComparisonResult {
    compare(
        settings,
        vec![
            InventoryBuilder::new("A")
                .part(PartBuilder::directory("A1").dir("/d"))
                .build(),
            InventoryBuilder::new("B")
                .part(PartBuilder::directory("B1").incomplete())
                .build(),
        ],
    )
}

#[test]
fn test_delete_below_blocked_ancestor_is_invalid() {
    let result = locked_on_b();
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/locked/f.txt");

    let delete = action(f, ActionOperator::Delete, None, Some(data_part("B")));
    assert_eq!(
        checker.check_can_add(&delete, f),
        ValidationResult::failure(FailureReason::AtLeastOneTargetsNotAccessible)
    );
}

#[test]
fn test_delete_only_checks_its_destination() {
    // The item is unreadable on B, but deleting it on C never touches B
    let result = locked_on_b();
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/locked/f.txt");
    assert!(!f.access_issue_parts().is_empty());

    let delete = action(f, ActionOperator::Delete, None, Some(data_part("C")));
    assert_eq!(checker.check_can_add(&delete, f), ValidationResult::success());
}

#[test]
fn test_create_below_blocked_ancestor_is_invalid() {
    let result = locked_on_b();
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let sub = item(&result, "/locked/sub");

    let create = action(sub, ActionOperator::Create, None, Some(data_part("B")));
    assert_eq!(
        checker.check_can_add(&create, sub),
        ValidationResult::failure(FailureReason::AtLeastOneTargetsNotAccessible)
    );
}

#[rstest]
#[case::tree(SessionSettings::tree(), None)]
#[case::flat(SessionSettings::flat(), Some(FailureReason::AtLeastOneTargetsNotAccessible))]
fn test_create_on_incomplete_part_by_mode(
    #[case] settings: SessionSettings,
    #[case] expected: Option<FailureReason>,
) {
    let result = directory_missing_on_incomplete(settings);
    let checker = AtomicActionConsistencyChecker::new(settings, &result.inventories);
    let d = item(&result, "/d");

    let create = action(d, ActionOperator::Create, None, Some(data_part("B")));
    assert_eq!(reason(checker.check_can_add(&create, d)), expected);
}

#[rstest]
#[case(ActionOperator::SynchronizeContentOnly, None, Some("B"), FailureReason::SourceRequired)]
#[case(ActionOperator::SynchronizeContentAndDate, Some("A"), None, FailureReason::DestinationRequired)]
#[case(ActionOperator::Delete, None, None, FailureReason::DestinationRequired)]
#[case(ActionOperator::Delete, Some("A"), Some("B"), FailureReason::SourceNotAllowedForDeleteOperation)]
#[case(ActionOperator::Create, Some("A"), Some("B"), FailureReason::SourceNotAllowedForCreateOperation)]
#[case(ActionOperator::Create, None, Some("B"), FailureReason::CreateOperationOnFileNotAllowed)]
#[case(ActionOperator::SynchronizeContentOnly, Some("A"), Some("A"), FailureReason::SourceEqualsDestination)]
#[case(ActionOperator::SynchronizeContentOnly, Some("A"), Some("Z"), FailureReason::UnknownDataPart)]
fn test_structural_failures_on_file_item(
    #[case] operator: ActionOperator,
    #[case] source: Option<&str>,
    #[case] destination: Option<&str>,
    #[case] expected: FailureReason,
) {
    let result = three_nodes();
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/f.txt");

    let candidate = action(f, operator, source.map(data_part), destination.map(data_part));
    assert_eq!(reason(checker.check_can_add(&candidate, f)), Some(expected));
}

#[test]
fn test_synchronize_on_directory_is_rejected() {
    let result = three_nodes();
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let d = item(&result, "/d");

    assert_eq!(
        reason(checker.check_can_add(&sync(d, "A", "B"), d)),
        Some(FailureReason::SynchronizeOperationOnDirectoryNotAllowed)
    );
}

#[test]
fn test_create_directory_on_directory_part() {
    let result = three_nodes();
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let d = item(&result, "/d");

    let create_b = action(d, ActionOperator::Create, None, Some(data_part("B")));
    assert!(checker.check_can_add(&create_b, d).is_valid);

    let create_c2 = action(d, ActionOperator::Create, None, Some(inventory_part("C", "C2")));
    assert_eq!(
        reason(checker.check_can_add(&create_c2, d)),
        Some(FailureReason::CreateDestinationMustBeDirectoryPart)
    );
}

#[test]
fn test_source_must_hold_the_item() {
    let result = compare(
        SessionSettings::tree(),
        vec![
            InventoryBuilder::new("A").part(PartBuilder::directory("A1")).build(),
            InventoryBuilder::new("B")
                .part(PartBuilder::directory("B1").file("/f.txt", "x"))
                .build(),
        ],
    );
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/f.txt");

    assert_eq!(
        reason(checker.check_can_add(&sync(f, "A", "B"), f)),
        Some(FailureReason::SourceNotFound)
    );
    let delete_a = action(f, ActionOperator::Delete, None, Some(data_part("A")));
    assert_eq!(
        reason(checker.check_can_add(&delete_a, f)),
        Some(FailureReason::TargetNotPresent)
    );
}

#[test]
fn test_analysis_errors_block_synchronization() {
    let result = compare(
        SessionSettings::tree(),
        vec![
            InventoryBuilder::new("A")
                .part(PartBuilder::directory("A1").file_with_error("/f.txt", 10))
                .build(),
            InventoryBuilder::new("B")
                .part(PartBuilder::directory("B1").file("/f.txt", "x"))
                .build(),
        ],
    );
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/f.txt");

    assert_eq!(
        reason(checker.check_can_add(&sync(f, "A", "B"), f)),
        Some(FailureReason::SourceHasAnalysisError)
    );
    assert_eq!(
        reason(checker.check_can_add(&sync(f, "B", "A"), f)),
        Some(FailureReason::AtLeastOneTargetsHasAnalysisError)
    );
}

#[test]
fn test_unreadable_items_block_synchronization() {
    let result = compare(
        SessionSettings::tree(),
        vec![
            InventoryBuilder::new("A")
                .part(PartBuilder::directory("A1").inaccessible_file("/f.txt"))
                .build(),
            InventoryBuilder::new("B")
                .part(PartBuilder::directory("B1").file("/f.txt", "x"))
                .build(),
        ],
    );
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/f.txt");

    assert_eq!(
        reason(checker.check_can_add(&sync(f, "A", "B"), f)),
        Some(FailureReason::SourceNotAccessible)
    );
    assert_eq!(
        reason(checker.check_can_add(&sync(f, "B", "A"), f)),
        Some(FailureReason::AtLeastOneTargetsNotAccessible)
    );
}

#[test]
fn test_nothing_to_copy_when_already_identical() {
    let result = compare(
        SessionSettings::tree(),
        vec![
            InventoryBuilder::new("A")
                .part(PartBuilder::directory("A1").file_at("/f.txt", "x", ts(100)))
                .build(),
            InventoryBuilder::new("B")
                .part(PartBuilder::directory("B1").file_at("/f.txt", "x", ts(100)))
                .build(),
            InventoryBuilder::new("C")
                .part(PartBuilder::directory("C1").file_at("/f.txt", "x", ts(200)))
                .build(),
        ],
    );
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/f.txt");

    assert_eq!(
        reason(checker.check_can_add(&sync(f, "A", "B"), f)),
        Some(FailureReason::NothingToCopyContentIdentical)
    );

    let with_date = |destination: &str| {
        action(
            f,
            ActionOperator::SynchronizeContentAndDate,
            Some(data_part("A")),
            Some(data_part(destination)),
        )
    };
    assert_eq!(
        reason(checker.check_can_add(&with_date("B"), f)),
        Some(FailureReason::NothingToCopyContentAndDateIdentical)
    );
    assert!(checker.check_can_add(&with_date("C"), f).is_valid);
}

#[test]
fn test_conflicts_with_other_actions() {
    let result = three_nodes();
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/f.txt");
    let existing = vec![sync(f, "A", "B")];

    let check = |candidate: AtomicAction| reason(checker.check_can_add_among(&candidate, f, &existing));

    assert_eq!(check(sync(f, "C", "B")), Some(FailureReason::TargetAlreadyUsed));
    assert_eq!(check(sync(f, "B", "C")), Some(FailureReason::SourceIsTargetOfAnotherAction));
    assert_eq!(check(sync(f, "C", "A")), Some(FailureReason::TargetIsSourceOfAnotherAction));
    assert_eq!(
        check(action(f, ActionOperator::DoNothing, None, None)),
        Some(FailureReason::DoNothingConflict)
    );
    assert_eq!(check(action(f, ActionOperator::Delete, None, Some(data_part("C")))), None);
}

#[test]
fn test_do_nothing_blocks_other_actions() {
    let result = three_nodes();
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/f.txt");
    let existing = vec![action(f, ActionOperator::DoNothing, None, None)];

    assert_eq!(
        reason(checker.check_can_add_among(&sync(f, "A", "B"), f, &existing)),
        Some(FailureReason::DoNothingConflict)
    );
    assert!(
        checker
            .check_can_add_among(&action(f, ActionOperator::DoNothing, None, None), f, &existing)
            .is_valid
    );
}

#[test]
fn test_applicable_actions_are_checked_in_order() {
    let result = three_nodes();
    let checker = AtomicActionConsistencyChecker::new(SessionSettings::tree(), &result.inventories);
    let f = item(&result, "/f.txt");

    let first = sync(f, "A", "B");
    let second = sync(f, "C", "B");
    let third = action(f, ActionOperator::Delete, None, Some(data_part("C")));
    let applicable = checker.get_applicable_actions(f, vec![first.clone(), second.clone(), third.clone()], &[]);

    let accepted: Vec<_> = applicable.accepted.iter().map(|a| a.id).collect();
    assert_eq!(accepted, vec![first.id, third.id]);
    assert_eq!(applicable.rejected.len(), 1);
    assert_eq!(applicable.rejected[0].0.id, second.id);
    assert_eq!(
        applicable.rejected[0].1,
        ValidationResult::failure(FailureReason::TargetAlreadyUsed)
    );
}
