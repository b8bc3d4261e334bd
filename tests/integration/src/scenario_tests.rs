//! Multi-node scenarios with partially scanned and unreadable data
//!
//! Each scenario runs the full comparison and matching pipeline in memory
//! and checks which actions a node operator would end up with.

use nodesync_core::{
    ComparisonSession, FailureReason, InMemoryActionStore, MatchReport, RuleSet, SessionOutcome,
};
use nodesync_meta::{Inventory, SessionSettings};
use nodesync_test_utils::{InventoryBuilder, PartBuilder, RuleBuilder, data_part};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn run(settings: SessionSettings, inventories: Vec<Inventory>, rules: &RuleSet) -> (SessionOutcome, InMemoryActionStore) {
    let store = InMemoryActionStore::new();
    let codes: Vec<String> = inventories.iter().map(|i| i.code.clone()).collect();
    let mut session = ComparisonSession::new(settings, codes);
    for inventory in inventories {
        session.add_inventory(inventory).expect("expected inventory");
    }
    let outcome = session.run(rules, &store).expect("session runs").clone();
    (outcome, store)
}

fn rejection_reasons(report: &MatchReport) -> Vec<FailureReason> {
    report
        .rejected()
        .filter_map(|(_, result)| result.failure_reason)
        .collect()
}

fn mirror_a_to_b() -> RuleSet {
    RuleSet::from(vec![
        RuleBuilder::files("mirror A to B")
            .content_differs(data_part("A"), data_part("B"))
            .copy_content(data_part("A"), data_part("B"))
            .build(),
    ])
}

#[rstest]
#[case::tree(SessionSettings::tree(), "/x/a.txt", "/x/a.txt", None)]
#[case::flat(
    SessionSettings::flat(),
    "/x/a.txt",
    "/y/a.txt",
    Some(FailureReason::AtLeastOneTargetsNotAccessible)
)]
fn test_incomplete_destination_by_matching_mode(
    #[case] settings: SessionSettings,
    #[case] path_on_a: &str,
    #[case] path_on_b: &str,
    #[case] expected_rejection: Option<FailureReason>,
) {
    let a = InventoryBuilder::new("A")
        .part(PartBuilder::directory("A1").file(path_on_a, "new"))
        .build();
    let b = InventoryBuilder::new("B")
        .part(PartBuilder::directory("B1").incomplete().file(path_on_b, "old"))
        .build();

    let (outcome, store) = run(settings, vec![a, b], &mirror_a_to_b());

    assert_eq!(outcome.comparison.items.len(), 1);
    match expected_rejection {
        None => {
            assert_eq!(outcome.report.accepted_count(), 1);
            assert_eq!(store.len(), 1);
        }
        Some(reason) => {
            assert_eq!(rejection_reasons(&outcome.report), vec![reason]);
            assert!(store.is_empty());
        }
    }
}

#[test]
fn test_file_below_unreadable_directory_is_not_overwritten() {
    // B could not list /locked, so the file may exist there unseen
    let a = InventoryBuilder::new("A")
        .part(
            PartBuilder::directory("A1")
                .dir("/locked")
                .file("/locked/notes.txt", "notes"),
        )
        .build();
    let b = InventoryBuilder::new("B")
        .part(PartBuilder::directory("B1").incomplete().inaccessible_dir("/locked"))
        .build();

    let rules = RuleSet::from(vec![
        RuleBuilder::files("push missing")
            .missing_on(data_part("A"), data_part("B"))
            .copy_content(data_part("A"), data_part("B"))
            .build(),
        RuleBuilder::files("push different")
            .content_differs(data_part("A"), data_part("B"))
            .copy_content(data_part("A"), data_part("B"))
            .build(),
    ]);

    let (outcome, store) = run(SessionSettings::tree(), vec![a, b], &rules);

    // The placeholder makes the file count as present on B
    let notes = outcome
        .comparison
        .items
        .iter()
        .find(|i| i.path_identity().linking_key == "/locked/notes.txt")
        .expect("notes.txt compared");
    assert_eq!(notes.access_issue_parts().len(), 1);
    assert_eq!(outcome.report.accepted_count(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_analysis_error_on_source_blocks_copy() {
    let a = InventoryBuilder::new("A")
        .part(PartBuilder::directory("A1").file_with_error("/big.iso", 4096))
        .build();
    let b = InventoryBuilder::new("B")
        .part(PartBuilder::directory("B1").file("/big.iso", "old image"))
        .build();

    let rules = RuleSet::from(vec![
        RuleBuilder::files("push iso")
            .name_matches("*.iso")
            .copy_content(data_part("A"), data_part("B"))
            .build(),
    ]);

    let (outcome, store) = run(SessionSettings::tree(), vec![a, b], &rules);

    assert_eq!(
        rejection_reasons(&outcome.report),
        vec![FailureReason::SourceHasAnalysisError]
    );
    assert!(store.is_empty());
}

#[test]
fn test_three_nodes_fan_out_from_reference() {
    let reference = InventoryBuilder::new("A")
        .part(PartBuilder::directory("A1").file("/config.ini", "v3"))
        .build();
    let behind = InventoryBuilder::new("B")
        .part(PartBuilder::directory("B1").file("/config.ini", "v2"))
        .build();
    let current = InventoryBuilder::new("C")
        .part(PartBuilder::directory("C1").file("/config.ini", "v3"))
        .build();

    let rules = RuleSet::from(vec![
        RuleBuilder::files("A to B")
            .content_differs(data_part("A"), data_part("B"))
            .copy_content(data_part("A"), data_part("B"))
            .build(),
        RuleBuilder::files("A to C")
            .content_differs(data_part("A"), data_part("C"))
            .copy_content(data_part("A"), data_part("C"))
            .build(),
    ]);

    let (outcome, store) = run(SessionSettings::tree(), vec![reference, behind, current], &rules);

    let item = &outcome.comparison.items[0];
    assert_eq!(item.content_identities().len(), 2);
    assert!(item.content_repartition().missing_inventories.is_empty());

    let actions = store.all();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].destination, Some(data_part("B")));
}
