//! End-to-end tests of the on-disk pipeline
//!
//! Settings, inventories and rules are read from files, run through a
//! session, and the resulting actions are persisted and read back.

use nodesync_core::{
    ActionOperator, AtomicAction, AtomicActionRepository, ComparisonProperty, ComparisonSession,
    ConditionOperator, FailureReason, InMemoryActionStore, PathIdentity, RuleSet, SessionState,
};
use nodesync_fs::{ConfigStore, RelativePath};
use nodesync_meta::{FileSystemType, Inventory, LinkingCase, SessionSettings};
use nodesync_test_utils::{InventoryBuilder, PartBuilder, RuleBuilder, TestWorkspace, data_part, ts};
use pretty_assertions::assert_eq;

const T0: i64 = 1_700_000_000;

fn node_a() -> Inventory {
    InventoryBuilder::new("A")
        .part(
            PartBuilder::directory("A1")
                .file_at("/Docs/Report.txt", "v2", ts(T0 + 100))
                .file_at("/photos/cat.jpg", "cat", ts(T0)),
        )
        .build()
}

fn node_b(report: &str, report_time: i64, with_cat: bool) -> Inventory {
    let mut part = PartBuilder::directory("B1").file_at("/docs/report.txt", report, ts(report_time));
    if with_cat {
        part = part.file_at("/photos/cat.jpg", "cat", ts(T0));
    }
    InventoryBuilder::new("B").part(part).build()
}

fn rules() -> RuleSet {
    RuleSet::from(vec![
        RuleBuilder::files("newer on A wins")
            .condition(
                data_part("A"),
                ComparisonProperty::Date,
                ConditionOperator::IsNewerThan,
                data_part("B").into(),
            )
            .action(
                ActionOperator::SynchronizeContentAndDate,
                Some(data_part("A")),
                Some(data_part("B")),
            )
            .build(),
        RuleBuilder::files("copy new files")
            .missing_on(data_part("A"), data_part("B"))
            .action(
                ActionOperator::SynchronizeContentAndDate,
                Some(data_part("A")),
                Some(data_part("B")),
            )
            .build(),
    ])
}

/// Write everything to disk and load it back the way a caller would.
fn run_from_disk(ws: &TestWorkspace, b: &Inventory, store: &InMemoryActionStore) -> (usize, usize, usize) {
    let settings_path = ws.write_settings(&SessionSettings::tree().with_linking_case(LinkingCase::Insensitive));
    let a_path = ws.write_inventory(&node_a());
    let b_path = ws.path("inventory-B.yaml");
    ConfigStore::new().save(&b_path, b).expect("write yaml inventory");
    let rules_path = ws.write_rules(&rules());

    let settings = nodesync_meta::load_settings(&settings_path).expect("settings load");
    let inventories = nodesync_meta::load_inventories(&[a_path, b_path]).expect("inventories load");
    let rules = RuleSet::load(&rules_path).expect("rules load");

    let mut session = ComparisonSession::new(settings, ["A", "B"]);
    for inventory in inventories {
        session.add_inventory(inventory).expect("expected inventory");
    }
    assert_eq!(session.state(), SessionState::Ready);

    let outcome = session.run(&rules, store).expect("session runs");
    let removed = outcome.report.items.iter().map(|i| i.removed.len()).sum();
    (outcome.comparison.items.len(), outcome.report.accepted_count(), removed)
}

#[test]
fn test_pipeline_plans_actions_from_files() {
    let ws = TestWorkspace::new();
    let store = InMemoryActionStore::new();

    let (items, accepted, removed) = run_from_disk(&ws, &node_b("v1", T0, false), &store);

    // Report.txt links with report.txt case-insensitively
    assert_eq!(items, 2);
    assert_eq!(accepted, 2);
    assert_eq!(removed, 0);

    let mut keys: Vec<String> = store
        .all()
        .iter()
        .map(|a| a.path_identity.linking_key.clone())
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["/docs/report.txt".to_string(), "/photos/cat.jpg".to_string()]);
}

#[test]
fn test_store_round_trip_and_rerun_replaces_rule_actions() {
    let ws = TestWorkspace::new();
    let store = InMemoryActionStore::new();
    run_from_disk(&ws, &node_b("v1", T0, false), &store);

    let store_path = ws.path("actions.yaml");
    store.save(&store_path).expect("store saves");
    let reloaded = InMemoryActionStore::load(&store_path).expect("store loads");
    assert_eq!(reloaded.all(), store.all());

    // B caught up: every rule action is withdrawn and none is re-created
    let (_, accepted, removed) = run_from_disk(&ws, &node_b("v2", T0 + 100, true), &reloaded);
    assert_eq!(accepted, 0);
    assert_eq!(removed, 2);
    assert!(reloaded.is_empty());
}

#[test]
fn test_manual_actions_survive_and_block_rules() {
    let ws = TestWorkspace::new();
    let settings = SessionSettings::tree();
    let report = PathIdentity::new(FileSystemType::File, &RelativePath::new("/docs/report.txt"), &settings);
    let hold = AtomicAction::manual(ActionOperator::DoNothing, None, None, &report);
    let store = InMemoryActionStore::with_actions(vec![hold.clone()]);

    let (_, accepted, removed) = run_from_disk(&ws, &node_b("v1", T0, false), &store);
    assert_eq!(accepted, 1);
    assert_eq!(removed, 0);

    let kept = store.get_atomic_actions(&report);
    assert_eq!(kept, vec![hold]);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_rejections_carry_reason() {
    let settings = SessionSettings::tree();
    let report = PathIdentity::new(FileSystemType::File, &RelativePath::new("/docs/report.txt"), &settings);
    let store = InMemoryActionStore::with_actions(vec![AtomicAction::manual(
        ActionOperator::DoNothing,
        None,
        None,
        &report,
    )]);

    let rules = rules();
    let inventories = vec![node_a(), node_b("v1", T0, false)];
    let mut session = ComparisonSession::new(settings, ["A", "B"]);
    for inventory in inventories {
        session.add_inventory(inventory).expect("expected inventory");
    }
    let outcome = session.run(&rules, &store).expect("session runs");

    let reasons: Vec<Option<FailureReason>> = outcome
        .report
        .rejected()
        .map(|(_, result)| result.failure_reason)
        .collect();
    assert_eq!(reasons, vec![Some(FailureReason::DoNothingConflict)]);
}
