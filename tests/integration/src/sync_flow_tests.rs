//! End-to-end test for the sync pipeline
//!
//! Exercises the complete flow: root configuration -> engine -> batch
//! execution -> status aggregation, over one local/shared pair.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use share_core::{
    Command, ConfigOverrides, RootConfig, RunOptions, StatusAggregator, SyncClassification,
    SyncEngine,
};
use share_test_utils::TestRoots;

fn engine_for(roots: &TestRoots) -> SyncEngine {
    let config = RootConfig::with_roots(
        roots.local_root(),
        roots.shared_root(),
        roots.ignore_file(),
    )
    .unwrap();
    SyncEngine::new(config).unwrap()
}

#[test]
fn test_full_share_lifecycle() {
    let roots = TestRoots::new();
    let engine = engine_for(&roots);
    let base = roots.local_root();
    let options = RunOptions::default();

    // Share a fresh file.
    roots.write_local("notes/todo.md", "buy milk");
    let report = engine.run(
        Command::Put,
        &[PathBuf::from("notes/todo.md")],
        &base,
        &options,
    );
    assert!(report.is_success());
    roots.assert_shared_content("notes/todo.md", "buy milk");

    // The pair now reads in sync.
    let status = StatusAggregator::new(&engine).aggregate_tracked().unwrap();
    assert_eq!(status.count(SyncClassification::InSync), 1);
    assert!(status.is_clean());

    // A local edit drifts the pair towards LocalNewer...
    roots.backdate_shared("notes/todo.md", 3_600);
    roots.write_local("notes/todo.md", "buy milk and bread");
    let status = StatusAggregator::new(&engine).aggregate_tracked().unwrap();
    assert_eq!(status.count(SyncClassification::LocalNewer), 1);
    assert!(!status.is_clean());

    // ...which push reconciles.
    let report = engine.run_tracked(Command::Push, &options).unwrap();
    assert!(report.is_success());
    assert_eq!(report.mutations(), 1);
    roots.assert_shared_content("notes/todo.md", "buy milk and bread");

    // Retire the file from the shared side; the local copy stays.
    let report = engine.run(
        Command::Rm,
        &[PathBuf::from("notes/todo.md")],
        &base,
        &options,
    );
    assert!(report.is_success());
    roots.assert_shared_missing("notes/todo.md");
    roots.assert_local_content("notes/todo.md", "buy milk and bread");

    // Nothing tracked afterwards.
    let status = StatusAggregator::new(&engine).aggregate_tracked().unwrap();
    assert_eq!(status.total, 0);
}

#[test]
fn test_directory_sync_unions_both_sides() {
    let roots = TestRoots::new();
    let engine = engine_for(&roots);

    roots.write_local("project/local_only.txt", "l");
    roots.write_shared("project/shared_only.txt", "s");

    let report = engine.run(
        Command::Sync,
        &[PathBuf::from("project")],
        &roots.local_root(),
        &RunOptions::default(),
    );

    assert!(report.is_success());
    assert_eq!(report.entries.len(), 2);
    roots.assert_shared_content("project/local_only.txt", "l");
    roots.assert_local_content("project/shared_only.txt", "s");
}

#[test]
fn test_preview_reports_without_writing() {
    let roots = TestRoots::new();
    let engine = engine_for(&roots);

    roots.write_local("draft.txt", "wip");
    let report = engine.run(
        Command::Put,
        &[PathBuf::from("draft.txt")],
        &roots.local_root(),
        &RunOptions { preview: true },
    );

    assert!(report.preview);
    assert_eq!(report.mutations(), 1);
    assert!(report.entries.iter().all(|entry| !entry.applied));
    roots.assert_shared_missing("draft.txt");
}

#[test]
fn test_designator_files_wire_up_the_roots() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path();
    let local = home.join("work");
    let shared = home.join("dump");
    fs::create_dir_all(&local).unwrap();
    fs::create_dir_all(&shared).unwrap();
    fs::write(home.join(".sharepath"), local.to_string_lossy().as_bytes()).unwrap();
    fs::write(home.join(".shareroot"), shared.to_string_lossy().as_bytes()).unwrap();

    // Resolution reads the designators; no overrides supplied.
    let config = RootConfig::resolve_from(home, &ConfigOverrides::default()).unwrap();
    let engine = SyncEngine::new(config).unwrap();

    fs::write(local.join("hello.txt"), "hi").unwrap();
    let report = engine.run(
        Command::Put,
        &[PathBuf::from("hello.txt")],
        &local,
        &RunOptions::default(),
    );
    assert!(report.is_success());
    assert!(shared.join("hello.txt").exists());
}

#[test]
fn test_failures_are_collected_per_path_not_aborting_the_batch() {
    let roots = TestRoots::new();
    let engine = engine_for(&roots);

    roots.write_local("good.txt", "x");
    let report = engine.run(
        Command::Put,
        &[
            PathBuf::from("missing_one.txt"),
            PathBuf::from("good.txt"),
            PathBuf::from("missing_two.txt"),
        ],
        &roots.local_root(),
        &RunOptions::default(),
    );

    assert!(!report.is_success());
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.failures.len(), 2);
    roots.assert_shared_exists("good.txt");
}
