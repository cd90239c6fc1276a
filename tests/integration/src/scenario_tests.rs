//! Multi-machine sync scenarios
//!
//! Two simulated machines, each with its own local root, share one
//! dump directory. These tests walk the workflows the tool exists
//! for: handoff, catch-up, conflict, and retirement.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use share_core::{Command, RootConfig, RunOptions, SyncClassification, SyncEngine};
use tempfile::TempDir;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Two machines wired to the same shared dump.
struct TwoMachines {
    temp: TempDir,
}

impl TwoMachines {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        for dir in ["machine_a", "machine_b", "dump"] {
            fs::create_dir(temp.path().join(dir)).unwrap();
        }
        Self { temp }
    }

    /// Build an engine for one machine. Each machine keeps its own
    /// ignore file, as real hosts would.
    fn engine(&self, machine: &str) -> SyncEngine {
        let config = RootConfig::with_roots(
            self.temp.path().join(machine),
            self.temp.path().join("dump"),
            self.temp.path().join(format!(".shareignore_{machine}")),
        )
        .unwrap();
        SyncEngine::new(config).unwrap()
    }

    fn a(&self) -> SyncEngine {
        self.engine("machine_a")
    }

    fn b(&self) -> SyncEngine {
        self.engine("machine_b")
    }

    fn write(&self, machine: &str, rel: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(machine).join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn read(&self, machine: &str, rel: &str) -> String {
        fs::read_to_string(self.temp.path().join(machine).join(rel)).unwrap()
    }

    fn exists(&self, machine: &str, rel: &str) -> bool {
        self.temp.path().join(machine).join(rel).exists()
    }

    fn backdate(&self, path: &Path, seconds: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(seconds))
            .unwrap();
    }
}

fn run(engine: &SyncEngine, command: Command, rel: &str) -> share_core::BatchReport {
    let base = engine.config().local_root().to_path_buf();
    engine.run(
        command,
        &[PathBuf::from(rel)],
        &base,
        &RunOptions::default(),
    )
}

// =============================================================================
// Handoff and Catch-up
// =============================================================================

#[test]
fn test_handoff_between_machines() {
    let rig = TwoMachines::new();

    // Machine A shares a document.
    rig.write("machine_a", "doc.md", "draft v1");
    assert!(run(&rig.a(), Command::Put, "doc.md").is_success());

    // Machine B retrieves it.
    assert!(run(&rig.b(), Command::Get, "doc.md").is_success());
    assert_eq!(rig.read("machine_b", "doc.md"), "draft v1");
}

#[test]
fn test_returning_machine_catches_up_with_syncall() {
    let rig = TwoMachines::new();

    // Yesterday: machine B shared two files.
    for rel in ["report.txt", "notes.txt"] {
        let path = rig.write("machine_b", rel, "stale");
        rig.backdate(&path, 7_200);
        assert!(run(&rig.b(), Command::Put, rel).is_success());
    }

    // Today: machine A rewrote both.
    for rel in ["report.txt", "notes.txt"] {
        rig.write("machine_a", rel, "fresh");
        assert!(run(&rig.a(), Command::Put, rel).is_success());
    }

    // B returns and catches up in one command.
    let report = rig
        .b()
        .run_tracked(Command::Sync, &RunOptions::default())
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.mutations(), 2);
    assert_eq!(rig.read("machine_b", "report.txt"), "fresh");
    assert_eq!(rig.read("machine_b", "notes.txt"), "fresh");
}

#[test]
fn test_check_classifications_track_the_workflow() {
    let rig = TwoMachines::new();

    rig.write("machine_a", "story.md", "v1");
    let report = run(&rig.a(), Command::Check, "story.md");
    assert_eq!(
        report.entries[0].classification,
        SyncClassification::LocalOnly
    );

    run(&rig.a(), Command::Put, "story.md");
    let report = run(&rig.a(), Command::Check, "story.md");
    assert_eq!(report.entries[0].classification, SyncClassification::InSync);

    // B has never seen the file; for it the pair is shared-only.
    let report = run(&rig.b(), Command::Check, "story.md");
    assert_eq!(
        report.entries[0].classification,
        SyncClassification::SharedOnly
    );
}

// =============================================================================
// Conflicts
// =============================================================================

#[test]
fn test_last_writer_wins_on_conflict() {
    let rig = TwoMachines::new();

    // A's edit is an hour older than B's.
    let a_path = rig.write("machine_a", "plan.md", "from A");
    rig.backdate(&a_path, 3_600);
    assert!(run(&rig.a(), Command::Put, "plan.md").is_success());

    rig.write("machine_b", "plan.md", "from B");
    let report = run(&rig.b(), Command::Push, "plan.md");
    assert!(report.is_success());
    assert_eq!(report.mutations(), 1);

    // A syncs and receives B's version: the newer edit wins.
    let report = run(&rig.a(), Command::Sync, "plan.md");
    assert!(report.is_success());
    assert_eq!(rig.read("machine_a", "plan.md"), "from B");
}

#[test]
fn test_push_does_not_clobber_a_newer_shared_copy() {
    let rig = TwoMachines::new();

    // B published the latest version.
    rig.write("machine_b", "doc.txt", "newer");
    assert!(run(&rig.b(), Command::Put, "doc.txt").is_success());

    // A still holds an older draft and tries to push it.
    let a_path = rig.write("machine_a", "doc.txt", "older");
    rig.backdate(&a_path, 3_600);
    let report = run(&rig.a(), Command::Push, "doc.txt");

    assert!(report.is_success());
    assert_eq!(report.mutations(), 0);

    // The dump still holds B's version.
    run(&rig.a(), Command::Get, "doc.txt");
    assert_eq!(rig.read("machine_a", "doc.txt"), "newer");
}

// =============================================================================
// Retirement and Hygiene
// =============================================================================

#[test]
fn test_rm_retires_a_file_without_touching_either_local() {
    let rig = TwoMachines::new();

    rig.write("machine_a", "secret.txt", "x");
    run(&rig.a(), Command::Put, "secret.txt");
    run(&rig.b(), Command::Get, "secret.txt");

    // A retires it from the dump.
    assert!(run(&rig.a(), Command::Rm, "secret.txt").is_success());

    // Neither machine loses its local copy, and pull has nothing to do.
    assert!(rig.exists("machine_a", "secret.txt"));
    assert!(rig.exists("machine_b", "secret.txt"));
    let report = run(&rig.b(), Command::Pull, "secret.txt");
    assert!(report.is_success());
    assert_eq!(report.mutations(), 0);
}

#[test]
fn test_ignored_files_stay_out_of_the_dump() {
    let rig = TwoMachines::new();
    fs::write(rig.temp.path().join(".shareignore_machine_a"), "*.log\n").unwrap();

    rig.write("machine_a", "app/readme.md", "keep");
    rig.write("machine_a", "app/debug.log", "noise");

    let report = run(&rig.a(), Command::Put, "app");
    assert!(report.is_success());
    assert_eq!(report.entries.len(), 1);
    assert!(rig.temp.path().join("dump/app/readme.md").exists());
    assert!(!rig.temp.path().join("dump/app/debug.log").exists());
}

#[test]
fn test_first_put_creates_the_dump_tree() {
    let rig = TwoMachines::new();
    // Start from a dump path that does not exist yet.
    fs::remove_dir(rig.temp.path().join("dump")).unwrap();

    rig.write("machine_a", "deep/nested/file.txt", "x");
    let report = run(&rig.a(), Command::Put, "deep/nested/file.txt");

    assert!(report.is_success());
    assert!(rig.temp.path().join("dump/deep/nested/file.txt").exists());
}
