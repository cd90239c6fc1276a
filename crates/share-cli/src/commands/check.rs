//! check: report how files relate to their shared copies

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use colored::Colorize;
use share_core::{BatchEntry, BatchReport, Command, FileState, RootConfig, RunOptions, SyncEngine};

use crate::commands::exit_code;
use crate::error::Result;
use crate::render::{self, Printer};

pub fn run_check(
    engine: &SyncEngine,
    base: &Path,
    printer: &Printer,
    paths: &[PathBuf],
    json: bool,
) -> Result<i32> {
    let report = engine.run(Command::Check, paths, base, &RunOptions::default());
    if json {
        println!("{}", serde_json::to_string_pretty(&json_payload(engine.config(), &report))?);
    } else {
        let mut first = true;
        for entry in &report.entries {
            if !first {
                printer.blank();
            }
            first = false;
            render_entry(engine.config(), printer, entry);
        }
        printer.batch_failures(&report);
    }
    Ok(exit_code(&report))
}

/// One block per file: both paths, both ages, a status verdict, and
/// the command that would reconcile the pair.
fn render_entry(config: &RootConfig, printer: &Printer, entry: &BatchEntry) {
    use share_core::SyncClassification as C;

    let local = config.local_path(&entry.path);
    let shared = config.shared_path(&entry.path);
    printer.info(format!("File: {}", local.display().to_string().cyan()));
    printer.info(format!("Shared path: {}", shared.display()));
    printer.blank();

    if let Some(mtime) = entry.local.mtime {
        printer.info(format!("Local:  Modified {}", render::relative_age(mtime)));
    }
    if let Some(mtime) = entry.shared.mtime {
        printer.info(format!("Shared: Modified {}", render::relative_age(mtime)));
    }
    if entry.local.mtime.is_some() || entry.shared.mtime.is_some() {
        printer.blank();
    }

    let (status, advice) = match entry.classification {
        C::InSync => (format!("{} Synced", render::OK.green().bold()), None),
        C::LocalNewer => (
            format!("{} Local is newer", render::WARN.yellow().bold()),
            Some("Use 'share push' to update shared"),
        ),
        C::SharedNewer => (
            format!("{} Shared is newer", render::WARN.yellow().bold()),
            Some("Use 'share pull' to update local"),
        ),
        C::LocalOnly => (
            format!(
                "{} Not shared (only exists locally)",
                render::SKIP.yellow().bold()
            ),
            Some("Use 'share put' or 'share push' to share"),
        ),
        C::SharedOnly => (
            format!(
                "{} Only in shared (not in local)",
                render::SKIP.yellow().bold()
            ),
            Some("Use 'share get' or 'share pull' to retrieve"),
        ),
        C::MissingBoth => (
            format!(
                "{} Does not exist in either location",
                render::MISSING.red().bold()
            ),
            None,
        ),
    };
    printer.info(format!("Status: {status}"));
    if let Some(advice) = advice {
        printer.info(format!(
            "{} {}",
            render::HINT.blue().bold(),
            advice.dimmed()
        ));
    }
}

fn json_payload(config: &RootConfig, report: &BatchReport) -> serde_json::Value {
    let entries: Vec<_> = report
        .entries
        .iter()
        .map(|entry| {
            serde_json::json!({
                "path": entry.path.as_str(),
                "classification": entry.classification,
                "local": side_json(&entry.local, config.local_path(&entry.path)),
                "shared": side_json(&entry.shared, config.shared_path(&entry.path)),
            })
        })
        .collect();
    serde_json::json!({
        "command": "check",
        "entries": entries,
        "failures": report.failures,
    })
}

fn side_json(state: &FileState, path: PathBuf) -> serde_json::Value {
    serde_json::json!({
        "path": path,
        "exists": state.exists,
        "modified": state.mtime.map(|t| DateTime::<Local>::from(t).to_rfc3339()),
        "size": state.size,
    })
}

#[cfg(test)]
mod tests {
    use share_test_utils::TestRoots;

    use super::*;

    fn engine_for(roots: &TestRoots) -> SyncEngine {
        let config = share_core::RootConfig::with_roots(
            roots.local_root(),
            roots.shared_root(),
            roots.ignore_file(),
        )
        .unwrap();
        SyncEngine::new(config).unwrap()
    }

    #[test]
    fn test_check_is_report_only_and_exits_zero() {
        let roots = TestRoots::new();
        roots.write_local("wip.txt", "only here");
        let engine = engine_for(&roots);

        let code = run_check(
            &engine,
            &roots.local_root(),
            &Printer::new(2),
            &[PathBuf::from("wip.txt")],
            false,
        )
        .unwrap();

        assert_eq!(code, 0);
        roots.assert_shared_missing("wip.txt");
    }

    #[test]
    fn test_check_on_a_missing_pair_still_exits_zero() {
        let roots = TestRoots::new();
        let engine = engine_for(&roots);

        let code = run_check(
            &engine,
            &roots.local_root(),
            &Printer::new(2),
            &[PathBuf::from("nowhere.txt")],
            false,
        )
        .unwrap();

        assert_eq!(code, 0);
    }

    #[test]
    fn test_json_payload_names_both_sides() {
        let roots = TestRoots::new();
        roots.write_local("a.txt", "x");
        roots.mirror_to_shared("a.txt");
        let engine = engine_for(&roots);

        let report = engine.run(
            Command::Check,
            &[PathBuf::from("a.txt")],
            &roots.local_root(),
            &RunOptions::default(),
        );
        let payload = json_payload(engine.config(), &report);

        assert_eq!(payload["command"], "check");
        assert_eq!(payload["entries"][0]["path"], "a.txt");
        assert_eq!(payload["entries"][0]["classification"], "in_sync");
        assert_eq!(payload["entries"][0]["local"]["exists"], true);
        assert!(payload["entries"][0]["shared"]["modified"].is_string());
    }
}
