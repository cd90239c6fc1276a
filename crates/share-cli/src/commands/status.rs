//! status and audit: read-only views over the tracked tree

use std::path::{Path, PathBuf};

use colored::Colorize;
use share_core::{RootConfig, StatusAggregator, StatusReport, SyncClassification, SyncEngine};

use crate::error::Result;
use crate::render::{self, Printer};

/// Listing cap for the large buckets; the drift buckets always print
/// in full since they are the ones that call for action.
const BUCKET_CAP: usize = 5;

pub fn run_status(
    engine: &SyncEngine,
    base: &Path,
    printer: &Printer,
    paths: &[PathBuf],
    json: bool,
) -> Result<i32> {
    let report = classify(engine, base, paths)?;
    if json {
        let payload = status_json(engine.config(), &report);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(report_exit(&report));
    }

    let config = engine.config();
    printer.info(format!(
        "Shared directory: {}",
        config.shared_root().display().to_string().cyan()
    ));
    printer.info(format!("Local root: {}", config.local_root().display()));
    printer.info(format!("Total files tracked: {}", report.total));
    printer.blank();

    if report.total == 0 {
        printer.info("No files tracked");
    } else {
        use SyncClassification as C;
        bucket(
            printer,
            &report,
            C::InSync,
            format!("{} Synced", render::OK.green().bold()),
            Some(BUCKET_CAP),
        );
        bucket(
            printer,
            &report,
            C::LocalNewer,
            format!("{} Need push (local newer)", render::WARN.yellow().bold()),
            None,
        );
        bucket(
            printer,
            &report,
            C::SharedNewer,
            format!("{} Need pull (shared newer)", render::WARN.yellow().bold()),
            None,
        );
        bucket(
            printer,
            &report,
            C::SharedOnly,
            format!("{} Only in shared", render::SKIP.yellow().bold()),
            Some(BUCKET_CAP),
        );
        bucket(
            printer,
            &report,
            C::LocalOnly,
            format!("{} Not shared (local only)", render::SKIP.yellow().bold()),
            Some(BUCKET_CAP),
        );
        bucket(
            printer,
            &report,
            C::MissingBoth,
            format!("{} Missing on both sides", render::MISSING.red().bold()),
            None,
        );
    }

    for failure in &report.failures {
        printer.failure(failure);
    }
    Ok(report_exit(&report))
}

/// Report only the paths that have drifted out of sync.
pub fn run_audit(
    engine: &SyncEngine,
    base: &Path,
    printer: &Printer,
    paths: &[PathBuf],
    json: bool,
) -> Result<i32> {
    let report = classify(engine, base, paths)?;
    if json {
        let payload = audit_json(&report);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(report_exit(&report));
    }

    let mut drifted = 0;
    for entry in report.drifted() {
        drifted += 1;
        printer.info(format!(
            "{} {} {}",
            render::WARN.yellow().bold(),
            entry.path.as_str().cyan(),
            format!("({})", entry.classification).dimmed()
        ));
    }
    if drifted == 0 {
        printer.info(format!(
            "{} No drift ({} files checked)",
            render::OK.green().bold(),
            report.total
        ));
    } else {
        printer.info(format!(
            "{} of {} files have drifted",
            drifted, report.total
        ));
    }

    for failure in &report.failures {
        printer.failure(failure);
    }
    Ok(report_exit(&report))
}

fn classify(engine: &SyncEngine, base: &Path, paths: &[PathBuf]) -> Result<StatusReport> {
    let aggregator = StatusAggregator::new(engine);
    if paths.is_empty() {
        Ok(aggregator.aggregate_tracked()?)
    } else {
        Ok(aggregator.aggregate(paths, base))
    }
}

fn report_exit(report: &StatusReport) -> i32 {
    if report.failures.is_empty() {
        0
    } else if report.entries.is_empty() {
        2
    } else {
        1
    }
}

/// One heading plus indented paths, capped where a long listing adds
/// nothing.
fn bucket(
    printer: &Printer,
    report: &StatusReport,
    classification: SyncClassification,
    heading: String,
    cap: Option<usize>,
) {
    let paths: Vec<&str> = report
        .entries
        .iter()
        .filter(|entry| entry.classification == classification)
        .map(|entry| entry.path.as_str())
        .collect();
    if paths.is_empty() {
        return;
    }

    printer.info(format!("{heading}: {} files", paths.len()));
    let shown = cap.unwrap_or(paths.len());
    for path in paths.iter().take(shown) {
        printer.info(format!("  {path}"));
    }
    if paths.len() > shown {
        printer.info(format!("  ... and {} more", paths.len() - shown));
    }
    printer.blank();
}

fn status_json(config: &RootConfig, report: &StatusReport) -> serde_json::Value {
    serde_json::json!({
        "command": "status",
        "shared_root": config.shared_root(),
        "local_root": config.local_root(),
        "total": report.total,
        "counts": report.counts,
        "entries": report.entries.iter().map(entry_json).collect::<Vec<_>>(),
        "failures": report.failures,
    })
}

fn audit_json(report: &StatusReport) -> serde_json::Value {
    serde_json::json!({
        "command": "audit",
        "total": report.total,
        "drifted": report.drifted().map(entry_json).collect::<Vec<_>>(),
        "failures": report.failures,
    })
}

fn entry_json(entry: &share_core::StatusEntry) -> serde_json::Value {
    serde_json::json!({
        "path": entry.path.as_str(),
        "classification": entry.classification,
    })
}
