//! The commands that move files: put, push, get, pull, sync, and rm

use std::path::{Path, PathBuf};

use colored::Colorize;
use share_core::{
    Action, BatchEntry, BatchReport, Command, RootConfig, RunOptions, SyncClassification,
    SyncEngine,
};

use crate::commands::exit_code;
use crate::error::Result;
use crate::render::{self, Printer};

/// Run a file-moving command over explicit path arguments.
pub fn run_paths(
    engine: &SyncEngine,
    base: &Path,
    printer: &Printer,
    command: Command,
    paths: &[PathBuf],
    options: &RunOptions,
) -> Result<i32> {
    let report = engine.run(command, paths, base, options);
    render_batch(engine.config(), printer, &report, true);
    Ok(exit_code(&report))
}

/// Run a file-moving command over the whole tracked tree.
///
/// Per-path no-ops stay silent here; the closing tally stands in for
/// them.
pub fn run_tracked(
    engine: &SyncEngine,
    printer: &Printer,
    command: Command,
    options: &RunOptions,
) -> Result<i32> {
    let report = engine.run_tracked(command, options)?;
    render_batch(engine.config(), printer, &report, false);
    tally(printer, &report);
    Ok(exit_code(&report))
}

/// Sync the subtree the user is standing in, from either root.
pub fn run_auto(
    engine: &SyncEngine,
    cwd: &Path,
    printer: &Printer,
    options: &RunOptions,
) -> Result<i32> {
    let target = engine.auto_target(cwd)?;
    let report = engine.run_rel(Command::Sync, &target, options)?;
    render_batch(engine.config(), printer, &report, false);
    tally(printer, &report);
    Ok(exit_code(&report))
}

fn render_batch(config: &RootConfig, printer: &Printer, report: &BatchReport, show_noops: bool) {
    for entry in &report.entries {
        if let Some(line) = entry_line(config, report, entry, show_noops) {
            printer.info(line);
        }
    }
    printer.batch_failures(report);
}

/// Closing line for whole-tree runs: how many files moved, if any.
fn tally(printer: &Printer, report: &BatchReport) {
    let moved = report.mutations();
    if moved == 0 {
        printer.info(format!("{} Already up to date", render::OK.green().bold()));
    } else if report.preview {
        printer.info(format!(
            "{} Would {} {} files",
            render::HINT.blue().bold(),
            report.command,
            moved
        ));
    } else {
        printer.info(format!(
            "{} {} {} files",
            render::OK.green().bold(),
            past_tense(report.command),
            moved
        ));
    }
}

fn past_tense(command: Command) -> &'static str {
    match command {
        Command::Put => "Put",
        Command::Push => "Pushed",
        Command::Get => "Got",
        Command::Pull => "Pulled",
        Command::Sync => "Synced",
        Command::Check => "Checked",
        Command::Rm => "Removed",
    }
}

/// One output line per decided path, phrased the way each command
/// talks about its files. `None` hides the line.
fn entry_line(
    config: &RootConfig,
    report: &BatchReport,
    entry: &BatchEntry,
    show_noops: bool,
) -> Option<String> {
    use SyncClassification as C;

    if entry.action == Action::NoOp && !show_noops {
        return None;
    }

    let rel = entry.path.as_str().cyan();
    let local = config.local_path(&entry.path);
    let shared = config.shared_path(&entry.path);
    let ok = render::OK.green().bold();
    let skip = render::SKIP.yellow().bold();

    // Past-tense marker for applied work, future phrasing for previews.
    let did = |past: &str, future: &str| {
        if report.preview {
            format!("{} Would {}", render::HINT.blue().bold(), future)
        } else {
            format!("{} {}", ok, past)
        }
    };

    let line = match (report.command, entry.action) {
        (Command::Put, Action::CopyLocalToShared) => format!(
            "{}: {} → {}",
            did("Put", "put"),
            local.display().to_string().cyan(),
            shared.display()
        ),
        (Command::Push, Action::CopyLocalToShared) => match entry.classification {
            C::LocalOnly => format!(
                "{}: {} → {} {}",
                did("Pushed", "push"),
                rel,
                shared.display(),
                "(new)".dimmed()
            ),
            _ => format!(
                "{}: {} {}",
                did("Pushed", "push"),
                rel,
                "(local newer)".dimmed()
            ),
        },
        (Command::Push, Action::NoOp) => format!(
            "{} Not pushed: {} {}",
            skip,
            rel,
            "(shared is newer or same)".dimmed()
        ),
        (Command::Get, Action::CopySharedToLocal) => format!(
            "{}: {} → {}",
            did("Got", "get"),
            shared.display().to_string().cyan(),
            local.display()
        ),
        (Command::Pull, Action::CopySharedToLocal) => match entry.classification {
            C::SharedOnly => format!(
                "{}: {} {}",
                did("Pulled", "pull"),
                rel,
                "(new locally)".dimmed()
            ),
            _ => format!(
                "{}: {} {}",
                did("Pulled", "pull"),
                rel,
                "(shared newer)".dimmed()
            ),
        },
        (Command::Pull, Action::NoOp) => format!(
            "{} Not pulled: {} {}",
            skip,
            rel,
            "(local is newer or same)".dimmed()
        ),
        (Command::Sync, Action::CopyLocalToShared) => {
            let detail = if entry.classification == C::LocalOnly {
                "(new)"
            } else {
                "(local newer)"
            };
            format!(
                "{}: {} → shared {}",
                did("Synced", "sync"),
                rel,
                detail.dimmed()
            )
        }
        (Command::Sync, Action::CopySharedToLocal) => {
            let detail = if entry.classification == C::SharedOnly {
                "(new)"
            } else {
                "(shared newer)"
            };
            format!(
                "{}: shared → {} {}",
                did("Synced", "sync"),
                rel,
                detail.dimmed()
            )
        }
        (Command::Sync, Action::NoOp) => format!("{} Already synced: {}", ok, rel),
        (Command::Rm, Action::DeleteShared) => format!(
            "{}: {}",
            did("Removed from shared", "remove from shared"),
            shared.display()
        ),
        (Command::Rm, Action::NoOp) => format!("{} Not in shared: {}", skip, rel),
        // Check renders through the check module, never here.
        _ => return None,
    };
    Some(line)
}
