//! Terminal rendering helpers shared by the command modules

use std::time::SystemTime;

use colored::Colorize;
use share_core::{BatchFailure, BatchReport};

/// Completed copy or clean state.
pub const OK: &str = "✓";
/// One side is ahead and a copy is pending.
pub const WARN: &str = "⚠";
/// Nothing to do for this path.
pub const SKIP: &str = "⊘";
/// The path exists on neither side.
pub const MISSING: &str = "✗";
/// Suggested follow-up command.
pub const HINT: &str = "→";

/// Gates output volume by the `-q` count.
///
/// One `-q` silences informational lines, a second also drops per-path
/// error lines. Fatal configuration errors bypass the printer and are
/// reported by `main` directly.
pub struct Printer {
    quiet: u8,
}

impl Printer {
    pub fn new(quiet: u8) -> Self {
        Self { quiet }
    }

    /// Print an informational line to stdout.
    pub fn info(&self, message: impl AsRef<str>) {
        if self.quiet == 0 {
            println!("{}", message.as_ref());
        }
    }

    /// Print a blank spacer line.
    pub fn blank(&self) {
        if self.quiet == 0 {
            println!();
        }
    }

    /// Report one failed path from a batch to stderr.
    pub fn failure(&self, failure: &BatchFailure) {
        if self.quiet < 2 {
            eprintln!("{} {}", MISSING.red().bold(), failure.message);
        }
    }

    /// Print the failure lines and the closing tally of a batch.
    pub fn batch_failures(&self, report: &BatchReport) {
        for failure in &report.failures {
            self.failure(failure);
        }
        if !report.failures.is_empty() {
            self.info(format!(
                "{} '{}' completed with {} errors",
                WARN.yellow().bold(),
                report.command,
                report.failures.len()
            ));
        }
    }
}

/// Render a modification time as a coarse relative age, e.g. `3m ago`.
///
/// Timestamps in the future clamp to `0s ago` rather than failing;
/// clock skew between machines writing to the shared tree makes them
/// a normal occurrence.
pub fn relative_age(mtime: SystemTime) -> String {
    let seconds = SystemTime::now()
        .duration_since(mtime)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    if seconds < 60 {
        format!("{seconds}s ago")
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}
