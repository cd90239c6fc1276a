//! The synchronization decision engine
//!
//! Maps one (relative path, command) pair to a classification and an
//! action, and orchestrates multi-path batches. The policy table:
//!
//! | Command | LocalOnly | SharedOnly | LocalNewer | SharedNewer | InSync | MissingBoth |
//! |---------|-----------|------------|------------|-------------|--------|-------------|
//! | put     | copy L→S  | error      | copy L→S   | copy L→S    | copy L→S | error     |
//! | push    | copy L→S  | no-op      | copy L→S   | no-op       | no-op  | error       |
//! | get     | error     | copy S→L   | copy S→L   | copy S→L    | copy S→L | error     |
//! | pull    | no-op     | copy S→L   | no-op      | copy S→L    | no-op  | error       |
//! | sync    | copy L→S  | copy S→L   | copy L→S   | copy S→L    | no-op  | error       |
//! | check   | report-only for every classification                                     |
//! | rm      | no-op     | delete     | delete     | delete      | delete | no-op       |

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::config::RootConfig;
use crate::ignore::IgnoreMatcher;
use crate::path::{PathResolver, RelativePath};
use crate::state::{FileState, SyncClassification};
use crate::walk::TreeWalker;
use crate::{Error, Result, transfer};

/// Commands the engine understands. The CLI maps user verbs onto
/// these: `audit` and `status` run as `Check`, the `*all` family runs
/// its base command over the tracked tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Put,
    Push,
    Get,
    Pull,
    Sync,
    Check,
    Rm,
}

impl Command {
    /// Commands that read the local side as their copy source must
    /// have an existing local path at resolution time.
    pub fn requires_local(&self) -> bool {
        matches!(self, Self::Put | Self::Push)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Put => "put",
            Self::Push => "push",
            Self::Get => "get",
            Self::Pull => "pull",
            Self::Sync => "sync",
            Self::Check => "check",
            Self::Rm => "rm",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// File operation decided for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CopyLocalToShared,
    CopySharedToLocal,
    DeleteShared,
    NoOp,
    ReportOnly,
}

impl Action {
    /// Whether executing this action writes to the filesystem.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CopyLocalToShared | Self::CopySharedToLocal | Self::DeleteShared
        )
    }
}

/// Outcome of the policy table for one path, with the states it was
/// derived from.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub path: RelativePath,
    pub classification: SyncClassification,
    pub action: Action,
    pub local: FileState,
    pub shared: FileState,
}

/// Options applying to a whole batch.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Compute and report decisions without executing them.
    pub preview: bool,
}

/// One decided path in a batch report.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub path: RelativePath,
    pub classification: SyncClassification,
    pub action: Action,
    /// False for previews and non-mutating actions.
    pub applied: bool,
    pub local: FileState,
    pub shared: FileState,
}

/// One failed argument or path in a batch report.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// The argument or relative path as the user typed or sees it.
    pub path: String,
    pub message: String,
}

/// Aggregated outcome of one multi-path command.
///
/// Per-argument and per-file errors never abort the batch; they are
/// collected here and the remaining paths proceed.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub command: Command,
    pub preview: bool,
    pub entries: Vec<BatchEntry>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    fn new(command: Command, preview: bool) -> Self {
        Self {
            command,
            preview,
            entries: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// A batch fails if any per-file error occurred, even when other
    /// paths succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether any file work happened (or would happen, previewing).
    pub fn mutations(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.action.is_mutation())
            .count()
    }

    fn fail(&mut self, path: impl Into<String>, error: &Error) {
        self.failures.push(BatchFailure {
            path: path.into(),
            message: error.to_string(),
        });
    }
}

/// Coordinates resolution, expansion, decision, and transfer for one
/// invocation.
pub struct SyncEngine {
    config: RootConfig,
    matcher: IgnoreMatcher,
}

impl SyncEngine {
    /// Build from resolved configuration, loading the ignore file.
    pub fn new(config: RootConfig) -> Result<Self> {
        let matcher = IgnoreMatcher::load(config.ignore_file())?;
        Ok(Self { config, matcher })
    }

    /// Build with an explicit matcher.
    pub fn with_matcher(config: RootConfig, matcher: IgnoreMatcher) -> Self {
        Self { config, matcher }
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    fn walker(&self) -> TreeWalker<'_> {
        TreeWalker::new(&self.config, &self.matcher)
    }

    /// Sample both sides of `rel` and decide the action for `command`.
    ///
    /// Policy cells marked as errors come back as `Err`; the batch
    /// layer records them per-file.
    pub fn decide(&self, rel: &RelativePath, command: Command) -> Result<Decision> {
        let local = FileState::sample(&self.config.local_path(rel));
        let shared = FileState::sample(&self.config.shared_path(rel));
        let classification = SyncClassification::classify(&local, &shared);
        let action = self.policy(command, classification, rel)?;
        debug!(
            path = %rel,
            command = %command,
            classification = %classification,
            action = ?action,
            "decided"
        );
        Ok(Decision {
            path: rel.clone(),
            classification,
            action,
            local,
            shared,
        })
    }

    fn policy(
        &self,
        command: Command,
        classification: SyncClassification,
        rel: &RelativePath,
    ) -> Result<Action> {
        use Action::*;
        use SyncClassification as C;

        let action = match command {
            Command::Check => ReportOnly,
            Command::Put => match classification {
                C::SharedOnly => {
                    // Refuse rather than delete the shared copy.
                    return Err(Error::NotFound {
                        path: self.config.local_path(rel),
                    });
                }
                C::MissingBoth => return Err(self.missing_both(rel)),
                _ => CopyLocalToShared,
            },
            Command::Push => match classification {
                C::LocalOnly | C::LocalNewer => CopyLocalToShared,
                C::MissingBoth => return Err(self.missing_both(rel)),
                C::SharedOnly | C::SharedNewer | C::InSync => NoOp,
            },
            Command::Get => match classification {
                C::LocalOnly => {
                    return Err(Error::NotShared {
                        path: rel.to_string(),
                    });
                }
                C::MissingBoth => return Err(self.missing_both(rel)),
                _ => CopySharedToLocal,
            },
            Command::Pull => match classification {
                C::SharedOnly | C::SharedNewer => CopySharedToLocal,
                C::MissingBoth => return Err(self.missing_both(rel)),
                C::LocalOnly | C::LocalNewer | C::InSync => NoOp,
            },
            Command::Sync => match classification {
                C::LocalOnly | C::LocalNewer => CopyLocalToShared,
                C::SharedOnly | C::SharedNewer => CopySharedToLocal,
                C::InSync => NoOp,
                C::MissingBoth => return Err(self.missing_both(rel)),
            },
            Command::Rm => match classification {
                C::LocalOnly | C::MissingBoth => NoOp,
                _ => DeleteShared,
            },
        };
        Ok(action)
    }

    fn missing_both(&self, rel: &RelativePath) -> Error {
        Error::MissingBoth {
            path: rel.to_string(),
        }
    }

    /// Run `command` over the given arguments (files or directories).
    /// Relative arguments resolve against `base`.
    pub fn run(
        &self,
        command: Command,
        inputs: &[PathBuf],
        base: &Path,
        options: &RunOptions,
    ) -> BatchReport {
        let resolver = PathResolver::new(&self.config, base);
        let walker = self.walker();
        let mut report = BatchReport::new(command, options.preview);

        for input in inputs {
            let rel = match resolver.resolve(input, command.requires_local()) {
                Ok(rel) => rel,
                Err(e) => {
                    report.fail(input.display().to_string(), &e);
                    continue;
                }
            };
            match walker.expand(&rel) {
                Ok(paths) => self.run_paths(command, &paths, options, &mut report),
                Err(e) => report.fail(rel.to_string(), &e),
            }
        }
        report
    }

    /// Run `command` over the full tracked tree.
    pub fn run_tracked(&self, command: Command, options: &RunOptions) -> Result<BatchReport> {
        let paths = self.walker().tracked()?;
        let mut report = BatchReport::new(command, options.preview);
        self.run_paths(command, &paths, options, &mut report);
        Ok(report)
    }

    /// Expand one already-resolved path and run `command` over it.
    pub fn run_rel(
        &self,
        command: Command,
        rel: &RelativePath,
        options: &RunOptions,
    ) -> Result<BatchReport> {
        let paths = self.walker().expand(rel)?;
        let mut report = BatchReport::new(command, options.preview);
        self.run_paths(command, &paths, options, &mut report);
        Ok(report)
    }

    fn run_paths(
        &self,
        command: Command,
        paths: &[RelativePath],
        options: &RunOptions,
        report: &mut BatchReport,
    ) {
        for rel in paths {
            let decision = match self.decide(rel, command) {
                Ok(decision) => decision,
                Err(e) => {
                    report.fail(rel.to_string(), &e);
                    continue;
                }
            };
            let applied = if options.preview || !decision.action.is_mutation() {
                false
            } else {
                match self.apply(&decision) {
                    Ok(()) => true,
                    Err(e) => {
                        report.fail(rel.to_string(), &e);
                        continue;
                    }
                }
            };
            report.entries.push(BatchEntry {
                path: decision.path,
                classification: decision.classification,
                action: decision.action,
                applied,
                local: decision.local,
                shared: decision.shared,
            });
        }
    }

    /// Execute one decided mutation.
    fn apply(&self, decision: &Decision) -> Result<()> {
        let local = self.config.local_path(&decision.path);
        let shared = self.config.shared_path(&decision.path);
        match decision.action {
            Action::CopyLocalToShared => transfer::copy_file(&local, &shared),
            Action::CopySharedToLocal => transfer::copy_file(&shared, &local),
            Action::DeleteShared => transfer::delete_file(&shared, self.config.shared_root()),
            Action::NoOp | Action::ReportOnly => Ok(()),
        }
    }

    /// Map `cwd` into whichever root contains it: the path set `auto`
    /// syncs.
    pub fn auto_target(&self, cwd: &Path) -> Result<RelativePath> {
        PathResolver::new(&self.config, cwd).locate_base()
    }
}
