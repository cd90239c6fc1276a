//! Live file-state sampling and sync classification

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use serde::Serialize;

/// Timestamp slack absorbing filesystem resolution differences (FAT32
/// stores modification times in two-second steps).
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(1);

/// Metadata for one side of a file pair, sampled at decision time.
/// Never cached: every command re-reads the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FileState {
    pub exists: bool,
    pub mtime: Option<SystemTime>,
    pub size: Option<u64>,
}

impl FileState {
    /// Sample the regular-file state at `path`.
    ///
    /// Directories, dangling symlinks, and special files sample as
    /// absent: only regular files take part in synchronization.
    pub fn sample(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Self {
                exists: true,
                mtime: meta.modified().ok(),
                size: Some(meta.len()),
            },
            _ => Self::absent(),
        }
    }

    pub fn absent() -> Self {
        Self {
            exists: false,
            mtime: None,
            size: None,
        }
    }
}

/// Whether `a` is more than the tolerance ahead of `b`.
fn newer_than(a: SystemTime, b: SystemTime) -> bool {
    match a.duration_since(b) {
        Ok(diff) => diff > MTIME_TOLERANCE,
        Err(_) => false,
    }
}

/// Sync state of one local/shared file pair, derived purely from one
/// sampled FileState pair and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncClassification {
    InSync,
    LocalNewer,
    SharedNewer,
    LocalOnly,
    SharedOnly,
    MissingBoth,
}

impl SyncClassification {
    /// Classify one sampled pair. Missing or unreadable mtimes compare
    /// as equal, so the pair falls back to `InSync`.
    pub fn classify(local: &FileState, shared: &FileState) -> Self {
        match (local.exists, shared.exists) {
            (false, false) => Self::MissingBoth,
            (true, false) => Self::LocalOnly,
            (false, true) => Self::SharedOnly,
            (true, true) => match (local.mtime, shared.mtime) {
                (Some(l), Some(s)) if newer_than(l, s) => Self::LocalNewer,
                (Some(l), Some(s)) if newer_than(s, l) => Self::SharedNewer,
                _ => Self::InSync,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InSync => "in sync",
            Self::LocalNewer => "local newer",
            Self::SharedNewer => "shared newer",
            Self::LocalOnly => "only local",
            Self::SharedOnly => "only shared",
            Self::MissingBoth => "missing",
        }
    }
}

impl std::fmt::Display for SyncClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
