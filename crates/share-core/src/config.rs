//! Root configuration resolved once per invocation
//!
//! The two roots come from plain-text designator files under the home
//! directory, each holding a single absolute path. Callers may override
//! any of them (CLI flags, environment). No component re-reads
//! configuration after construction.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::path::RelativePath;
use crate::{Error, Result};

/// Designator file naming the local root (mandatory).
pub const LOCAL_ROOT_FILE: &str = ".sharepath";
/// Designator file naming the shared root (optional).
pub const SHARED_ROOT_FILE: &str = ".shareroot";
/// User-level ignore pattern file.
pub const IGNORE_FILE: &str = ".shareignore";
/// Shared root used when no designator exists, under the home directory.
pub const SHARED_ROOT_DEFAULT: &str = "Shared/dump";

/// Caller-supplied replacements for the designator files.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub local_root: Option<PathBuf>,
    pub shared_root: Option<PathBuf>,
    pub ignore_file: Option<PathBuf>,
}

/// The two filesystem roots, validated and held immutably for the
/// duration of one invocation.
#[derive(Debug, Clone)]
pub struct RootConfig {
    local_root: PathBuf,
    shared_root: PathBuf,
    ignore_file: PathBuf,
}

impl RootConfig {
    /// Resolve from the user's home directory designator files.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::HomeNotFound)?;
        Self::resolve_from(&home, overrides)
    }

    /// Resolve against an explicit home directory.
    pub fn resolve_from(home: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        let local_root = match &overrides.local_root {
            Some(path) => path.clone(),
            None => {
                let designator = home.join(LOCAL_ROOT_FILE);
                read_designator(&designator, home)?.ok_or(Error::LocalRootUnset { designator })?
            }
        };
        let shared_root = match &overrides.shared_root {
            Some(path) => path.clone(),
            None => read_designator(&home.join(SHARED_ROOT_FILE), home)?
                .unwrap_or_else(|| home.join(SHARED_ROOT_DEFAULT)),
        };
        let ignore_file = overrides
            .ignore_file
            .clone()
            .unwrap_or_else(|| home.join(IGNORE_FILE));
        Self::with_roots(local_root, shared_root, ignore_file)
    }

    /// Validate explicit roots, bypassing the designator files.
    ///
    /// The local root must exist and be a directory. The shared root
    /// may be absent (the first transfer creates it) but must be a
    /// directory when present, and must be an absolute path.
    pub fn with_roots(
        local_root: impl Into<PathBuf>,
        shared_root: impl Into<PathBuf>,
        ignore_file: impl Into<PathBuf>,
    ) -> Result<Self> {
        let local_root = local_root.into();
        if !local_root.is_dir() {
            let reason = if local_root.exists() {
                "not a directory"
            } else {
                "does not exist"
            };
            return Err(Error::InvalidRoot {
                role: "local",
                path: local_root,
                reason: reason.to_string(),
            });
        }
        let local_root = dunce::canonicalize(&local_root).map_err(|e| Error::io(&local_root, e))?;

        let shared_root = shared_root.into();
        let shared_root = if shared_root.is_dir() {
            dunce::canonicalize(&shared_root).map_err(|e| Error::io(&shared_root, e))?
        } else if shared_root.exists() {
            return Err(Error::InvalidRoot {
                role: "shared",
                path: shared_root,
                reason: "not a directory".to_string(),
            });
        } else if shared_root.is_absolute() {
            shared_root
        } else {
            return Err(Error::InvalidRoot {
                role: "shared",
                path: shared_root,
                reason: "must be an absolute path".to_string(),
            });
        };

        if local_root == shared_root {
            return Err(Error::InvalidRoot {
                role: "shared",
                path: shared_root,
                reason: "local and shared roots must differ".to_string(),
            });
        }

        debug!(
            local = %local_root.display(),
            shared = %shared_root.display(),
            "resolved roots"
        );
        Ok(Self {
            local_root,
            shared_root,
            ignore_file: ignore_file.into(),
        })
    }

    /// The directory tree files are shared from.
    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    /// The directory tree files are synchronized into.
    pub fn shared_root(&self) -> &Path {
        &self.shared_root
    }

    /// Location of the user-level ignore pattern file.
    pub fn ignore_file(&self) -> &Path {
        &self.ignore_file
    }

    /// Absolute local location of a relative path.
    pub fn local_path(&self, rel: &RelativePath) -> PathBuf {
        rel.resolve_in(&self.local_root)
    }

    /// Absolute shared location of a relative path.
    pub fn shared_path(&self, rel: &RelativePath) -> PathBuf {
        rel.resolve_in(&self.shared_root)
    }
}

/// Read a single-path designator file. Absent files and blank content
/// resolve to `None`; a leading `~/` expands to the home directory.
fn read_designator(path: &Path, home: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let line = text.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(expand_home(line, home)))
}

fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    }
}
