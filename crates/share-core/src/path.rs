//! Root-relative path handling and containment enforcement

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::config::RootConfig;
use crate::{Error, Result};

/// A file location expressed relative to a root, identical on both
/// sides of a sync pair.
///
/// Always uses forward slashes internally, never starts with a
/// separator, and contains no `.` or `..` segments. The empty path
/// denotes the root itself and is only meaningful as an expansion
/// origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl RelativePath {
    /// The root itself.
    pub fn root() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Validate and normalize a relative path string.
    ///
    /// Backslashes are normalized to forward slashes, empty and `.`
    /// segments collapse away. Leading separators and `..` segments are
    /// rejected.
    pub fn new(path: impl AsRef<str>) -> Result<Self> {
        let raw = path.as_ref();
        let normalized = raw.replace('\\', "/");
        if normalized.starts_with('/') {
            return Err(Error::InvalidPath {
                path: raw.to_string(),
                reason: "must not start with a separator".to_string(),
            });
        }
        let mut parts: Vec<&str> = Vec::new();
        for part in normalized.split('/') {
            match part {
                "" | "." => continue,
                ".." => {
                    return Err(Error::InvalidPath {
                        path: raw.to_string(),
                        reason: "`..` segments are not allowed".to_string(),
                    });
                }
                _ => parts.push(part),
            }
        }
        Ok(Self {
            inner: parts.join("/"),
        })
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether this denotes a root itself.
    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get the parent path, if any.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.inner.rfind('/') {
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => Some(Self::root()),
        }
    }

    /// Get the final name component.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.inner.rsplit('/').next()
        }
    }

    /// Absolute location of this path under `root`.
    pub fn resolve_in(&self, root: &Path) -> PathBuf {
        if self.is_root() {
            root.to_path_buf()
        } else {
            root.join(&self.inner)
        }
    }
}

impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.inner)
        }
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

/// Maps arbitrary command arguments to root-relative paths, enforcing
/// that every argument lies within the local root.
pub struct PathResolver<'a> {
    config: &'a RootConfig,
    /// Directory relative inputs are resolved against.
    base: PathBuf,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a RootConfig, base: impl Into<PathBuf>) -> Self {
        Self {
            config,
            base: base.into(),
        }
    }

    /// Resolve one command argument to a RelativePath.
    ///
    /// The input is absolutized against the resolver base, normalized,
    /// and canonicalized through its deepest existing ancestor so that
    /// a symlink pointing outside the local root is caught even when
    /// the leaf does not exist yet. `require_local` is set by commands
    /// that read the local side as their copy source.
    pub fn resolve(&self, input: &Path, require_local: bool) -> Result<RelativePath> {
        let absolute = if input.is_absolute() {
            input.to_path_buf()
        } else {
            self.base.join(input)
        };
        let resolved = canonicalize_lenient(&normalize_lexically(&absolute))?;

        let rel = resolved
            .strip_prefix(self.config.local_root())
            .map_err(|_| Error::OutsideRoot {
                path: absolute.clone(),
                root: self.config.local_root().to_path_buf(),
            })?;

        if require_local && !resolved.exists() {
            return Err(Error::NotFound { path: absolute });
        }

        RelativePath::new(rel.to_string_lossy())
    }

    /// Map the resolver base (the working directory for `auto`) into
    /// whichever root contains it.
    pub fn locate_base(&self) -> Result<RelativePath> {
        let resolved = canonicalize_lenient(&normalize_lexically(&self.base))?;
        for root in [self.config.local_root(), self.config.shared_root()] {
            if let Ok(rel) = resolved.strip_prefix(root) {
                return RelativePath::new(rel.to_string_lossy());
            }
        }
        Err(Error::OutsideRoots {
            path: self.base.clone(),
        })
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// Popping past the filesystem root saturates there, which the
/// containment check then rejects.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Canonicalize the deepest existing ancestor and reattach the
/// remaining (not yet existing) components.
fn canonicalize_lenient(path: &Path) -> Result<PathBuf> {
    if let Ok(resolved) = dunce::canonicalize(path) {
        return Ok(resolved);
    }
    for ancestor in path.ancestors().skip(1) {
        if let Ok(resolved) = dunce::canonicalize(ancestor) {
            let remainder = path
                .strip_prefix(ancestor)
                .map_err(|_| Error::io(path, std::io::Error::other("path has no valid prefix")))?;
            return Ok(resolved.join(remainder));
        }
    }
    Err(Error::io(
        path,
        std::io::Error::new(std::io::ErrorKind::NotFound, "no existing ancestor"),
    ))
}
