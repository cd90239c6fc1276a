//! Tree expansion across the two roots

use std::collections::BTreeSet;
use std::path::Path;

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::config::RootConfig;
use crate::ignore::IgnoreMatcher;
use crate::path::RelativePath;
use crate::{Error, Result};

/// Name prefixes conventionally marking private files (dotfiles, editor
/// backups, temp files); skipped during implicit traversal.
pub const PRIVATE_PREFIXES: [char; 4] = ['.', '_', '~', '#'];

fn looks_private(name: &str) -> bool {
    PRIVATE_PREFIXES.iter().any(|prefix| name.starts_with(*prefix))
}

/// Expands directory arguments into ordered file lists and enumerates
/// the tracked tree.
///
/// Directory expansion walks **both** subtrees and yields the union of
/// their regular files, so a single pass sees files that exist on only
/// one side. Enumeration of the tracked tree walks the shared side
/// only: tracked means present under the shared root.
pub struct TreeWalker<'a> {
    config: &'a RootConfig,
    matcher: &'a IgnoreMatcher,
}

impl<'a> TreeWalker<'a> {
    pub fn new(config: &'a RootConfig, matcher: &'a IgnoreMatcher) -> Self {
        Self { config, matcher }
    }

    /// Expand one resolved argument into relative file paths,
    /// lexicographically ordered.
    ///
    /// A path that is a regular file on either side (or absent on both)
    /// yields exactly itself: ignore rules and private-name skipping
    /// apply to implicit directory expansion, never to explicit user
    /// selection.
    pub fn expand(&self, rel: &RelativePath) -> Result<Vec<RelativePath>> {
        let local = self.config.local_path(rel);
        let shared = self.config.shared_path(rel);
        if local.is_file() || (!local.is_dir() && !shared.is_dir()) {
            return Ok(vec![rel.clone()]);
        }

        let mut files = BTreeSet::new();
        if local.is_dir() {
            self.walk_side(&local, self.config.local_root(), &mut files)?;
        }
        if shared.is_dir() {
            self.walk_side(&shared, self.config.shared_root(), &mut files)?;
        }
        Ok(files.into_iter().collect())
    }

    /// Every tracked file: the shared tree, root-relative and ordered.
    pub fn tracked(&self) -> Result<Vec<RelativePath>> {
        let mut files = BTreeSet::new();
        let shared_root = self.config.shared_root();
        // A shared root that does not exist yet is an empty tree, not
        // an error: read-only commands must work before the first put.
        if shared_root.is_dir() {
            self.walk_side(shared_root, shared_root, &mut files)?;
        }
        Ok(files.into_iter().collect())
    }

    fn walk_side(
        &self,
        start: &Path,
        root: &Path,
        out: &mut BTreeSet<RelativePath>,
    ) -> Result<()> {
        let other_root = if root == self.config.local_root() {
            self.config.shared_root()
        } else {
            self.config.local_root()
        };

        let walker = WalkDir::new(start)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| self.descend(entry, root, other_root));

        for entry in walker {
            let entry = entry.map_err(walk_error)?;
            if entry.file_type().is_dir() {
                continue;
            }
            let rel = match entry.path().strip_prefix(root) {
                Ok(stripped) => RelativePath::new(stripped.to_string_lossy())?,
                Err(_) => continue,
            };
            if entry.file_type().is_symlink() {
                if let Some(rel) = self.resolve_symlink(entry.path(), root, rel) {
                    out.insert(rel);
                }
                continue;
            }
            out.insert(rel);
        }
        Ok(())
    }

    /// Descent predicate: the walk start is always entered, everything
    /// beneath it is subject to private-name skipping, ignore rules,
    /// and pruning of the other root when the trees are nested.
    fn descend(&self, entry: &DirEntry, root: &Path, other_root: &Path) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        if entry.path() == other_root {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if looks_private(&name) {
            warn!(path = %entry.path().display(), "name looks private; skipping");
            return false;
        }
        let Ok(stripped) = entry.path().strip_prefix(root) else {
            return false;
        };
        let Ok(rel) = RelativePath::new(stripped.to_string_lossy()) else {
            return false;
        };
        !self.matcher.matches(&rel, entry.file_type().is_dir())
    }

    /// Symlinked files are yielded when their target resolves inside
    /// the same root, skipped with a warning otherwise. Symlinked
    /// directories are never traversed.
    fn resolve_symlink(
        &self,
        path: &Path,
        root: &Path,
        rel: RelativePath,
    ) -> Option<RelativePath> {
        match dunce::canonicalize(path) {
            Ok(target) if !target.starts_with(root) => {
                warn!(
                    path = %path.display(),
                    target = %target.display(),
                    "symlink leaves the root; skipping"
                );
                None
            }
            Ok(target) if target.is_file() => Some(rel),
            Ok(_) => None,
            Err(_) => {
                warn!(path = %path.display(), "dangling symlink; skipping");
                None
            }
        }
    }
}

fn walk_error(err: walkdir::Error) -> Error {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    match err.into_io_error() {
        Some(io) => Error::io(path, io),
        None => Error::io(path, std::io::Error::other("walk cycle detected")),
    }
}
