//! Gitignore-style pattern matching for implicit traversal
//!
//! Patterns exclude paths from directory expansion only; explicitly
//! named arguments always bypass the matcher.

use std::fs;
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::path::RelativePath;
use crate::{Error, Result};

/// Per-line metadata the glob set cannot express on its own.
#[derive(Debug, Clone, Copy)]
struct PatternRule {
    negated: bool,
    dir_only: bool,
}

/// Compiled ignore rules with gitignore semantics.
///
/// Later patterns override earlier ones (last match wins); a leading
/// `!` re-includes; a trailing `/` restricts the pattern to directory
/// entries; a pattern with an interior slash anchors to the root while
/// a bare name matches at any depth. `*` never crosses a separator,
/// `**` does. A matched directory excludes its entire subtree, so a
/// negation cannot re-include a file beneath an excluded directory.
#[derive(Debug)]
pub struct IgnoreMatcher {
    set: GlobSet,
    rules: Vec<PatternRule>,
}

impl IgnoreMatcher {
    /// Matcher that matches nothing.
    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
            rules: Vec::new(),
        }
    }

    /// Load patterns from the user-level ignore file, once per
    /// invocation. A missing file yields the empty matcher.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::empty());
        }
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let matcher = Self::parse(&text, path)?;
        debug!(
            path = %path.display(),
            patterns = matcher.rules.len(),
            "loaded ignore patterns"
        );
        Ok(matcher)
    }

    /// Compile pattern lines. Blank lines and `#` comment lines are
    /// skipped.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut rules = Vec::new();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (negated, line) = match line.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, line),
            };
            let (dir_only, line) = match line.strip_suffix('/') {
                Some(rest) => (true, rest),
                None => (false, line),
            };
            // A leading slash only anchors; the compiled form is always
            // root-relative.
            let anchored = line.starts_with('/') || line.trim_start_matches('/').contains('/');
            let line = line.trim_start_matches('/');
            if line.is_empty() {
                continue;
            }
            let pattern = if anchored {
                line.to_string()
            } else {
                format!("**/{line}")
            };
            let glob = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| Error::BadPattern {
                    pattern: raw.trim().to_string(),
                    path: origin.to_path_buf(),
                    message: e.kind().to_string(),
                })?;
            builder.add(glob);
            rules.push(PatternRule { negated, dir_only });
        }

        let set = builder.build().map_err(|e| Error::BadPattern {
            pattern: e.glob().map(|g| g.to_string()).unwrap_or_default(),
            path: origin.to_path_buf(),
            message: e.kind().to_string(),
        })?;
        Ok(Self { set, rules })
    }

    /// Whether `path` is excluded from implicit traversal. The last
    /// matching pattern decides; no match means not ignored.
    pub fn matches(&self, path: &RelativePath, is_dir: bool) -> bool {
        if self.rules.is_empty() || path.is_root() {
            return false;
        }
        let mut verdict = false;
        // Matching indices come back in ascending pattern order.
        for idx in self.set.matches(path.as_str()) {
            let rule = self.rules[idx];
            if rule.dir_only && !is_dir {
                continue;
            }
            verdict = !rule.negated;
        }
        verdict
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
