//! [`TestRoots`] fixture for sync test scenarios.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

/// A temporary local/shared root pair with helpers for staging files
/// and steering modification times.
///
/// # Example
///
/// ```rust,no_run
/// use share_test_utils::TestRoots;
///
/// let roots = TestRoots::new();
/// roots.write_local("notes/todo.md", "ship it");
/// roots.backdate_local("notes/todo.md", 3600);
/// roots.assert_shared_missing("notes/todo.md");
/// ```
pub struct TestRoots {
    temp_dir: TempDir,
}

impl Default for TestRoots {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRoots {
    /// Create a temporary directory holding `local/` and `shared/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("local")).unwrap();
        fs::create_dir_all(temp_dir.path().join("shared")).unwrap();
        Self { temp_dir }
    }

    /// Create a fixture whose `shared/` directory does not exist yet.
    pub fn without_shared() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("local")).unwrap();
        Self { temp_dir }
    }

    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn local_root(&self) -> PathBuf {
        self.temp_dir.path().join("local")
    }

    pub fn shared_root(&self) -> PathBuf {
        self.temp_dir.path().join("shared")
    }

    /// Path of the ignore file this fixture hands to configuration.
    /// Absent until [`write_ignore`](Self::write_ignore) is called.
    pub fn ignore_file(&self) -> PathBuf {
        self.temp_dir.path().join(".shareignore")
    }

    pub fn write_ignore(&self, patterns: &str) {
        fs::write(self.ignore_file(), patterns).unwrap();
    }

    /// Write `content` under the local root, creating parents.
    pub fn write_local(&self, rel: &str, content: &str) -> PathBuf {
        Self::write_under(&self.local_root(), rel, content)
    }

    /// Write `content` under the shared root, creating parents.
    pub fn write_shared(&self, rel: &str, content: &str) -> PathBuf {
        Self::write_under(&self.shared_root(), rel, content)
    }

    fn write_under(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Move the local copy's mtime `seconds` into the past.
    pub fn backdate_local(&self, rel: &str, seconds: u64) {
        Self::backdate(&self.local_root().join(rel), seconds);
    }

    /// Move the shared copy's mtime `seconds` into the past.
    pub fn backdate_shared(&self, rel: &str, seconds: u64) {
        Self::backdate(&self.shared_root().join(rel), seconds);
    }

    fn backdate(path: &Path, seconds: u64) {
        let stamp = SystemTime::now() - Duration::from_secs(seconds);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(stamp)
            .unwrap();
    }

    /// Copy the local file to the shared side byte for byte, stamping
    /// the shared copy with the local mtime so the pair reads in sync.
    pub fn mirror_to_shared(&self, rel: &str) {
        let src = self.local_root().join(rel);
        let dst = self.shared_root().join(rel);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::copy(&src, &dst).unwrap();
        let mtime = fs::metadata(&src).unwrap().modified().unwrap();
        File::options()
            .write(true)
            .open(&dst)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    /// Assert the shared copy exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path is missing.
    pub fn assert_shared_exists(&self, rel: &str) {
        let path = self.shared_root().join(rel);
        assert!(
            path.exists(),
            "Expected shared file to exist: {}",
            path.display()
        );
    }

    /// Assert the shared copy does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_shared_missing(&self, rel: &str) {
        let path = self.shared_root().join(rel);
        assert!(
            !path.exists(),
            "Expected shared file NOT to exist: {}",
            path.display()
        );
    }

    /// Assert the local copy holds exactly `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or differs from `content`.
    pub fn assert_local_content(&self, rel: &str, content: &str) {
        let path = self.local_root().join(rel);
        let actual = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        assert_eq!(
            actual,
            content,
            "File {} content mismatch",
            path.display()
        );
    }

    /// Assert the shared copy holds exactly `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or differs from `content`.
    pub fn assert_shared_content(&self, rel: &str, content: &str) {
        let path = self.shared_root().join(rel);
        let actual = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        assert_eq!(
            actual,
            content,
            "File {} content mismatch",
            path.display()
        );
    }
}
