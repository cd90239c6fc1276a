//! Error types for share-core

use std::path::PathBuf;

/// Result type for share-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in share-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {src} -> {dst}: {source}")]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Local root is not configured: create {designator} containing the absolute path of the directory you share from")]
    LocalRootUnset { designator: PathBuf },

    #[error("Invalid {role} root {path}: {reason}")]
    InvalidRoot {
        role: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Could not determine the home directory")]
    HomeNotFound,

    #[error("Invalid ignore pattern `{pattern}` in {path}: {message}")]
    BadPattern {
        pattern: String,
        path: PathBuf,
        message: String,
    },

    #[error("Invalid relative path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Path is outside the local root {root}: {path}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Working directory is under neither the local nor the shared root: {path}")]
    OutsideRoots { path: PathBuf },

    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("File not shared: {path}")]
    NotShared { path: String },

    #[error("File exists on neither side: {path}")]
    MissingBoth { path: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn copy(src: impl Into<PathBuf>, dst: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Copy {
            src: src.into(),
            dst: dst.into(),
            source,
        }
    }
}
