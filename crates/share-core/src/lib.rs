//! Core synchronization logic for the `share` tool
//!
//! A local tree (the workspace) mirrors into a shared tree (the dump).
//! There is no database and no sync history: every command samples
//! both sides of each relative path, compares modification times with
//! a one-second tolerance, and acts on that classification alone.
//!
//! The pieces compose in one direction:
//!
//! - [`RootConfig`] resolves the two roots and the ignore file from
//!   designator dotfiles, environment, or explicit overrides.
//! - [`PathResolver`] maps user arguments into root-relative paths and
//!   rejects anything that escapes the roots.
//! - [`TreeWalker`] expands directories into file sets and enumerates
//!   the tracked tree, applying [`IgnoreMatcher`] rules.
//! - [`SyncEngine`] classifies each pair via [`SyncClassification`],
//!   picks an [`Action`] from the per-command policy table, and
//!   executes transfers.
//! - [`StatusAggregator`] buckets read-only classifications for
//!   status and audit style reporting.

pub mod config;
pub mod engine;
pub mod error;
pub mod ignore;
pub mod path;
pub mod state;
pub mod status;
pub mod transfer;
pub mod walk;

pub use config::{ConfigOverrides, RootConfig};
pub use engine::{
    Action, BatchEntry, BatchFailure, BatchReport, Command, Decision, RunOptions, SyncEngine,
};
pub use error::{Error, Result};
pub use ignore::IgnoreMatcher;
pub use path::{PathResolver, RelativePath};
pub use state::{FileState, MTIME_TOLERANCE, SyncClassification};
pub use status::{StatusAggregator, StatusEntry, StatusReport};
pub use walk::TreeWalker;
