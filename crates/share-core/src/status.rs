//! Tree-level status aggregation
//!
//! Runs read-only classification over a path set and buckets the
//! results by [`SyncClassification`]. This backs `status`, `audit`,
//! and `list`; none of them writes anything.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::engine::{BatchFailure, BatchReport, Command, RunOptions, SyncEngine};
use crate::path::RelativePath;
use crate::state::{FileState, SyncClassification};
use crate::Result;

/// One classified path.
#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    pub path: RelativePath,
    pub classification: SyncClassification,
    pub local: FileState,
    pub shared: FileState,
}

/// Classified view of a path set.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub total: usize,
    pub counts: BTreeMap<SyncClassification, usize>,
    pub entries: Vec<StatusEntry>,
    pub failures: Vec<BatchFailure>,
}

impl StatusReport {
    pub fn count(&self, classification: SyncClassification) -> usize {
        self.counts.get(&classification).copied().unwrap_or(0)
    }

    /// Entries that are not `InSync`, in tree order.
    pub fn drifted(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.classification != SyncClassification::InSync)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.drifted().next().is_none()
    }

    fn from_batch(report: BatchReport) -> Self {
        let mut counts = BTreeMap::new();
        let entries: Vec<StatusEntry> = report
            .entries
            .into_iter()
            .map(|entry| {
                *counts.entry(entry.classification).or_insert(0) += 1;
                StatusEntry {
                    path: entry.path,
                    classification: entry.classification,
                    local: entry.local,
                    shared: entry.shared,
                }
            })
            .collect();
        Self {
            total: entries.len(),
            counts,
            entries,
            failures: report.failures,
        }
    }
}

/// Read-only classifier over explicit arguments or the tracked tree.
pub struct StatusAggregator<'a> {
    engine: &'a SyncEngine,
}

impl<'a> StatusAggregator<'a> {
    pub fn new(engine: &'a SyncEngine) -> Self {
        Self { engine }
    }

    /// Classify explicit arguments, expanding directories.
    pub fn aggregate(&self, inputs: &[PathBuf], base: &Path) -> StatusReport {
        let report = self
            .engine
            .run(Command::Check, inputs, base, &RunOptions::default());
        StatusReport::from_batch(report)
    }

    /// Classify every tracked path.
    pub fn aggregate_tracked(&self) -> Result<StatusReport> {
        let report = self
            .engine
            .run_tracked(Command::Check, &RunOptions::default())?;
        Ok(StatusReport::from_batch(report))
    }
}
