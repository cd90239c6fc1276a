//! list: enumerate every tracked file

use std::path::PathBuf;

use share_core::{StatusAggregator, SyncEngine};

use crate::error::Result;
use crate::render::Printer;

/// Print the local-side path of every file under the shared tree, the
/// same set whole-tree commands operate on.
pub fn run_list(engine: &SyncEngine, printer: &Printer, json: bool) -> Result<i32> {
    let files = tracked_files(engine)?;

    if json {
        let payload = serde_json::json!({
            "command": "list",
            "total": files.len(),
            "files": files,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for file in &files {
            printer.info(file.display().to_string());
        }
    }
    Ok(0)
}

fn tracked_files(engine: &SyncEngine) -> Result<Vec<PathBuf>> {
    let report = StatusAggregator::new(engine).aggregate_tracked()?;
    let config = engine.config();
    Ok(report
        .entries
        .iter()
        .map(|entry| config.local_path(&entry.path))
        .collect())
}

#[cfg(test)]
mod tests {
    use share_test_utils::TestRoots;

    use super::*;

    fn engine_for(roots: &TestRoots) -> SyncEngine {
        let config = share_core::RootConfig::with_roots(
            roots.local_root(),
            roots.shared_root(),
            roots.ignore_file(),
        )
        .unwrap();
        SyncEngine::new(config).unwrap()
    }

    #[test]
    fn test_list_names_local_side_paths_for_the_shared_tree() {
        let roots = TestRoots::new();
        roots.write_shared("docs/a.md", "a");
        roots.write_shared("b.txt", "b");
        let engine = engine_for(&roots);

        let files = tracked_files(&engine).unwrap();
        assert_eq!(files.len(), 2);
        // Tracked entries map onto the local side of each pair.
        assert!(files.iter().any(|f| f.ends_with("local/b.txt")));
        assert!(files.iter().any(|f| f.ends_with("local/docs/a.md")));
    }

    #[test]
    fn test_list_is_empty_without_a_shared_root() {
        let roots = TestRoots::without_shared();
        let engine = engine_for(&roots);

        assert!(tracked_files(&engine).unwrap().is_empty());
        let code = run_list(&engine, &Printer::new(2), false).unwrap();
        assert_eq!(code, 0);
    }
}
