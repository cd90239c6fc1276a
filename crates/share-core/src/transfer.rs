//! File copy and delete with metadata preservation

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

/// Copy `src` over `dst`, preserving the source modification time.
///
/// Content lands in a temporary sibling first and is renamed into
/// place, so a concurrent reader never observes a half-written file.
/// Preserving the mtime is load-bearing: the next classification of
/// the pair must come out `InSync`.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mtime = fs::metadata(src)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::copy(src, dst, e))?;

    // Temp file in the destination directory (ensures same filesystem)
    let temp_name = format!(
        ".{}.{}.tmp",
        dst.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = dst.with_file_name(&temp_name);

    if let Err(e) = stage_copy(src, &temp_path, mtime) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::copy(src, dst, e));
    }

    fs::rename(&temp_path, dst).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::copy(src, dst, e)
    })?;

    debug!(src = %src.display(), dst = %dst.display(), "copied");
    Ok(())
}

fn stage_copy(src: &Path, temp_path: &Path, mtime: std::time::SystemTime) -> std::io::Result<()> {
    fs::copy(src, temp_path)?;
    let staged = fs::OpenOptions::new().write(true).open(temp_path)?;
    staged.set_modified(mtime)?;
    staged.sync_all()?;
    Ok(())
}

/// Remove the file at `path`, then remove now-empty parent directories
/// upward until (not including) `stop_at`.
///
/// Pruning stops at the first non-empty or unremovable directory;
/// losing a race against a concurrent writer is fine here.
pub fn delete_file(path: &Path, stop_at: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "deleted");

    let mut dir = path.parent();
    while let Some(current) = dir {
        if current == stop_at || !current.starts_with(stop_at) {
            break;
        }
        let empty = match fs::read_dir(current) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => false,
        };
        if !empty || fs::remove_dir(current).is_err() {
            break;
        }
        debug!(path = %current.display(), "removed empty directory");
        dir = current.parent();
    }
    Ok(())
}
