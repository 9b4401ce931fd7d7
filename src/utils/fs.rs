//! Filesystem utilities.
//!
//! Helper functions for file operations.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SkillsError};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Read a file to string, returning None if it doesn't exist.
pub fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    if path.exists() {
        Ok(Some(std::fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}

/// Recursively copy the contents of `src` into `dest`, overwriting files that
/// already exist at the same relative path. Files present only in `dest` are
/// left alone.
///
/// Returns the number of files copied.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<usize> {
    ensure_dir(dest)?;
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| walk_error(src, err))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| SkillsError::ValidationFailed(format!(
                "path {} escaped copy root {}",
                entry.path().display(),
                src.display()
            )))?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// List every file below `dir`, as paths relative to `dir`, sorted.
pub fn list_files_recursive(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| walk_error(dir, err))?;
        if entry.file_type().is_dir() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(dir) {
            files.push(rel.to_path_buf());
        }
    }
    Ok(files)
}

/// Remove a directory tree, logging instead of failing.
///
/// Used for temporary trees whose removal must never mask the primary
/// outcome of a command.
pub fn remove_dir_best_effort(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(err) = std::fs::remove_dir_all(path) {
        tracing::warn!(path = %path.display(), error = %err, "failed to remove directory");
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> SkillsError {
    match err.into_io_error() {
        Some(io) => SkillsError::Io(io),
        None => SkillsError::ValidationFailed(format!(
            "filesystem loop detected under {}",
            root.display()
        )),
    }
}
