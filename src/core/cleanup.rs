//! Removal of the shared reference tree once nothing needs it.

use std::path::Path;

use crate::core::install::references_dir_for;
use crate::core::manifest::skill_requires_references;
use crate::core::scan::scan_installed;
use crate::error::Result;

/// Whether any skill currently installed in `target_dir` needs references.
pub fn any_installed_requires_references(target_dir: &Path) -> Result<bool> {
    for skill in scan_installed(target_dir)? {
        if skill_requires_references(&target_dir.join(&skill.dir_name))? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Delete the reference tree next to `target_dir` when no installed skill
/// requires it. Returns whether a tree was deleted.
///
/// The tree is kept whole otherwise; individual topics are never pruned.
pub fn cleanup_unused_references(target_dir: &Path) -> Result<bool> {
    let references = references_dir_for(target_dir);
    if !references.exists() || any_installed_requires_references(target_dir)? {
        return Ok(false);
    }
    std::fs::remove_dir_all(&references)?;
    tracing::info!(path = %references.display(), "removed unused references");
    Ok(true)
}
