//! Selective installation of one skill into a target directory.
//!
//! The skill directory is copied over whatever is already installed. When the
//! skill requires the shared reference tree, that tree is copied next to the
//! target directory, filtered by a [`ReferenceSelection`]. Files already
//! present in the target that the current selection does not cover are left
//! alone, so repeated installs accumulate the union of their selections.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::manifest::skill_requires_references;
use crate::core::references::{REFERENCES_DIR, ReferenceSelection, TopicKind};
use crate::core::scan::SKILLS_DIR;
use crate::error::{Result, SkillsError};
use crate::utils::fs::{copy_dir_recursive, ensure_dir};

/// What one install operation wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub dir_name: String,
    pub skill_dir: PathBuf,
    pub files_copied: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<ReferencesReport>,
}

/// Reference content written alongside a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferencesReport {
    pub dir: PathBuf,
    /// Topic directories copied, in name order.
    pub topics: Vec<String>,
    pub files_copied: usize,
}

/// Shared reference directory for skills installed under `target_dir`.
///
/// References live next to the target, one level up, so every skill installed
/// for the same agent shares one copy.
#[must_use]
pub fn references_dir_for(target_dir: &Path) -> PathBuf {
    target_dir.parent().map_or_else(
        || target_dir.join("..").join(REFERENCES_DIR),
        |parent| parent.join(REFERENCES_DIR),
    )
}

/// Install `skills/<dir_name>` from `tree_root` into `target_dir/<dir_name>`.
pub fn install_skill(
    tree_root: &Path,
    dir_name: &str,
    target_dir: &Path,
    selection: &ReferenceSelection,
) -> Result<InstallReport> {
    let skill_src = tree_root.join(SKILLS_DIR).join(dir_name);
    if !skill_src.is_dir() {
        return Err(SkillsError::SkillDirectoryMissing {
            dir_name: dir_name.to_string(),
            path: skill_src,
        });
    }

    let skill_dest = target_dir.join(dir_name);
    let files_copied = copy_dir_recursive(&skill_src, &skill_dest)?;
    tracing::debug!(skill = dir_name, files = files_copied, "copied skill files");

    let reference_src = tree_root.join(REFERENCES_DIR);
    let references = if reference_src.is_dir() && skill_requires_references(&skill_src)? {
        let dest = references_dir_for(target_dir);
        Some(install_references(&reference_src, &dest, selection)?)
    } else {
        None
    };

    Ok(InstallReport {
        dir_name: dir_name.to_string(),
        skill_dir: skill_dest,
        files_copied,
        references,
    })
}

/// Copy the parts of `src` that `selection` asks for into `dest`.
fn install_references(
    src: &Path,
    dest: &Path,
    selection: &ReferenceSelection,
) -> Result<ReferencesReport> {
    ensure_dir(dest)?;

    let mut entries = fs::read_dir(src)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut topics = Vec::new();
    let mut files_copied = 0;
    for entry in entries {
        let name = entry.file_name();
        let src_path = entry.path();
        let dest_path = dest.join(&name);

        if !entry.file_type()?.is_dir() {
            fs::copy(&src_path, &dest_path)?;
            files_copied += 1;
            continue;
        }

        let topic = name.to_string_lossy();
        let copied = match TopicKind::of(&topic) {
            TopicKind::Vcs => install_vcs_topic(&src_path, &dest_path, selection)?,
            _ if selection.wants_topic(&topic) => copy_dir_recursive(&src_path, &dest_path)?,
            _ => {
                tracing::debug!(topic = %topic, "skipping unselected reference topic");
                continue;
            }
        };
        files_copied += copied;
        topics.push(topic.into_owned());
    }

    Ok(ReferencesReport {
        dir: dest.to_path_buf(),
        topics,
        files_copied,
    })
}

/// Copy the `vcs` topic file by file, keeping only the selected platform's
/// review-posting guide. Nested directories are copied as-is.
fn install_vcs_topic(src: &Path, dest: &Path, selection: &ReferenceSelection) -> Result<usize> {
    ensure_dir(dest)?;
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir_recursive(&src_path, &dest_path)?;
            continue;
        }
        let file_name = entry.file_name();
        if selection.wants_vcs_file(&file_name.to_string_lossy()) {
            fs::copy(&src_path, &dest_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}
