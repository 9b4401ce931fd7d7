//! Skill discovery in source trees and installed target directories.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::core::manifest::{SKILL_FILE, SkillManifest};
use crate::error::Result;

/// Root of skill packages inside a source tree.
pub const SKILLS_DIR: &str = "skills";

/// A skill discovered in a fetched source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCandidate {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    /// Folder name under the source tree's `skills/` root.
    pub dir_name: String,
    /// Identity of the source the skill came from.
    pub repo: String,
}

/// A skill found on disk in a target directory.
///
/// Carries no origin or version information; see the lock ledger for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalInstalledSkill {
    pub name: String,
    pub description: String,
    pub dir_name: String,
}

/// Enumerate the skills under `<tree_root>/skills/`.
///
/// A tree without a `skills/` directory has no skills.
pub fn scan_source_tree(tree_root: &Path, repo: &str) -> Result<Vec<SkillCandidate>> {
    let skills = discover_skills(&tree_root.join(SKILLS_DIR))?
        .into_iter()
        .map(|(dir_name, manifest)| SkillCandidate {
            name: manifest.name,
            description: manifest.description,
            trigger: manifest.trigger,
            dir_name,
            repo: repo.to_string(),
        })
        .collect::<Vec<_>>();
    tracing::debug!(repo, count = skills.len(), "scanned source tree");
    Ok(skills)
}

/// Enumerate the skills installed directly under `target_dir`.
pub fn scan_installed(target_dir: &Path) -> Result<Vec<LocalInstalledSkill>> {
    Ok(discover_skills(target_dir)?
        .into_iter()
        .map(|(dir_name, manifest)| LocalInstalledSkill {
            name: manifest.name,
            description: manifest.description,
            dir_name,
        })
        .collect())
}

/// Walk the immediate subdirectories of `root` and parse each one's manifest.
///
/// Dot-prefixed directories, directories without a manifest, and manifests
/// that fail to parse are skipped. Results are ordered by directory name.
fn discover_skills(root: &Path) -> Result<Vec<(String, SkillManifest)>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(dir_name) = entry.file_name().to_str().map(String::from) else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 directory name");
            continue;
        };
        if dir_name.starts_with('.') {
            continue;
        }
        entries.push((dir_name, entry.path()));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut found = Vec::new();
    for (dir_name, path) in entries {
        let manifest_path = path.join(SKILL_FILE);
        if !manifest_path.is_file() {
            continue;
        }
        let document = match fs::read_to_string(&manifest_path) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(path = %manifest_path.display(), error = %err, "unreadable manifest");
                continue;
            }
        };
        match SkillManifest::parse(&document) {
            Some(manifest) => found.push((dir_name, manifest)),
            None => tracing::debug!(path = %manifest_path.display(), "skipping invalid manifest"),
        }
    }
    Ok(found)
}
