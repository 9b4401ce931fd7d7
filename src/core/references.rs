//! Shared reference tree layout and selection rules.
//!
//! A source tree may carry a `references/` root next to `skills/`. Its
//! immediate subdirectories are *topics*:
//!
//! - core topics (`general`, `runtime`, `shell`) always install in full,
//! - the `vcs` topic installs file by file, keeping only the review-posting
//!   guide of the selected platform,
//! - every other topic is an optional technology installed only on request.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Root of the shared reference tree, in source trees and next to targets.
pub const REFERENCES_DIR: &str = "references";

/// Topics installed regardless of the selection.
pub const CORE_TOPICS: &[&str] = &["general", "runtime", "shell"];

/// Topic holding per-platform version control guides.
pub const VCS_TOPIC: &str = "vcs";

/// File under `vcs/` that every selection receives.
pub const VCS_COMMANDS_FILE: &str = "vcs-platform-commands.ref.md";

const REVIEW_POSTING_PREFIX: &str = "code-review-posting-";
const REVIEW_POSTING_SUFFIX: &str = ".ref.md";

/// How a topic directory under `references/` is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    Core,
    Vcs,
    Tech,
}

impl TopicKind {
    #[must_use]
    pub fn of(topic: &str) -> Self {
        if CORE_TOPICS.contains(&topic) {
            Self::Core
        } else if topic == VCS_TOPIC {
            Self::Vcs
        } else {
            Self::Tech
        }
    }
}

/// Platform named by a `code-review-posting-<platform>.ref.md` file.
#[must_use]
pub fn review_posting_platform(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(REVIEW_POSTING_PREFIX)?
        .strip_suffix(REVIEW_POSTING_SUFFIX)
        .filter(|platform| !platform.is_empty())
}

/// Optional reference content chosen for one install operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceSelection {
    pub techs: BTreeSet<String>,
    pub vcs: Option<String>,
}

impl ReferenceSelection {
    pub fn new<I, S>(techs: I, vcs: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            techs: techs.into_iter().map(Into::into).collect(),
            vcs,
        }
    }

    /// Whether the topic directory `topic` is copied as a whole.
    #[must_use]
    pub fn wants_topic(&self, topic: &str) -> bool {
        match TopicKind::of(topic) {
            TopicKind::Core => true,
            TopicKind::Vcs => false,
            TopicKind::Tech => self.techs.contains(topic),
        }
    }

    /// Whether a file directly under `vcs/` is copied.
    #[must_use]
    pub fn wants_vcs_file(&self, file_name: &str) -> bool {
        if file_name == VCS_COMMANDS_FILE {
            return true;
        }
        match review_posting_platform(file_name) {
            Some(platform) => self.vcs.as_deref() == Some(platform),
            None => true,
        }
    }
}

/// Optional topics offered by one or more source trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailableReferences {
    pub techs: Vec<String>,
    pub vcs: Vec<String>,
}

impl AvailableReferences {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.techs.is_empty() && self.vcs.is_empty()
    }
}

/// Collect the optional tech topics and VCS platforms across `tree_roots`.
///
/// Both lists come back sorted and de-duplicated. Trees without a
/// `references/` root contribute nothing.
pub fn scan_available_references<'a, I>(tree_roots: I) -> Result<AvailableReferences>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut techs = BTreeSet::new();
    let mut vcs = BTreeSet::new();

    for root in tree_roots {
        let references = root.join(REFERENCES_DIR);
        if !references.is_dir() {
            continue;
        }
        for topic in subdirectory_names(&references)? {
            if TopicKind::of(&topic) == TopicKind::Tech {
                techs.insert(topic);
            }
        }
        vcs.extend(installed_platforms(&references.join(VCS_TOPIC))?);
    }

    Ok(AvailableReferences {
        techs: techs.into_iter().collect(),
        vcs: vcs.into_iter().collect(),
    })
}

/// Reconstruct the selection that produced an installed reference tree.
///
/// Every tech topic present is treated as selected. Of the installed
/// review-posting guides the alphabetically first one wins; the others stay on
/// disk because installs never prune.
pub fn infer_selection(references_dir: &Path) -> Result<ReferenceSelection> {
    if !references_dir.is_dir() {
        return Ok(ReferenceSelection::default());
    }
    let techs = subdirectory_names(references_dir)?
        .into_iter()
        .filter(|topic| TopicKind::of(topic) == TopicKind::Tech);
    let vcs = installed_platforms(&references_dir.join(VCS_TOPIC))?
        .into_iter()
        .next();
    Ok(ReferenceSelection::new(techs, vcs))
}

fn subdirectory_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if !name.starts_with('.') => names.push(name.to_string()),
            _ => {}
        }
    }
    names.sort();
    Ok(names)
}

fn installed_platforms(vcs_dir: &Path) -> Result<BTreeSet<String>> {
    let mut platforms = BTreeSet::new();
    if !vcs_dir.is_dir() {
        return Ok(platforms);
    }
    for entry in fs::read_dir(vcs_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(platform) = entry.file_name().to_str().and_then(review_posting_platform) {
            platforms.insert(platform.to_string());
        }
    }
    Ok(platforms)
}
