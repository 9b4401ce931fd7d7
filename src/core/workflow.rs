//! Add, update and remove flows over a target directory.
//!
//! Each flow returns a report. An empty report means "nothing to do" and is
//! distinct from a failure, which is always an `Err`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::cleanup::cleanup_unused_references;
use crate::core::install::{InstallReport, install_skill, references_dir_for};
use crate::core::lock::LockLedger;
use crate::core::manifest::skill_requires_references;
use crate::core::references::{REFERENCES_DIR, ReferenceSelection, infer_selection};
use crate::core::scan::{LocalInstalledSkill, SKILLS_DIR, SkillCandidate, scan_installed};
use crate::core::sources::SourceSet;
use crate::error::{Result, SkillsError};
use crate::fetch::{SourceFetcher, UNKNOWN_REVISION};

/// Version marker of one skill inside a fetched tree.
///
/// Prefers the latest revision touching the skill directory (and the
/// references root when the skill needs it), falling back to the revision of
/// the whole tree.
pub fn version_marker<F>(fetcher: &F, tree_root: &Path, dir_name: &str) -> Result<String>
where
    F: SourceFetcher + ?Sized,
{
    let mut paths = vec![format!("{SKILLS_DIR}/{dir_name}")];
    if skill_requires_references(&tree_root.join(SKILLS_DIR).join(dir_name))? {
        paths.push(REFERENCES_DIR.to_string());
    }
    let marker = fetcher.path_revision(tree_root, &paths);
    if marker == UNKNOWN_REVISION {
        return Ok(fetcher.tree_revision(tree_root));
    }
    Ok(marker)
}

/// Whether any of `skills` needs the shared references tree.
pub fn any_requires_references(sources: &SourceSet, skills: &[&SkillCandidate]) -> Result<bool> {
    for skill in skills {
        let Some(dir) = sources.skill_dir(skill) else {
            continue;
        };
        if skill_requires_references(&dir)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Saved reference preferences. Unset fields fall back to whatever is
/// already installed next to the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPreference {
    pub techs: Option<Vec<String>>,
    pub vcs: Option<String>,
}

impl SelectionPreference {
    pub fn resolve_for(&self, target_dir: &Path) -> Result<ReferenceSelection> {
        let installed = infer_selection(&references_dir_for(target_dir))?;
        Ok(ReferenceSelection {
            techs: self
                .techs
                .as_ref()
                .map_or(installed.techs, |techs| techs.iter().cloned().collect()),
            vcs: self.vcs.clone().or(installed.vcs),
        })
    }
}

// =============================================================================
// add
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AddedSkill {
    pub name: String,
    pub dir_name: String,
    pub repo: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    pub install: InstallReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddReport {
    pub target_dir: PathBuf,
    pub installed: Vec<AddedSkill>,
}

/// Install `skills` into `target_dir` and record them in its ledger.
///
/// The ledger is written even when a later skill fails, so skills already
/// copied stay tracked.
pub fn add_skills<F>(
    fetcher: &F,
    sources: &SourceSet,
    skills: &[&SkillCandidate],
    target_dir: &Path,
    selection: &ReferenceSelection,
) -> Result<AddReport>
where
    F: SourceFetcher + ?Sized,
{
    let mut ledger = LockLedger::read(target_dir);
    let mut installed = Vec::new();

    let outcome = skills.iter().try_for_each(|skill| {
        let added = add_one(fetcher, sources, skill, target_dir, selection)?;
        ledger.upsert(&added.name, &added.version, &added.repo);
        installed.push(added);
        Ok::<_, SkillsError>(())
    });

    if !installed.is_empty() {
        ledger.write(target_dir)?;
    }
    outcome?;

    Ok(AddReport {
        target_dir: target_dir.to_path_buf(),
        installed,
    })
}

fn add_one<F>(
    fetcher: &F,
    sources: &SourceSet,
    skill: &SkillCandidate,
    target_dir: &Path,
    selection: &ReferenceSelection,
) -> Result<AddedSkill>
where
    F: SourceFetcher + ?Sized,
{
    let root = tree_root(sources, skill)?;
    let install = install_skill(root, &skill.dir_name, target_dir, selection)?;
    let version = version_marker(fetcher, root, &skill.dir_name)?;
    tracing::info!(skill = %skill.name, version = %version, "installed skill");
    Ok(AddedSkill {
        name: skill.name.clone(),
        dir_name: skill.dir_name.clone(),
        repo: skill.repo.clone(),
        version,
        trigger: skill.trigger.clone(),
        install,
    })
}

fn tree_root<'a>(sources: &'a SourceSet, skill: &SkillCandidate) -> Result<&'a Path> {
    sources.tree_for(&skill.repo).ok_or_else(|| SkillsError::FetchFailed {
        identity: skill.repo.clone(),
        reason: "source was not fetched".to_string(),
    })
}

// =============================================================================
// update
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    Updated { version: String },
    UpToDate,
    MissingFromSources,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillUpdate {
    pub name: String,
    pub dir_name: String,
    #[serde(flatten)]
    pub outcome: UpdateOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetUpdate {
    pub target_dir: PathBuf,
    pub skills: Vec<SkillUpdate>,
}

impl TargetUpdate {
    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.skills
            .iter()
            .filter(|s| matches!(s.outcome, UpdateOutcome::Updated { .. }))
            .count()
    }
}

/// Refresh installed skills in `target_dir` from `sources`.
///
/// `names` restricts the update to skills matching by directory or manifest
/// name; empty means every installed skill. Skills whose ledger marker equals
/// the fresh marker are left untouched. On failure the ledger still records
/// the skills refreshed before the error.
pub fn update_target<F>(
    fetcher: &F,
    sources: &SourceSet,
    target_dir: &Path,
    names: &[String],
    preference: &SelectionPreference,
) -> Result<TargetUpdate>
where
    F: SourceFetcher + ?Sized,
{
    let installed: Vec<_> = scan_installed(target_dir)?
        .into_iter()
        .filter(|local| {
            names.is_empty()
                || names
                    .iter()
                    .any(|name| *name == local.dir_name || *name == local.name)
        })
        .collect();

    let mut report = TargetUpdate {
        target_dir: target_dir.to_path_buf(),
        skills: Vec::new(),
    };
    if installed.is_empty() {
        return Ok(report);
    }

    let selection = preference.resolve_for(target_dir)?;
    let mut ledger = LockLedger::read(target_dir);

    let outcome = installed.into_iter().try_for_each(|local| {
        let remote = sources
            .candidates()
            .iter()
            .find(|remote| remote.dir_name == local.dir_name || remote.name == local.name);
        let Some(remote) = remote else {
            tracing::debug!(skill = %local.name, "not found in sources");
            report.skills.push(SkillUpdate {
                name: local.name,
                dir_name: local.dir_name,
                outcome: UpdateOutcome::MissingFromSources,
            });
            return Ok(());
        };

        let root = tree_root(sources, remote)?;
        let version = version_marker(fetcher, root, &remote.dir_name)?;
        let outcome = if ledger.is_current(&local.name, &version) {
            UpdateOutcome::UpToDate
        } else {
            install_skill(root, &remote.dir_name, target_dir, &selection)?;
            ledger.upsert(&local.name, &version, &remote.repo);
            tracing::info!(skill = %local.name, version = %version, "updated skill");
            UpdateOutcome::Updated { version }
        };
        report.skills.push(SkillUpdate {
            name: local.name,
            dir_name: local.dir_name,
            outcome,
        });
        Ok::<_, SkillsError>(())
    });

    if report.updated_count() > 0 {
        ledger.write(target_dir)?;
    }
    outcome?;
    Ok(report)
}

// =============================================================================
// remove
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedSkill {
    pub name: String,
    pub dir_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoveReport {
    pub removed: Vec<RemovedSkill>,
    pub references_cleaned: bool,
}

/// Remove the named skills from `target_dir`, drop their ledger entries and
/// delete the shared references tree if nothing left needs it.
///
/// Every name is validated before anything is deleted. If a deletion fails,
/// the ledger is still written for the skills already removed.
pub fn remove_skills(target_dir: &Path, names: &[String]) -> Result<RemoveReport> {
    if names.is_empty() {
        return Ok(RemoveReport::default());
    }
    let installed = scan_installed(target_dir)?;

    let mut seen = BTreeSet::new();
    let mut selected = Vec::new();
    for name in names {
        let skill = installed
            .iter()
            .find(|s| s.dir_name == *name || s.name == *name)
            .ok_or_else(|| SkillsError::SkillNotInstalled {
                name: name.clone(),
                installed: installed.iter().map(|s| s.dir_name.clone()).collect(),
            })?;
        if seen.insert(skill.dir_name.clone()) {
            selected.push(skill);
        }
    }

    let mut report = RemoveReport::default();
    delete_selected(target_dir, &selected, &mut report, |dir| std::fs::remove_dir_all(dir))?;

    report.references_cleaned = cleanup_unused_references(target_dir)?;
    Ok(report)
}

/// Delete each selected skill directory in order with `delete`.
///
/// Stops at the first failure; the ledger is still written for the skills
/// already deleted.
fn delete_selected<D>(
    target_dir: &Path,
    selected: &[&LocalInstalledSkill],
    report: &mut RemoveReport,
    mut delete: D,
) -> Result<()>
where
    D: FnMut(&Path) -> std::io::Result<()>,
{
    let mut ledger = LockLedger::read(target_dir);
    let outcome = selected.iter().try_for_each(|skill| {
        delete(&target_dir.join(&skill.dir_name))?;
        ledger.remove(&skill.name);
        tracing::info!(skill = %skill.name, "removed skill");
        report.removed.push(RemovedSkill {
            name: skill.name.clone(),
            dir_name: skill.dir_name.clone(),
        });
        Ok::<_, SkillsError>(())
    });
    if !report.removed.is_empty() {
        ledger.write(target_dir)?;
    }
    outcome
}
