//! agent-skills info - Show details of one source skill

use std::path::Path;

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::core::manifest::{SkillManifest, read_manifest_document, requires_references};
use crate::core::scan::SkillCandidate;
use crate::error::{Result, SkillsError};
use crate::utils::fs::list_files_recursive;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Skill name or directory name to inspect
    pub skill: String,
}

/// Everything shown about a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillDetails {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    pub repo: String,
    pub dir_name: String,
    pub manifest_lines: usize,
    pub requires_references: bool,
    /// Files of the skill directory, relative and `/`-separated.
    pub files: Vec<String>,
}

impl SkillDetails {
    /// Read the details of `candidate` from its directory at `skill_dir`.
    pub fn load(candidate: &SkillCandidate, skill_dir: &Path) -> Result<Self> {
        let document = read_manifest_document(skill_dir)?.ok_or_else(|| {
            SkillsError::SkillDirectoryMissing {
                dir_name: candidate.dir_name.clone(),
                path: skill_dir.to_path_buf(),
            }
        })?;
        let description = SkillManifest::parse(&document)
            .map(|manifest| manifest.full_description)
            .unwrap_or_default();
        let files = list_files_recursive(skill_dir)?
            .iter()
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect();

        Ok(Self {
            name: candidate.name.clone(),
            description,
            trigger: candidate.trigger.clone(),
            repo: candidate.repo.clone(),
            dir_name: candidate.dir_name.clone(),
            manifest_lines: document.split('\n').count(),
            requires_references: requires_references(&document),
            files,
        })
    }
}

pub fn run(ctx: &AppContext, args: &InfoArgs) -> Result<()> {
    if !ctx.robot_mode {
        println!("{}", "\n📡 Fetching skill details...\n".dimmed());
    }
    let sources = ctx.fetch_sources("Fetching skill details")?;

    let candidate = sources.resolve(std::slice::from_ref(&args.skill))?[0];
    let skill_dir = sources
        .skill_dir(candidate)
        .ok_or_else(|| SkillsError::FetchFailed {
            identity: candidate.repo.clone(),
            reason: "source was not fetched".to_string(),
        })?;
    let details = SkillDetails::load(candidate, &skill_dir)?;

    if ctx.robot_mode {
        emit_robot(&robot_ok(&details))
    } else {
        emit_human(render_human(&details));
        Ok(())
    }
}

fn render_human(details: &SkillDetails) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout
        .title(&format!("📦 {}", details.name))
        .section("Description:");
    if details.description.is_empty() {
        layout.indented(&"No description".dimmed().to_string());
    } else {
        for line in details.description.lines() {
            layout.indented(line.trim());
        }
    }

    let references = if details.requires_references {
        "Yes (will install references/ directory)".yellow().to_string()
    } else {
        "No".dimmed().to_string()
    };
    layout
        .blank()
        .section("Details:")
        .kv("Source", &details.repo.dimmed().to_string())
        .kv("Directory", &details.dir_name.green().to_string())
        .kv(
            "SKILL.md",
            &format!("{} lines", details.manifest_lines).dimmed().to_string(),
        )
        .kv("References", &references);
    if let Some(trigger) = &details.trigger {
        layout.kv("Trigger", trigger);
    }

    layout.blank().section("Files:");
    for file in &details.files {
        layout.indented(&file.dimmed().to_string());
    }
    layout.blank();
    layout
}
