//! agent-skills list - List installed or available skills

use clap::Args;
use colored::Colorize;

use crate::agents::AgentSpec;
use crate::app::AppContext;
use crate::cli::output::{emit_robot, name_width, pad_name, robot_ok};
use crate::core::scan::{LocalInstalledSkill, SkillCandidate, scan_installed};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// List available skills from the source repositories
    #[arg(long)]
    pub remote: bool,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    if args.remote {
        run_remote(ctx)
    } else {
        run_installed(ctx)
    }
}

// =============================================================================
// installed
// =============================================================================

struct InstalledGroup {
    agent: &'static AgentSpec,
    dir: std::path::PathBuf,
    skills: Vec<LocalInstalledSkill>,
}

fn run_installed(ctx: &AppContext) -> Result<()> {
    if !ctx.robot_mode {
        println!("{}", "\n📦 Scanning locally installed skills...\n".cyan());
    }

    let mut groups = Vec::new();
    for (agent, dir) in ctx.agent_dirs()? {
        let skills = scan_installed(&dir)?;
        if !skills.is_empty() {
            groups.push(InstalledGroup { agent, dir, skills });
        }
    }

    if ctx.robot_mode {
        installed_robot(ctx, &groups)
    } else {
        installed_human(ctx, &groups);
        Ok(())
    }
}

fn installed_human(ctx: &AppContext, groups: &[InstalledGroup]) {
    let mut total = 0;
    for group in groups {
        println!(
            "{}",
            format!(
                "  {} ({}/)",
                group.agent.name,
                group.agent.scope_path(ctx.global)
            )
            .bold()
        );
        for skill in &group.skills {
            println!("    {}  {}", skill.name.green(), skill.description.dimmed());
        }
        println!();
        total += group.skills.len();
    }

    let scope = if ctx.global { "globally" } else { "locally" };
    if total == 0 {
        let place = if ctx.global {
            "in the global directories"
        } else {
            "in the current project"
        };
        println!(
            "{}",
            format!("  No skills found {place}.\n  Run \"agent-skills add\" to install skills.")
                .yellow()
        );
    } else {
        println!(
            "{}",
            format!("  Total: {total} skill(s) installed {scope}").dimmed()
        );
    }
}

fn installed_robot(ctx: &AppContext, groups: &[InstalledGroup]) -> Result<()> {
    let targets: Vec<serde_json::Value> = groups
        .iter()
        .map(|group| {
            serde_json::json!({
                "agent": group.agent.flag,
                "dir": group.dir,
                "skills": group.skills,
            })
        })
        .collect();
    let total: usize = groups.iter().map(|g| g.skills.len()).sum();

    emit_robot(&robot_ok(serde_json::json!({
        "scope": if ctx.global { "global" } else { "project" },
        "count": total,
        "targets": targets,
    })))
}

// =============================================================================
// remote
// =============================================================================

fn run_remote(ctx: &AppContext) -> Result<()> {
    if !ctx.robot_mode {
        println!(
            "{}",
            "\n📡 Fetching available skills from remote...\n".cyan()
        );
    }
    let sources = ctx.fetch_sources("Fetching available skills")?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(serde_json::json!({
            "count": sources.candidates().len(),
            "skills": sources.candidates(),
        })));
    }

    if sources.is_empty() {
        println!("{}", "  No skills found in the repository.".yellow());
        return Ok(());
    }
    print_candidates(sources.candidates());
    println!(
        "{}",
        format!(
            "\n  Total: {} skill(s) available",
            sources.candidates().len()
        )
        .dimmed()
    );
    Ok(())
}

/// One aligned `name  description` row per candidate.
pub(crate) fn print_candidates<'a, I>(skills: I)
where
    I: IntoIterator<Item = &'a SkillCandidate> + Clone,
{
    let width = name_width(skills.clone().into_iter().map(|s| s.name.as_str()));
    for skill in skills {
        let description = if skill.description.is_empty() {
            "No description"
        } else {
            skill.description.as_str()
        };
        println!(
            "  {}  {}",
            pad_name(&skill.name, width).green(),
            description.dimmed()
        );
    }
}
