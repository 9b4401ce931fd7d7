//! agent-skills add - Install skills for an agent

use std::collections::BTreeSet;
use std::path::Path;

use clap::Args;
use colored::Colorize;

use crate::agents::AgentSpec;
use crate::app::AppContext;
use crate::cli::commands::report_cancelled;
use crate::cli::output::{emit_robot, robot_ok};
use crate::core::references::ReferenceSelection;
use crate::core::scan::SkillCandidate;
use crate::core::sources::SourceSet;
use crate::core::workflow::{AddReport, SelectionPreference, add_skills, any_requires_references};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Skill names to install (omit for interactive mode)
    pub skills: Vec<String>,

    /// Technology reference topics to install (overrides settings)
    #[arg(long, value_delimiter = ',', value_name = "TECH")]
    pub techs: Option<Vec<String>>,

    /// VCS platform whose review-posting guide to install (overrides settings)
    #[arg(long, value_name = "PLATFORM")]
    pub vcs: Option<String>,
}

pub fn run(ctx: &AppContext, args: &AddArgs) -> Result<()> {
    let Some(agent) = ctx.resolve_agent()? else {
        return report_cancelled();
    };
    ctx.announce_agent(agent);

    if !ctx.robot_mode {
        println!("{}", "\n📡 Fetching available skills...".dimmed());
    }
    let sources = ctx.fetch_sources("Fetching available skills")?;

    if sources.is_empty() {
        return report_nothing(ctx, agent, "No skills found in the repository.");
    }

    let selected = if args.skills.is_empty() {
        let Some(chosen) = ctx.prompter.select_skills(sources.candidates())? else {
            return report_cancelled();
        };
        chosen
    } else {
        sources.resolve(&args.skills)?
    };
    let selected = dedup_candidates(selected);
    if selected.is_empty() {
        return report_nothing(ctx, agent, "No skills selected. Aborting.");
    }

    let target_dir = ctx.install_dir(agent)?;
    let Some(selection) = choose_selection(ctx, args, &sources, &selected, &target_dir)? else {
        return report_cancelled();
    };

    if !ctx.robot_mode {
        println!(
            "{}",
            format!("\n📁 Installing to: {}\n", target_dir.display()).dimmed()
        );
    }

    let report = add_skills(
        ctx.fetcher.as_ref(),
        &sources,
        &selected,
        &target_dir,
        &selection,
    )?;

    if ctx.robot_mode {
        add_robot(agent, ctx.global, &selection, &report)
    } else {
        add_human(&report);
        Ok(())
    }
}

/// Drop repeated candidates (the same skill named twice) keeping first order.
fn dedup_candidates(selected: Vec<&SkillCandidate>) -> Vec<&SkillCandidate> {
    let mut seen = BTreeSet::new();
    selected
        .into_iter()
        .filter(|skill| seen.insert((skill.repo.as_str(), skill.dir_name.as_str())))
        .collect()
}

/// Reference selection for this install.
///
/// Explicit flags win over settings. When a selected skill needs the
/// references tree and a value is still unset, the user is asked if a
/// terminal is attached; otherwise whatever is already installed is reused.
/// `Ok(None)` means a prompt was cancelled.
fn choose_selection(
    ctx: &AppContext,
    args: &AddArgs,
    sources: &SourceSet,
    selected: &[&SkillCandidate],
    target_dir: &Path,
) -> Result<Option<ReferenceSelection>> {
    let mut preference = SelectionPreference {
        techs: args.techs.clone().or_else(|| ctx.config.settings.techs.clone()),
        vcs: args.vcs.clone().or_else(|| ctx.config.settings.vcs.clone()),
    };

    let wants_prompt = (preference.techs.is_none() || preference.vcs.is_none())
        && ctx.prompter.is_interactive()
        && any_requires_references(sources, selected)?;
    if wants_prompt {
        let available = sources.available_references()?;
        if preference.techs.is_none() && !available.techs.is_empty() {
            println!();
            let Some(techs) = ctx.prompter.select_techs(&available.techs)? else {
                return Ok(None);
            };
            preference.techs = Some(techs);
        }
        if preference.vcs.is_none() && !available.vcs.is_empty() {
            println!();
            let Some(vcs) = ctx.prompter.select_vcs(&available.vcs)? else {
                return Ok(None);
            };
            preference.vcs = Some(vcs);
        }
    }

    preference.resolve_for(target_dir).map(Some)
}

fn report_nothing(ctx: &AppContext, agent: &AgentSpec, message: &str) -> Result<()> {
    if ctx.robot_mode {
        let response = robot_ok(serde_json::json!({
            "agent": agent.flag,
            "global": ctx.global,
            "installed": [],
        }))
        .with_warnings(vec![message.to_string()]);
        return emit_robot(&response);
    }
    println!("{}", format!("\n⚠️  {message}").yellow());
    Ok(())
}

fn add_human(report: &AddReport) {
    for skill in &report.installed {
        println!("{}", format!("  ✅ {}", skill.name).green());
        if let Some(trigger) = &skill.trigger {
            println!("{}", format!("     Trigger: {trigger}").dimmed());
        }
        if let Some(references) = &skill.install.references {
            println!(
                "{}",
                format!("     References: {}", references.topics.join(", ")).dimmed()
            );
        }
    }
    println!(
        "{}",
        format!(
            "\n🎉 Successfully installed {} skill(s) to {}",
            report.installed.len(),
            report.target_dir.display().to_string().bold()
        )
        .green()
    );
}

fn add_robot(
    agent: &AgentSpec,
    global: bool,
    selection: &ReferenceSelection,
    report: &AddReport,
) -> Result<()> {
    emit_robot(&robot_ok(serde_json::json!({
        "agent": agent.flag,
        "global": global,
        "target_dir": report.target_dir,
        "selection": selection,
        "installed": report.installed,
    })))
}
