//! agent-skills update - Refresh installed skills from their sources

use clap::Args;
use colored::Colorize;

use crate::agents::AgentSpec;
use crate::app::AppContext;
use crate::cli::output::{emit_robot, robot_ok};
use crate::core::workflow::{TargetUpdate, UpdateOutcome, update_target};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Specific skill names to update (omit to update all)
    pub skills: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &UpdateArgs) -> Result<()> {
    if !ctx.robot_mode {
        println!("{}", "\n🔄 Checking for skill updates...\n".cyan());
    }
    let sources = ctx.fetch_sources("Checking for skill updates")?;

    if sources.is_empty() {
        if ctx.robot_mode {
            let response = robot_ok(serde_json::json!({ "updated": 0, "targets": [] }))
                .with_warnings(vec!["No skills found in the remote repository.".to_string()]);
            return emit_robot(&response);
        }
        println!("{}", "  No skills found in the remote repository.".yellow());
        return Ok(());
    }

    let preference = ctx.config.selection_preference();
    let mut targets: Vec<(&'static AgentSpec, TargetUpdate)> = Vec::new();
    for (agent, dir) in ctx.agent_dirs()? {
        let report = update_target(
            ctx.fetcher.as_ref(),
            &sources,
            &dir,
            &args.skills,
            &preference,
        )?;
        if report.skills.is_empty() {
            continue;
        }
        if !ctx.robot_mode {
            print_target(ctx, agent, &report);
        }
        targets.push((agent, report));
    }

    let updated: usize = targets.iter().map(|(_, t)| t.updated_count()).sum();
    if ctx.robot_mode {
        let targets: Vec<serde_json::Value> = targets
            .iter()
            .map(|(agent, report)| {
                serde_json::json!({
                    "agent": agent.flag,
                    "target_dir": report.target_dir,
                    "skills": report.skills,
                })
            })
            .collect();
        return emit_robot(&robot_ok(serde_json::json!({
            "scope": if ctx.global { "global" } else { "project" },
            "updated": updated,
            "targets": targets,
        })));
    }

    if updated == 0 {
        println!(
            "{}",
            "  No installed skills needed updating.\n  Run \"agent-skills ls\" to see installed skills."
                .yellow()
        );
    } else {
        println!(
            "{}",
            format!("🎉 Updated {updated} skill(s) successfully.").green()
        );
    }
    Ok(())
}

fn print_target(ctx: &AppContext, agent: &AgentSpec, report: &TargetUpdate) {
    println!(
        "{}",
        format!("  {} ({}/)", agent.name, agent.scope_path(ctx.global)).bold()
    );
    for skill in &report.skills {
        match &skill.outcome {
            UpdateOutcome::Updated { .. } => {
                println!("{}", format!("    ✅ {} — updated", skill.name).green());
            }
            UpdateOutcome::UpToDate => {
                println!(
                    "{}",
                    format!("    ⏭  {} — already up to date", skill.name).dimmed()
                );
            }
            UpdateOutcome::MissingFromSources => {
                println!(
                    "{}",
                    format!("    ⏭  {} — not found in remote, skipping", skill.name).dimmed()
                );
            }
        }
    }
    println!();
}
