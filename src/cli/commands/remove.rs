//! agent-skills remove - Delete installed skills

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::commands::report_cancelled;
use crate::cli::output::{emit_robot, robot_ok};
use crate::core::scan::scan_installed;
use crate::core::workflow::{RemoveReport, remove_skills};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Skill names to remove (omit for interactive mode)
    pub skills: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &RemoveArgs) -> Result<()> {
    let Some(agent) = ctx.resolve_agent()? else {
        return report_cancelled();
    };
    ctx.announce_agent(agent);

    let target_dir = ctx.install_dir(agent)?;
    let installed = scan_installed(&target_dir)?;
    if installed.is_empty() {
        return report_nothing(
            ctx,
            "No skills installed for this agent.\n  Run \"agent-skills add\" to install skills.",
        );
    }

    let names = if args.skills.is_empty() {
        let Some(chosen) = ctx.prompter.select_installed(&installed)? else {
            return report_cancelled();
        };
        chosen
    } else {
        args.skills.clone()
    };
    if names.is_empty() {
        return report_nothing(ctx, "No skills selected. Aborting.");
    }

    let report = remove_skills(&target_dir, &names)?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(serde_json::json!({
            "agent": agent.flag,
            "target_dir": target_dir,
            "removed": report.removed,
            "references_cleaned": report.references_cleaned,
        })));
    }

    println!(
        "{}",
        format!("\n🗑️  Removing from: {}\n", target_dir.display()).dimmed()
    );
    remove_human(&report);
    Ok(())
}

fn report_nothing(ctx: &AppContext, message: &str) -> Result<()> {
    if ctx.robot_mode {
        let response = robot_ok(serde_json::json!({ "removed": [] }))
            .with_warnings(vec![message.replace("\n  ", " ")]);
        return emit_robot(&response);
    }
    println!("{}", format!("\n⚠️  {message}").yellow());
    Ok(())
}

fn remove_human(report: &RemoveReport) {
    for skill in &report.removed {
        println!("{}", format!("  ✖ {} — removed", skill.name).red());
    }
    if report.references_cleaned {
        println!(
            "{}",
            "\n  🧹 Cleaned up unused references directory.".dimmed()
        );
    }
    println!(
        "{}",
        format!(
            "\n🎉 Successfully removed {} skill(s).",
            report.removed.len()
        )
        .green()
    );
}
