//! agent-skills search - Find source skills by keyword

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::commands::list::print_candidates;
use crate::cli::output::{emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Keyword to search for in skill names and descriptions
    pub keyword: String,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let keyword = &args.keyword;
    if !ctx.robot_mode {
        println!("{}", format!("\n🔍 Searching for \"{keyword}\"...\n").cyan());
    }
    let sources = ctx.fetch_sources("Searching skills")?;
    let matched = sources.search(keyword);

    if ctx.robot_mode {
        return emit_robot(&robot_ok(serde_json::json!({
            "keyword": keyword,
            "count": matched.len(),
            "skills": matched,
        })));
    }

    if matched.is_empty() {
        println!(
            "{}",
            format!("  No skills found matching \"{keyword}\".").yellow()
        );
        println!(
            "{}",
            format!(
                "  Run {} to browse all available skills.",
                "agent-skills list --remote".white()
            )
            .dimmed()
        );
        return Ok(());
    }

    print_candidates(matched.iter().copied());
    println!(
        "{}",
        format!(
            "\n  Found {} skill(s) matching \"{keyword}\"",
            matched.len()
        )
        .dimmed()
    );
    println!(
        "{}",
        format!(
            "  Install with: {}",
            "agent-skills add <skill-name> --tool <agent>".white()
        )
        .dimmed()
    );
    Ok(())
}
