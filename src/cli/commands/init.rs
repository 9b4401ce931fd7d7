//! agent-skills init - Write a project settings file

use std::path::{Path, PathBuf};

use clap::Args;
use colored::Colorize;

use crate::agents::{AgentSpec, require_agent};
use crate::app::AppContext;
use crate::cli::Cli;
use crate::cli::commands::report_cancelled;
use crate::cli::output::{emit_robot, robot_ok};
use crate::cli::prompt::Prompter;
use crate::config::{CONFIG_FILENAME, DEFAULT_REPO, ProjectSettings};
use crate::error::{Result, SkillsError};

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing settings file without asking
    #[arg(long, short)]
    pub force: bool,

    /// Source repositories to record (comma-separated; default: the public repository)
    #[arg(long, value_delimiter = ',', value_name = "URL")]
    pub repos: Option<Vec<String>>,
}

/// Inputs to init that normally come from the application context.
///
/// Init must work even when the existing settings file is broken, so it
/// never loads configuration.
pub struct InitSession<'a> {
    pub project_root: &'a Path,
    pub robot_mode: bool,
    pub prompter: &'a Prompter,
    /// `--tool`, used as the default agent without prompting.
    pub tool: Option<&'a str>,
    /// `--repo`, recorded as the single repository without prompting.
    pub repo: Option<&'a str>,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let session = InitSession {
        project_root: &ctx.project_root,
        robot_mode: ctx.robot_mode,
        prompter: &ctx.prompter,
        tool: ctx.tool.as_deref(),
        repo: ctx.repo.as_deref(),
    };
    run_session(&session, args)
}

pub fn run_without_context(cli: &Cli, args: &InitArgs) -> Result<()> {
    let project_root = std::env::current_dir()?;
    let prompter = Prompter::new(!cli.robot);
    let session = InitSession {
        project_root: &project_root,
        robot_mode: cli.robot,
        prompter: &prompter,
        tool: cli.tool.as_deref(),
        repo: cli.repo.as_deref(),
    };
    run_session(&session, args)
}

pub fn run_session(session: &InitSession<'_>, args: &InitArgs) -> Result<()> {
    let path = settings_path(session.project_root);

    if path.exists() && !args.force {
        if !session.prompter.is_interactive() {
            return Err(SkillsError::Config(format!(
                "{CONFIG_FILENAME} already exists at {}; pass --force to overwrite",
                path.display()
            )));
        }
        let overwrite = session.prompter.confirm(
            "confirming overwrite (pass --force)",
            &format!("{CONFIG_FILENAME} already exists. Overwrite?"),
            false,
        )?;
        if overwrite != Some(true) {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    if !session.robot_mode {
        println!("{}", format!("\nLet's set up your {CONFIG_FILENAME}!\n").cyan());
    }

    let Some(agent) = choose_agent(session)? else {
        return report_cancelled();
    };
    let repos = choose_repos(session, args)?;
    let settings = settings_for(agent, repos);
    settings.save(&path)?;
    tracing::info!(path = %path.display(), agent = agent.flag, "wrote settings");

    if session.robot_mode {
        return emit_robot(&robot_ok(serde_json::json!({
            "path": path,
            "settings": settings,
        })));
    }
    println!(
        "{}",
        format!("\n🎉 Successfully created {CONFIG_FILENAME}").green()
    );
    println!(
        "{}",
        "Run `agent-skills add` and we'll use these defaults automatically.\n".dimmed()
    );
    Ok(())
}

fn choose_agent(session: &InitSession<'_>) -> Result<Option<&'static AgentSpec>> {
    if let Some(flag) = session.tool {
        return require_agent(flag).map(Some);
    }
    if session.prompter.is_interactive() {
        println!("{}", "1. Default Agent".bold());
        println!(
            "{}",
            "Which AI agent do you use most often in this project?".dimmed()
        );
    }
    session.prompter.select_agent()
}

fn choose_repos(session: &InitSession<'_>, args: &InitArgs) -> Result<Vec<String>> {
    if let Some(repos) = &args.repos {
        return Ok(repos.clone());
    }
    if let Some(repo) = session.repo {
        return Ok(vec![repo.to_string()]);
    }
    if session.prompter.is_interactive() {
        println!("{}", "\n2. Repositories".bold());
        println!("{}", format!("Default repository: {DEFAULT_REPO}").dimmed());
    }
    session.prompter.input_repos(DEFAULT_REPO)
}

/// Settings to write. Repositories are recorded only when they differ from
/// the single default repository.
fn settings_for(agent: &AgentSpec, repos: Vec<String>) -> ProjectSettings {
    let repos = repos
        .into_iter()
        .map(|repo| repo.trim().to_string())
        .filter(|repo| !repo.is_empty())
        .collect::<Vec<_>>();
    let is_default = repos.is_empty() || (repos.len() == 1 && repos[0] == DEFAULT_REPO);
    ProjectSettings {
        default_agent: Some(agent.flag.to_string()),
        repos: if is_default { None } else { Some(repos) },
        ..ProjectSettings::default()
    }
}

/// Settings path init writes to for `project_root`.
#[must_use]
pub fn settings_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILENAME)
}
