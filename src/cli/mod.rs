//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;
pub mod progress;
pub mod prompt;

/// Install, update, and manage Agent Skills across AI coding assistants
#[derive(Parser, Debug)]
#[command(name = "agent-skills")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Target AI agent (cursor, claude-code, etc.)
    #[arg(long, short = 't', global = true, value_name = "AGENT")]
    pub tool: Option<String>,

    /// Operate on the user-level global directory instead of the project
    #[arg(long, short = 'g', global = true)]
    pub global: bool,

    /// Override the source repository URL or path
    #[arg(long, short = 'r', global = true, value_name = "URL")]
    pub repo: Option<String>,

    /// Emit machine-readable JSON instead of coloured text
    #[arg(long, global = true, visible_alias = "json")]
    pub robot: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress logging and progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file path (default: ./.agent-skills.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install skills into your project (or globally with -g)
    Add(commands::add::AddArgs),

    /// List installed skills or available remote skills
    #[command(visible_alias = "ls")]
    List(commands::list::ListArgs),

    /// Show detailed information about a skill
    Info(commands::info::InfoArgs),

    /// Search for skills by keyword in the source repositories
    #[command(visible_alias = "find")]
    Search(commands::search::SearchArgs),

    /// Update installed skills to the latest version
    Update(commands::update::UpdateArgs),

    /// Remove installed skills
    #[command(visible_alias = "rm")]
    Remove(commands::remove::RemoveArgs),

    /// Initialize a .agent-skills.json settings file
    Init(commands::init::InitArgs),

    /// Check SKILL.md frontmatter in a skills repository
    Validate(commands::validate::ValidateArgs),
}
