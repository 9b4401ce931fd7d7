//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use colored::Colorize;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod add;
pub mod info;
pub mod init;
pub mod list;
pub mod remove;
pub mod search;
pub mod update;
pub mod validate;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Add(args) => add::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Info(args) => info::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Update(args) => update::run(ctx, args),
        Commands::Remove(args) => remove::run(ctx, args),
        Commands::Init(args) => init::run(ctx, args),
        Commands::Validate(args) => validate::run(ctx, args),
    }
}

/// Notice for a prompt the user backed out of. Prompts never run in robot
/// mode, so this is human output only.
pub(crate) fn report_cancelled() -> Result<()> {
    println!("{}", "\nOperation cancelled.".yellow());
    Ok(())
}
