//! Per-invocation application context.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::agents::{AgentSpec, distinct_install_dirs, require_agent};
use crate::cli::Cli;
use crate::cli::progress::ProgressReporter;
use crate::cli::prompt::Prompter;
use crate::config::Config;
use crate::core::sources::SourceSet;
use crate::error::{Result, SkillsError};
use crate::fetch::{GitFetcher, SourceFetcher};

/// Everything a command needs: resolved configuration, global flags and the
/// collaborators used to reach the outside world.
pub struct AppContext {
    pub config: Config,
    pub robot_mode: bool,
    pub quiet: bool,
    /// Operate on the user-level directory instead of the project.
    pub global: bool,
    /// `--tool` as given on the command line.
    pub tool: Option<String>,
    /// `--repo` as given on the command line.
    pub repo: Option<String>,
    pub project_root: PathBuf,
    pub home: Option<PathBuf>,
    pub fetcher: Box<dyn SourceFetcher>,
    pub prompter: Prompter,
    pub progress: ProgressReporter,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;
        let fetcher = Box::new(GitFetcher::new(config.clone_depth));
        Ok(Self {
            robot_mode: cli.robot,
            quiet: cli.quiet,
            global: cli.global,
            tool: cli.tool.clone(),
            repo: cli.repo.clone(),
            project_root,
            home: dirs::home_dir(),
            fetcher,
            prompter: Prompter::new(!cli.robot),
            progress: ProgressReporter::new(cli.robot, cli.quiet),
            config,
        })
    }

    /// Context with explicit collaborators and no terminal interaction.
    #[must_use]
    pub fn with_fetcher(
        config: Config,
        project_root: &Path,
        home: Option<&Path>,
        fetcher: Box<dyn SourceFetcher>,
    ) -> Self {
        Self {
            config,
            robot_mode: true,
            quiet: true,
            global: false,
            tool: None,
            repo: None,
            project_root: project_root.to_path_buf(),
            home: home.map(Path::to_path_buf),
            fetcher,
            prompter: Prompter::new(false),
            progress: ProgressReporter::new(true, true),
        }
    }

    /// Resolve the target agent: `--tool`, then the configured default,
    /// then an interactive prompt. `Ok(None)` means the prompt was cancelled.
    pub fn resolve_agent(&self) -> Result<Option<&'static AgentSpec>> {
        if let Some(flag) = &self.tool {
            return require_agent(flag).map(Some);
        }
        if let Some(agent) = self.config.default_agent() {
            return Ok(Some(agent));
        }
        self.prompter.select_agent()
    }

    /// Home directory, required for global scope.
    pub fn home_dir(&self) -> Result<&Path> {
        self.home
            .as_deref()
            .ok_or_else(|| SkillsError::Config("could not determine home directory".into()))
    }

    /// Install directory of `agent` in the chosen scope.
    pub fn install_dir(&self, agent: &AgentSpec) -> Result<PathBuf> {
        if self.global {
            Ok(agent.install_dir(true, &self.project_root, self.home_dir()?))
        } else {
            Ok(agent.install_dir(false, &self.project_root, Path::new("")))
        }
    }

    /// Distinct install directories of every agent in the chosen scope.
    pub fn agent_dirs(&self) -> Result<Vec<(&'static AgentSpec, PathBuf)>> {
        let home = if self.global {
            self.home_dir()?
        } else {
            Path::new("")
        };
        Ok(distinct_install_dirs(self.global, &self.project_root, home))
    }

    /// Repositories to read skills from.
    #[must_use]
    pub fn repos(&self) -> Vec<String> {
        self.config.resolve_repos(self.repo.as_deref())
    }

    /// Fetch every configured source, reporting progress on stderr.
    pub fn fetch_sources(&self, operation: &str) -> Result<SourceSet> {
        let repos = self.repos();
        let spinner = self.progress.spinner(operation);
        match SourceSet::fetch_all(self.fetcher.as_ref(), &repos) {
            Ok(sources) => {
                spinner.finish_with_message(&format!(
                    "Found {} skill(s) in {} source(s)",
                    sources.candidates().len(),
                    repos.len()
                ));
                Ok(sources)
            }
            Err(err) => {
                spinner.abandon_with_message("Fetch failed");
                Err(err)
            }
        }
    }

    /// Print the "Target agent" banner used by add and remove.
    pub fn announce_agent(&self, agent: &AgentSpec) {
        if self.robot_mode {
            return;
        }
        let scope = if self.global {
            " (global)".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "{}{scope}",
            format!("\n🎯 Target agent: {}", agent.name.bold()).cyan()
        );
    }
}
