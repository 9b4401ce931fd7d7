//! Interactive selection on stderr.
//!
//! Every prompt returns `Ok(None)` when the user cancels (Esc / `q`). When no
//! terminal is attached the prompt fails with
//! [`SkillsError::InteractionRequired`] instead of blocking on stdin.

use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::agents::{AGENTS, AgentSpec};
use crate::core::scan::{LocalInstalledSkill, SkillCandidate};
use crate::error::{Result, SkillsError};

pub struct Prompter {
    term: Term,
    theme: ColorfulTheme,
    enabled: bool,
}

impl Prompter {
    /// Prompter bound to stderr. `enabled = false` (robot mode) makes every
    /// prompt fail rather than ask.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
            enabled,
        }
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.enabled && self.term.is_term() && console::user_attended_stderr()
    }

    fn require(&self, what: &str) -> Result<()> {
        if self.is_interactive() {
            Ok(())
        } else {
            Err(SkillsError::InteractionRequired(what.to_string()))
        }
    }

    pub fn select_one(&self, what: &str, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        self.require(what)?;
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_on_opt(&self.term)?;
        Ok(choice)
    }

    pub fn select_many(
        &self,
        what: &str,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Option<Vec<usize>>> {
        self.require(what)?;
        let chosen = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .defaults(defaults)
            .interact_on_opt(&self.term)?;
        Ok(chosen)
    }

    pub fn confirm(&self, what: &str, prompt: &str, default: bool) -> Result<Option<bool>> {
        self.require(what)?;
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_on_opt(&self.term)?;
        Ok(answer)
    }

    pub fn input(&self, what: &str, prompt: &str, default: &str) -> Result<String> {
        self.require(what)?;
        let value = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text_on(&self.term)?;
        Ok(value)
    }

    // =========================================================================
    // domain prompts
    // =========================================================================

    /// Ask which agent to target. Popular agents come first in the registry,
    /// so registry order is display order.
    pub fn select_agent(&self) -> Result<Option<&'static AgentSpec>> {
        let items: Vec<String> = AGENTS.iter().map(agent_label).collect();
        let choice = self.select_one(
            "choosing an agent (pass --tool)",
            "🛠️  Which AI coding agent are you using?",
            &items,
        )?;
        Ok(choice.and_then(|index| AGENTS.get(index)))
    }

    /// Ask which source skills to install.
    pub fn select_skills<'a>(
        &self,
        skills: &'a [SkillCandidate],
    ) -> Result<Option<Vec<&'a SkillCandidate>>> {
        let items: Vec<String> = skills
            .iter()
            .map(|s| skill_label(&s.name, &s.description))
            .collect();
        let chosen = self.select_many(
            "selecting skills (pass skill names)",
            "📦  Select the skills to install (Space to toggle, Enter to confirm)",
            &items,
            &vec![false; items.len()],
        )?;
        Ok(chosen.map(|indexes| indexes.iter().filter_map(|&i| skills.get(i)).collect()))
    }

    /// Ask which installed skills to remove. Returns directory names.
    pub fn select_installed(&self, skills: &[LocalInstalledSkill]) -> Result<Option<Vec<String>>> {
        let items: Vec<String> = skills
            .iter()
            .map(|s| skill_label(&s.name, &s.description))
            .collect();
        let chosen = self.select_many(
            "selecting skills to remove (pass skill names)",
            "🗑️  Select the skills to remove (Space to toggle, Enter to confirm)",
            &items,
            &vec![false; items.len()],
        )?;
        Ok(chosen.map(|indexes| pick(skills, &indexes, |s| s.dir_name.clone())))
    }

    /// Ask which optional technology topics to install.
    pub fn select_techs(&self, techs: &[String]) -> Result<Option<Vec<String>>> {
        let chosen = self.select_many(
            "selecting reference technologies (set techs in .agent-skills.json)",
            "🧰  Which technologies does this project use?",
            techs,
            &vec![false; techs.len()],
        )?;
        Ok(chosen.map(|indexes| pick(techs, &indexes, Clone::clone)))
    }

    /// Ask which VCS platform's review guide to install.
    pub fn select_vcs(&self, platforms: &[String]) -> Result<Option<String>> {
        let choice = self.select_one(
            "selecting a VCS platform (set vcs in .agent-skills.json)",
            "🌐  Which platform hosts your code reviews?",
            platforms,
        )?;
        Ok(choice.and_then(|index| platforms.get(index).cloned()))
    }

    /// Ask for source repositories as a comma-separated list.
    pub fn input_repos(&self, default_repo: &str) -> Result<Vec<String>> {
        let raw = self.input(
            "choosing repositories (pass --repo)",
            "Skill repositories (comma-separated)",
            default_repo,
        )?;
        let repos = parse_repo_list(&raw);
        if repos.is_empty() {
            return Ok(vec![default_repo.to_string()]);
        }
        Ok(repos)
    }
}

fn agent_label(agent: &AgentSpec) -> String {
    format!("{} (Project: {})", agent.name, agent.project_path)
}

fn skill_label(name: &str, description: &str) -> String {
    let description = if description.is_empty() {
        "No description"
    } else {
        description
    };
    format!(
        "{} {}",
        console::style(name).cyan(),
        console::style(format!("— {description}")).dim()
    )
}

fn pick<T, U>(items: &[T], indexes: &[usize], f: impl Fn(&T) -> U) -> Vec<U> {
    indexes.iter().filter_map(|&i| items.get(i)).map(f).collect()
}

/// Split comma- or whitespace-separated repository identities.
#[must_use]
pub fn parse_repo_list(raw: &str) -> Vec<String> {
    let mut repos: Vec<String> = Vec::new();
    for repo in raw.split(|c: char| c == ',' || c.is_whitespace()) {
        if !repo.is_empty() && !repos.iter().any(|seen| seen == repo) {
            repos.push(repo.to_string());
        }
    }
    repos
}
