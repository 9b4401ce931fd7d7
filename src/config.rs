use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agents::{AgentSpec, find_agent};
use crate::core::workflow::SelectionPreference;
use crate::error::{Result, SkillsError};

/// Public repository used when nothing else is configured.
pub const DEFAULT_REPO: &str = "https://github.com/jame2408/agent-skills.git";

/// Project settings file, looked up in the working directory.
pub const CONFIG_FILENAME: &str = ".agent-skills.json";

/// Commits of history fetched per source unless configured otherwise.
pub const DEFAULT_CLONE_DEPTH: u32 = 1;

/// Contents of a settings file. Every field is optional, so the same shape
/// serves as a patch over lower-priority layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub techs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_depth: Option<u32>,
}

impl ProjectSettings {
    /// Write the settings as pretty JSON followed by a newline.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(path, json)
            .map_err(|err| SkillsError::Config(format!("write config {}: {err}", path.display())))
    }
}

/// Effective configuration after layering user settings, project settings and
/// environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub settings: ProjectSettings,
    pub clone_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: ProjectSettings::default(),
            clone_depth: DEFAULT_CLONE_DEPTH,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path (argument or `AGENT_SKILLS_CONFIG`) replaces both the
    /// user-level file and the project file. Otherwise the user-level file is
    /// applied first and `<project_root>/.agent-skills.json` on top of it.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env_string("AGENT_SKILLS_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                SkillsError::Config(format!("config file not found: {}", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(user) = Self::load_user()? {
                config.merge_patch(user);
            }
            if let Some(project) = Self::load_patch(&project_root.join(CONFIG_FILENAME))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    fn load_user() -> Result<Option<ProjectSettings>> {
        match dirs::config_dir() {
            Some(dir) => Self::load_patch(&dir.join("agent-skills").join("config.json")),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ProjectSettings>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SkillsError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = serde_json::from_str(&raw)
            .map_err(|err| SkillsError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ProjectSettings) {
        if let Some(value) = patch.default_agent {
            self.settings.default_agent = Some(value);
        }
        if let Some(value) = patch.repos {
            self.settings.repos = Some(value);
        }
        if let Some(value) = patch.techs {
            self.settings.techs = Some(value);
        }
        if let Some(value) = patch.vcs {
            self.settings.vcs = Some(value);
        }
        if let Some(value) = patch.clone_depth {
            self.clone_depth = value;
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("AGENT_SKILLS_AGENT") {
            self.settings.default_agent = Some(value);
        }
        if let Some(values) = env_list("AGENT_SKILLS_REPOS") {
            self.settings.repos = Some(values);
        }
        if let Some(values) = env_list("AGENT_SKILLS_TECHS") {
            self.settings.techs = Some(values);
        }
        if let Some(value) = env_string("AGENT_SKILLS_VCS") {
            self.settings.vcs = Some(value);
        }
        if let Some(value) = env_u32("AGENT_SKILLS_CLONE_DEPTH")? {
            self.clone_depth = value;
        }
        Ok(())
    }

    /// Source repositories: `flag` if given, else configured repos when
    /// non-empty, else [`DEFAULT_REPO`].
    #[must_use]
    pub fn resolve_repos(&self, flag: Option<&str>) -> Vec<String> {
        if let Some(repo) = flag {
            return vec![repo.to_string()];
        }
        match &self.settings.repos {
            Some(repos) if !repos.is_empty() => repos.clone(),
            _ => vec![DEFAULT_REPO.to_string()],
        }
    }

    /// Configured default agent, ignoring unknown flags.
    #[must_use]
    pub fn default_agent(&self) -> Option<&'static AgentSpec> {
        let flag = self.settings.default_agent.as_deref()?;
        let agent = find_agent(flag);
        if agent.is_none() {
            tracing::warn!(agent = flag, "ignoring unknown default agent");
        }
        agent
    }

    #[must_use]
    pub fn selection_preference(&self) -> SelectionPreference {
        SelectionPreference {
            techs: self.settings.techs.clone(),
            vcs: self.settings.vcs.clone(),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match env_string(key) {
        Some(value) => value.parse::<u32>().map(Some).map_err(|err| {
            SkillsError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        None => Ok(None),
    }
}

fn env_list(key: &str) -> Option<Vec<String>> {
    env_string(key).map(|value| parse_list(&value))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}
