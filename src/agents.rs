//! Supported AI coding agents and where each one looks for skills.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, SkillsError};

/// One supported agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentSpec {
    /// Display name.
    pub name: &'static str,
    /// Value accepted by `--tool`.
    pub flag: &'static str,
    /// Skills directory relative to the project root.
    pub project_path: &'static str,
    /// Skills directory relative to the home directory.
    pub global_path: &'static str,
}

const fn agent(
    name: &'static str,
    flag: &'static str,
    project_path: &'static str,
    global_path: &'static str,
) -> AgentSpec {
    AgentSpec {
        name,
        flag,
        project_path,
        global_path,
    }
}

/// Every known agent. Popular agents come first, the rest alphabetically.
pub static AGENTS: &[AgentSpec] = &[
    agent("Cursor", "cursor", ".agents/skills", ".cursor/skills"),
    agent("Claude Code", "claude-code", ".claude/skills", ".claude/skills"),
    agent("GitHub Copilot", "github-copilot", ".agents/skills", ".copilot/skills"),
    agent("Gemini CLI", "gemini-cli", ".agents/skills", ".gemini/skills"),
    agent("Antigravity", "antigravity", ".agent/skills", ".gemini/antigravity/skills"),
    agent("Codex", "codex", ".agents/skills", ".codex/skills"),
    agent("Windsurf", "windsurf", ".windsurf/skills", ".codeium/windsurf/skills"),
    agent("Roo Code", "roo", ".roo/skills", ".roo/skills"),
    agent("Cline", "cline", ".cline/skills", ".cline/skills"),
    agent("Amp", "amp", ".agents/skills", ".config/agents/skills"),
    agent("Augment", "augment", ".augment/skills", ".augment/skills"),
    agent("CodeBuddy", "codebuddy", ".codebuddy/skills", ".codebuddy/skills"),
    agent("Command Code", "command-code", ".commandcode/skills", ".commandcode/skills"),
    agent("Continue", "continue", ".continue/skills", ".continue/skills"),
    agent("Cortex Code", "cortex", ".cortex/skills", ".snowflake/cortex/skills"),
    agent("Crush", "crush", ".crush/skills", ".config/crush/skills"),
    agent("Droid", "droid", ".factory/skills", ".factory/skills"),
    agent("Goose", "goose", ".goose/skills", ".config/goose/skills"),
    agent("iFlow CLI", "iflow-cli", ".iflow/skills", ".iflow/skills"),
    agent("Junie", "junie", ".junie/skills", ".junie/skills"),
    agent("Kilo Code", "kilo", ".kilocode/skills", ".kilocode/skills"),
    agent("Kimi Code CLI", "kimi-cli", ".agents/skills", ".config/agents/skills"),
    agent("Kiro CLI", "kiro-cli", ".kiro/skills", ".kiro/skills"),
    agent("Kode", "kode", ".kode/skills", ".kode/skills"),
    agent("MCPJam", "mcpjam", ".mcpjam/skills", ".mcpjam/skills"),
    agent("Mistral Vibe", "mistral-vibe", ".vibe/skills", ".vibe/skills"),
    agent("Mux", "mux", ".mux/skills", ".mux/skills"),
    agent("Neovate", "neovate", ".neovate/skills", ".neovate/skills"),
    agent("OpenClaw", "openclaw", "skills", ".openclaw/skills"),
    agent("OpenCode", "opencode", ".agents/skills", ".config/opencode/skills"),
    agent("OpenHands", "openhands", ".openhands/skills", ".openhands/skills"),
    agent("Pi", "pi", ".pi/skills", ".pi/agent/skills"),
    agent("Pochi", "pochi", ".pochi/skills", ".pochi/skills"),
    agent("Qoder", "qoder", ".qoder/skills", ".qoder/skills"),
    agent("Qwen Code", "qwen-code", ".qwen/skills", ".qwen/skills"),
    agent("Replit", "replit", ".agents/skills", ".config/agents/skills"),
    agent("Trae", "trae", ".trae/skills", ".trae/skills"),
    agent("Trae CN", "trae-cn", ".trae/skills", ".trae-cn/skills"),
    agent("Universal", "universal", ".agents/skills", ".config/agents/skills"),
    agent("Zencoder", "zencoder", ".zencoder/skills", ".zencoder/skills"),
    agent("AdaL", "adal", ".adal/skills", ".adal/skills"),
];

/// Agents listed first in interactive selection.
pub const POPULAR_AGENT_FLAGS: &[&str] = &[
    "cursor",
    "claude-code",
    "github-copilot",
    "gemini-cli",
    "antigravity",
    "codex",
    "windsurf",
    "roo",
    "cline",
];

#[must_use]
pub fn find_agent(flag: &str) -> Option<&'static AgentSpec> {
    AGENTS.iter().find(|agent| agent.flag == flag)
}

/// Look up `flag`, failing with the list of valid flags.
pub fn require_agent(flag: &str) -> Result<&'static AgentSpec> {
    find_agent(flag).ok_or_else(|| SkillsError::UnknownAgent {
        flag: flag.to_string(),
        valid: all_flags().into_iter().map(String::from).collect(),
    })
}

#[must_use]
pub fn all_flags() -> Vec<&'static str> {
    AGENTS.iter().map(|agent| agent.flag).collect()
}

impl AgentSpec {
    #[must_use]
    pub fn is_popular(&self) -> bool {
        POPULAR_AGENT_FLAGS.contains(&self.flag)
    }

    /// Relative skills path for the chosen scope.
    #[must_use]
    pub const fn scope_path(&self, global: bool) -> &'static str {
        if global { self.global_path } else { self.project_path }
    }

    /// Absolute install directory: `<home>/<global_path>` for global scope,
    /// `<project_root>/<project_path>` otherwise.
    #[must_use]
    pub fn install_dir(&self, global: bool, project_root: &Path, home: &Path) -> PathBuf {
        let base = if global { home } else { project_root };
        base.join(self.scope_path(global))
    }
}

/// Distinct install directories across every agent, in registry order, each
/// with the first agent that uses it.
#[must_use]
pub fn distinct_install_dirs(
    global: bool,
    project_root: &Path,
    home: &Path,
) -> Vec<(&'static AgentSpec, PathBuf)> {
    let mut dirs: Vec<(&'static AgentSpec, PathBuf)> = Vec::new();
    for agent in AGENTS {
        let dir = agent.install_dir(global, project_root, home);
        if dirs.iter().all(|(_, seen)| *seen != dir) {
            dirs.push((agent, dir));
        }
    }
    dirs
}
