//! Error handling for agent-skills.
//!
//! This module provides:
//! - [`SkillsError`]: The main error enum for all operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Serializable error shape for robot output

mod codes;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;

/// Main error type for agent-skills operations.
#[derive(Error, Debug)]
pub enum SkillsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown agent \"{flag}\". Valid agents: {}", .valid.join(", "))]
    UnknownAgent { flag: String, valid: Vec<String> },

    #[error("Skill \"{name}\" not found. Available: {}", .available.join(", "))]
    SkillNotFound { name: String, available: Vec<String> },

    #[error("Skill \"{name}\" is not installed. Installed: {}", .installed.join(", "))]
    SkillNotInstalled { name: String, installed: Vec<String> },

    #[error(
        "Skill directory \"{dir_name}\" not found at expected path: {}\nThe repository may have an unexpected structure or the skill was removed.",
        .path.display()
    )]
    SkillDirectoryMissing { dir_name: String, path: PathBuf },

    #[error("Failed to fetch repository: {identity}\n{reason}")]
    FetchFailed { identity: String, reason: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("{0} requires an interactive terminal")]
    InteractionRequired(String),
}

impl SkillsError {
    /// Get the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) | Self::Prompt(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Yaml(_) => ErrorCode::SerializationError,
            Self::Git(_) => ErrorCode::GitError,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::UnknownAgent { .. } => ErrorCode::UnknownAgent,
            Self::SkillNotFound { .. } => ErrorCode::SkillNotFound,
            Self::SkillNotInstalled { .. } => ErrorCode::SkillNotInstalled,
            Self::SkillDirectoryMissing { .. } => ErrorCode::SkillDirectoryMissing,
            Self::FetchFailed { .. } => ErrorCode::FetchFailed,
            Self::ValidationFailed(_) => ErrorCode::ValidationFailed,
            Self::InteractionRequired(_) => ErrorCode::InteractionRequired,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::UnknownAgent { flag, valid } => {
                Some(serde_json::json!({ "agent": flag, "valid": valid }))
            }
            Self::SkillNotFound { name, available } => {
                Some(serde_json::json!({ "skill": name, "available": available }))
            }
            Self::SkillNotInstalled { name, installed } => {
                Some(serde_json::json!({ "skill": name, "installed": installed }))
            }
            Self::SkillDirectoryMissing { dir_name, path } => Some(serde_json::json!({
                "dir_name": dir_name,
                "path": path.display().to_string(),
            })),
            Self::FetchFailed { identity, .. } => Some(serde_json::json!({ "repo": identity })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "SKILL_NOT_FOUND")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    pub recoverable: bool,

    /// Error category (e.g., "skill", "config", "network")
    pub category: String,
}

impl StructuredError {
    #[must_use]
    pub fn from_error(err: &SkillsError) -> Self {
        let code = err.code();
        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion: code.suggestion().to_string(),
            context: err.context(),
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&SkillsError> for StructuredError {
    fn from(err: &SkillsError) -> Self {
        Self::from_error(err)
    }
}

/// Result type alias using `SkillsError`.
pub type Result<T> = std::result::Result<T, SkillsError>;
