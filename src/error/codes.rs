//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Skill errors
//! - 3xx: Config errors
//! - 5xx: Fetch/network errors
//! - 6xx: Storage errors
//! - 7xx: Git errors
//! - 8xx: Validation errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for robot mode output.
///
/// Each variant maps to a numeric code (e.g., `SkillNotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Skill errors (1xx)
    // ========================================
    /// E101: Requested skill was not found in any source
    SkillNotFound,
    /// E102: Requested skill is not installed in the target directory
    SkillNotInstalled,
    /// E103: Resolved skill directory is missing from the fetched source
    SkillDirectoryMissing,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Settings file has invalid syntax or values
    ConfigInvalid,
    /// E303: Agent flag does not match any known agent
    UnknownAgent,

    // ========================================
    // Fetch errors (5xx)
    // ========================================
    /// E501: A source repository could not be fetched
    FetchFailed,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Git errors (7xx)
    // ========================================
    /// E704: General git error
    GitError,

    // ========================================
    // Validation errors (8xx)
    // ========================================
    /// E801: Input failed validation
    ValidationFailed,
    /// E802: A choice was needed but no terminal is attached
    InteractionRequired,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `SkillNotFound` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::SkillNotFound => 101,
            Self::SkillNotInstalled => 102,
            Self::SkillDirectoryMissing => 103,

            Self::ConfigInvalid => 302,
            Self::UnknownAgent => 303,

            Self::FetchFailed => 501,

            Self::SerializationError => 605,

            Self::GitError => 704,

            Self::ValidationFailed => 801,
            Self::InteractionRequired => 802,

            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::SkillNotFound => "Run `agent-skills list --remote` to see all available skills",
            Self::SkillNotInstalled => "Run `agent-skills list` to see installed skills",
            Self::SkillDirectoryMissing => "The source repository may have changed. Re-run the command to fetch it again",
            Self::ConfigInvalid => "Check the JSON syntax of .agent-skills.json, or recreate it with `agent-skills init --force`",
            Self::UnknownAgent => "Pass one of the listed agent flags with --tool",
            Self::FetchFailed => "Make sure the URL is correct and you have access (SSH key / token)",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::GitError => "Check that the source is a valid git repository",
            Self::ValidationFailed => "Review the validation errors and fix each issue",
            Self::InteractionRequired => "Pass the skill names and --tool explicitly when not running in a terminal",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::SkillNotFound
            | Self::SkillNotInstalled
            | Self::SkillDirectoryMissing
            | Self::ConfigInvalid
            | Self::UnknownAgent
            | Self::FetchFailed
            | Self::GitError
            | Self::ValidationFailed
            | Self::InteractionRequired
            | Self::IoError => true,

            Self::SerializationError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "skill",
            3 => "config",
            5 => "network",
            6 => "storage",
            7 => "git",
            8 => "validation",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::SkillNotFound,
            Self::SkillNotInstalled,
            Self::SkillDirectoryMissing,
            Self::ConfigInvalid,
            Self::UnknownAgent,
            Self::FetchFailed,
            Self::SerializationError,
            Self::GitError,
            Self::ValidationFailed,
            Self::InteractionRequired,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
