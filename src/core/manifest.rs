//! SKILL.md manifest parsing.
//!
//! A manifest starts with a `---` line (optionally preceded by a byte-order
//! mark), followed by a YAML block, followed by another `---` line. Anything
//! after the closing delimiter is free-form body text and is ignored here.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;

use crate::error::Result;

/// File name of the manifest inside every skill directory.
pub const SKILL_FILE: &str = "SKILL.md";

static FRONTMATTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A\x{FEFF}?---\r?\n((?s:.*?))\r?\n---\r?(?:\n|\z)")
        .expect("frontmatter regex should compile")
});

/// Metadata declared in a skill's frontmatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillManifest {
    pub name: String,
    /// First non-blank line of the description, for list displays.
    pub description: String,
    /// Entire trimmed description, for detail views.
    pub full_description: String,
    /// Usage hint from `metadata.trigger`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

impl SkillManifest {
    /// Parse a manifest document.
    ///
    /// Returns `None` when the header block is missing, is not valid YAML,
    /// or does not declare a non-empty string `name`. A missing or non-string
    /// `description` yields empty description fields.
    #[must_use]
    pub fn parse(document: &str) -> Option<Self> {
        let block = extract_frontmatter(document)?;
        let parsed: Value = serde_yaml::from_str(block).ok()?;

        let name = match parsed.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => return None,
        };

        let (description, full_description) = match parsed.get("description") {
            Some(Value::String(text)) => (short_description(text), text.trim().to_string()),
            _ => (String::new(), String::new()),
        };

        let trigger = parsed
            .get("metadata")
            .and_then(|meta| meta.get("trigger"))
            .and_then(Value::as_str)
            .map(|trigger| trigger.trim().to_string());

        Some(Self {
            name,
            description,
            full_description,
            trigger,
        })
    }
}

/// Return the raw YAML between the opening and closing `---` lines.
#[must_use]
pub fn extract_frontmatter(document: &str) -> Option<&str> {
    FRONTMATTER_REGEX
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|block| block.as_str())
}

/// First line of `text` that is non-empty after trimming.
#[must_use]
pub fn short_description(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Whether a skill needs the shared references tree installed next to it.
///
/// This is a textual check: any mention of a `references/` (or
/// `references\`) path in the manifest counts.
#[must_use]
pub fn requires_references(document: &str) -> bool {
    document.contains("references/") || document.contains("references\\")
}

/// Read the manifest document of the skill at `skill_dir`, if it has one.
pub fn read_manifest_document(skill_dir: &Path) -> Result<Option<String>> {
    crate::utils::fs::read_optional(skill_dir.join(SKILL_FILE))
}

/// Whether the skill at `skill_dir` needs the shared references tree.
///
/// A skill without a manifest needs nothing.
pub fn skill_requires_references(skill_dir: &Path) -> Result<bool> {
    Ok(read_manifest_document(skill_dir)?.is_some_and(|document| requires_references(&document)))
}

/// Problems that make a manifest unfit for publishing.
///
/// Stricter than [`SkillManifest::parse`]: a description is mandatory, and
/// `metadata` and `metadata.trigger` must have the right shapes when present.
#[must_use]
pub fn lint_manifest(document: &str) -> Vec<String> {
    let Some(block) = extract_frontmatter(document) else {
        return vec![
            "Missing or invalid YAML frontmatter block (expected --- ... --- at file start)"
                .to_string(),
        ];
    };
    let parsed: Value = match serde_yaml::from_str(block) {
        Ok(parsed) => parsed,
        Err(err) => return vec![format!("YAML parse error: {err}")],
    };

    let mut problems = Vec::new();
    let non_empty = |key: &str| {
        parsed
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|text| !text.trim().is_empty())
    };
    if !non_empty("name") {
        problems.push("Frontmatter field 'name' must be a non-empty string".to_string());
    }
    if !non_empty("description") {
        problems.push("Frontmatter field 'description' must be a non-empty string".to_string());
    }
    match parsed.get("metadata") {
        None | Some(Value::Null) => {}
        Some(Value::Mapping(meta)) => {
            if meta.get("trigger").is_some_and(|trigger| !trigger.is_string()) {
                problems.push(
                    "Frontmatter field 'metadata.trigger' must be a string when present"
                        .to_string(),
                );
            }
        }
        Some(_) => {
            problems.push("Frontmatter field 'metadata' must be an object when present".to_string());
        }
    }
    problems
}
