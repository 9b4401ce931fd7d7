//! agent-skills validate - Check SKILL.md frontmatter before publishing

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, robot_ok};
use crate::core::manifest::{SKILL_FILE, lint_manifest};
use crate::core::scan::SKILLS_DIR;
use crate::error::{Result, SkillsError};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Skills repository root, or a skills directory (default: current directory)
    pub path: Option<PathBuf>,
}

/// Problems found in one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestFailure {
    /// Manifest path relative to the validated root, `/`-separated.
    pub file: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeLint {
    pub checked: usize,
    pub failures: Vec<ManifestFailure>,
}

/// Lint every `*/SKILL.md` under the skills directory of `root`.
///
/// `root/skills` is used when it exists, otherwise `root` itself is taken to
/// be the skills directory. Dot-prefixed directories are skipped.
pub fn lint_tree(root: &Path) -> Result<TreeLint> {
    let nested = root.join(SKILLS_DIR);
    let skills_root = if nested.is_dir() { nested } else { root.to_path_buf() };
    if !skills_root.is_dir() {
        return Ok(TreeLint::default());
    }

    let mut entries = fs::read_dir(&skills_root)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut report = TreeLint::default();
    for entry in entries {
        if !entry.file_type()?.is_dir() || entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let manifest = entry.path().join(SKILL_FILE);
        if !manifest.is_file() {
            continue;
        }
        report.checked += 1;
        let document = fs::read_to_string(&manifest)?;
        let errors = lint_manifest(&document);
        if !errors.is_empty() {
            report.failures.push(ManifestFailure {
                file: display_relative(root, &manifest),
                errors,
            });
        }
    }
    Ok(report)
}

fn display_relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let root = match &args.path {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => ctx.project_root.join(path),
        None => ctx.project_root.clone(),
    };
    let report = lint_tree(&root)?;

    if report.failures.is_empty() {
        if ctx.robot_mode {
            return emit_robot(&robot_ok(&report));
        }
        if report.checked == 0 {
            println!("No skills found to validate.");
        } else {
            println!(
                "{}",
                format!(
                    "Validated {} SKILL.md frontmatter file(s).",
                    report.checked
                )
                .green()
            );
        }
        return Ok(());
    }

    if !ctx.robot_mode {
        eprintln!("{}", "Invalid SKILL.md frontmatter detected:\n".red());
        for failure in &report.failures {
            eprintln!("- {}", failure.file);
            for message in &failure.errors {
                eprintln!("  - {message}");
            }
        }
        eprintln!("\nTotal failures: {}", report.failures.len());
    }

    let files: Vec<&str> = report.failures.iter().map(|f| f.file.as_str()).collect();
    Err(SkillsError::ValidationFailed(format!(
        "{} of {} SKILL.md file(s) have invalid frontmatter: {}",
        report.failures.len(),
        report.checked,
        files.join(", ")
    )))
}
