//! E2E test fixture with step logging and checkpointing.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use git2::{IndexAddOption, Repository, Signature, Time};
use tempfile::TempDir;

/// Checkpoint snapshot for test debugging.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub name: String,
    pub timestamp: Duration,
    pub step_count: usize,
    pub installed_files: Vec<PathBuf>,
}

/// Step result for report generation.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub name: String,
    pub success: bool,
    pub duration: Duration,
    pub output_summary: String,
}

/// Isolated project, home directory and skills source repositories.
pub struct E2EFixture {
    /// Test scenario name
    pub scenario_name: String,
    /// Root temp directory
    pub temp_dir: TempDir,
    /// Working directory of every command
    pub project: PathBuf,
    /// `HOME` of every command (global installs land here)
    pub home: PathBuf,
    /// Parent directory of the source repositories
    pub sources: PathBuf,
    start_time: Instant,
    step_count: usize,
    commit_seconds: i64,
    checkpoints: Vec<Checkpoint>,
    step_results: Vec<StepResult>,
}

impl E2EFixture {
    /// Create a fresh E2E test fixture.
    pub fn new(scenario_name: &str) -> Self {
        let start_time = Instant::now();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let project = root.join("project");
        let home = root.join("home");
        let sources = root.join("sources");
        for dir in [&project, &home, &sources] {
            std::fs::create_dir_all(dir).expect("Failed to create fixture dir");
        }

        println!();
        println!("{}", "█".repeat(70));
        println!("█ E2E SCENARIO: {scenario_name}");
        println!("{}", "█".repeat(70));
        println!();
        println!("[E2E] Project: {project:?}");
        println!("[E2E] Home: {home:?}");
        println!("[E2E] Sources: {sources:?}");
        println!();

        Self {
            scenario_name: scenario_name.to_string(),
            temp_dir,
            project,
            home,
            sources,
            start_time,
            step_count: 0,
            commit_seconds: 1_700_000_000,
            checkpoints: Vec::new(),
            step_results: Vec::new(),
        }
    }

    /// Log a step in the E2E workflow.
    pub fn log_step(&mut self, description: &str) {
        self.step_count += 1;
        let elapsed = self.start_time.elapsed();

        println!();
        println!("┌{}", "─".repeat(68));
        println!("│ STEP {}: {}", self.step_count, description);
        println!("│ Time: {elapsed:?}");
        println!("└{}", "─".repeat(68));
    }

    /// Capture a checkpoint listing every file under the project and home.
    pub fn checkpoint(&mut self, name: &str) {
        let timestamp = self.start_time.elapsed();

        let installed_files: Vec<PathBuf> = [&self.project, &self.home]
            .into_iter()
            .flat_map(|dir| walkdir::WalkDir::new(dir).into_iter())
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .collect();

        println!();
        println!("[CHECKPOINT] {name}");
        println!("[CHECKPOINT] Files: {}", installed_files.len());

        self.checkpoints.push(Checkpoint {
            name: name.to_string(),
            timestamp,
            step_count: self.step_count,
            installed_files,
        });
    }

    /// Path of the source repository `name`.
    pub fn source_path(&self, name: &str) -> PathBuf {
        self.sources.join(name)
    }

    /// Source identity usable with `--repo`.
    pub fn source_id(&self, name: &str) -> String {
        self.source_path(name).display().to_string()
    }

    /// Write a file into source repository `name`, creating it as needed.
    pub fn write_source_file(&self, name: &str, relative: &str, content: &str) {
        let path = self.source_path(name).join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("Failed to write source file");
        println!("[SOURCE] {name}: wrote {relative} ({} bytes)", content.len());
    }

    /// Write `skills/<dir_name>/SKILL.md` into source repository `name`.
    pub fn create_skill(&self, source: &str, dir_name: &str, content: &str) {
        self.write_source_file(source, &format!("skills/{dir_name}/SKILL.md"), content);
    }

    /// Commit everything in source repository `name`, initializing it first
    /// if needed. Commit times strictly increase across calls.
    pub fn commit_source(&mut self, name: &str, message: &str) -> String {
        let root = self.source_path(name);
        let repo = Repository::open(&root)
            .or_else(|_| Repository::init(&root))
            .expect("Failed to open repository");

        let mut index = repo.index().expect("Failed to open index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("Failed to stage files");
        index.write().expect("Failed to write index");
        let tree = repo
            .find_tree(index.write_tree().expect("Failed to write tree"))
            .expect("Failed to find tree");

        self.commit_seconds += 60;
        let signature = Signature::new(
            "E2E Tests",
            "e2e@example.com",
            &Time::new(self.commit_seconds, 0),
        )
        .expect("Failed to build signature");
        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        let oid = repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .expect("Failed to commit");
        println!("[SOURCE] {name}: committed {oid} ({message})");
        oid.to_string()
    }

    /// Run the agent-skills CLI and capture output.
    pub fn run_skills(&mut self, args: &[&str]) -> CommandOutput {
        let step_name = format!("agent-skills {}", args.join(" "));
        let start = Instant::now();

        println!();
        println!("[CMD] {step_name}");

        let output = Command::new(env!("CARGO_BIN_EXE_agent-skills"))
            .args(args)
            .env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("AGENT_SKILLS_CONFIG")
            .env_remove("AGENT_SKILLS_AGENT")
            .env_remove("AGENT_SKILLS_REPOS")
            .env_remove("AGENT_SKILLS_TECHS")
            .env_remove("AGENT_SKILLS_VCS")
            .env_remove("AGENT_SKILLS_CLONE_DEPTH")
            .current_dir(&self.project)
            .output()
            .expect("Failed to execute agent-skills");

        let elapsed = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let result = CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout,
            stderr,
            elapsed,
        };

        println!("[CMD] Exit: {} ({elapsed:?})", result.exit_code);
        if !result.stdout.is_empty() {
            println!("[STDOUT] {}", truncate(&result.stdout, 500));
        }
        if !result.stderr.is_empty() {
            println!("[STDERR] {}", result.stderr);
        }

        let summary = if result.success {
            format!("OK ({})", truncate(&result.stdout, 50))
        } else {
            format!("FAIL: {}", truncate(&result.stderr, 100))
        };
        self.step_results.push(StepResult {
            name: step_name,
            success: result.success,
            duration: elapsed,
            output_summary: summary,
        });

        result
    }

    /// Assert command succeeded.
    pub fn assert_success(&self, output: &CommandOutput, operation: &str) {
        assert!(
            output.success,
            "[E2E] {} failed with exit code {}: {}{}",
            operation, output.exit_code, output.stdout, output.stderr
        );
        println!("[ASSERT] {operation} - SUCCESS");
    }

    /// Assert command failed.
    pub fn assert_failure(&self, output: &CommandOutput, operation: &str) {
        assert!(
            !output.success,
            "[E2E] {operation} unexpectedly succeeded: {}",
            output.stdout
        );
        println!("[ASSERT] {operation} - FAILED AS EXPECTED");
    }

    /// Assert output contains expected text.
    pub fn assert_output_contains(&self, output: &CommandOutput, expected: &str) {
        let found = output.stdout.contains(expected) || output.stderr.contains(expected);
        assert!(
            found,
            "[E2E] Output does not contain '{}'\nStdout: {}\nStderr: {}",
            expected,
            truncate(&output.stdout, 500),
            truncate(&output.stderr, 500)
        );
        println!("[ASSERT] Output contains '{expected}' - PASSED");
    }

    /// Assert a path relative to the project exists (or not).
    pub fn assert_project_path(&self, relative: &str, exists: bool) {
        assert_path(&self.project, relative, exists);
    }

    /// Assert a path relative to the home directory exists (or not).
    pub fn assert_home_path(&self, relative: &str, exists: bool) {
        assert_path(&self.home, relative, exists);
    }

    /// Lock ledger of a project-relative target directory.
    pub fn read_lock(&self, target: &str) -> serde_json::Value {
        let raw = std::fs::read_to_string(
            self.project.join(target).join(".agent-skills-lock.json"),
        )
        .expect("lock file should exist");
        serde_json::from_str(&raw).expect("lock file should be valid JSON")
    }

    /// Generate final test report.
    pub fn generate_report(&self) {
        let total_time = self.start_time.elapsed();

        println!();
        println!("{}", "█".repeat(70));
        println!("█ E2E REPORT: {}", self.scenario_name);
        println!("{}", "█".repeat(70));
        println!();

        println!("SUMMARY");
        println!("───────────────────────────────────────────────────");
        println!("Total Steps: {}", self.step_count);
        println!("Checkpoints: {}", self.checkpoints.len());
        println!("Total Time:  {total_time:?}");
        println!();

        println!("STEP RESULTS");
        println!("───────────────────────────────────────────────────");
        for (i, step) in self.step_results.iter().enumerate() {
            let status = if step.success { "✓" } else { "✗" };
            println!("{:2}. {} {} ({:?})", i + 1, status, step.name, step.duration);
            if !step.success {
                println!("     └─ {}", step.output_summary);
            }
        }
        println!();

        println!("CHECKPOINTS");
        println!("───────────────────────────────────────────────────");
        for checkpoint in &self.checkpoints {
            println!(
                "  [{:?}] {} (step {}, {} files)",
                checkpoint.timestamp,
                checkpoint.name,
                checkpoint.step_count,
                checkpoint.installed_files.len()
            );
        }
        println!();
    }
}

impl Drop for E2EFixture {
    fn drop(&mut self) {
        println!();
        println!("{}", "█".repeat(70));
        println!("█ E2E CLEANUP: {}", self.scenario_name);
        println!("█ Total time: {:?}", self.start_time.elapsed());
        println!("█ Temp dir: {:?}", self.temp_dir.path());
        println!("{}", "█".repeat(70));
    }
}

/// Command output structure.
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl CommandOutput {
    /// Parse stdout as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).expect("stdout should be valid JSON")
    }
}

/// Manifest with a name, description and optional trigger.
pub fn skill_manifest(name: &str, description: &str, trigger: Option<&str>) -> String {
    let metadata = trigger.map_or_else(String::new, |t| format!("metadata:\n  trigger: {t}\n"));
    format!("---\nname: {name}\ndescription: {description}\n{metadata}---\n\n# {name}\n")
}

fn assert_path(base: &Path, relative: &str, exists: bool) {
    let path = base.join(relative);
    assert_eq!(
        path.exists(),
        exists,
        "[E2E] expected {path:?} to {}exist",
        if exists { "" } else { "not " }
    );
    println!("[ASSERT] {relative} exists={exists} - PASSED");
}

/// Truncate string for display.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let trimmed: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{trimmed}...")
    }
}
