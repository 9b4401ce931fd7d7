//! E2E Scenario: Fresh Project Setup
//!
//! Initializes a project settings file, then installs, lists and inspects
//! skills relying only on the recorded defaults.

use super::fixture::{E2EFixture, skill_manifest};

fn seed_source(fixture: &mut E2EFixture) {
    fixture.create_skill(
        "team",
        "git-commit",
        &skill_manifest(
            "git-commit",
            "Write conventional commit messages",
            Some("Use when committing changes"),
        ),
    );
    fixture.create_skill(
        "team",
        "code-review",
        &skill_manifest("code-review", "|\n  Review pull requests\n  Second line", None),
    );
    fixture.write_source_file("team", "skills/code-review/templates/comment.md", "LGTM\n");
    fixture.write_source_file("team", "README.md", "# Team skills\n");
    fixture.commit_source("team", "seed skills");
}

#[test]
fn test_init_then_add_with_recorded_defaults() {
    let mut fixture = E2EFixture::new("init_then_add");
    seed_source(&mut fixture);
    let repo = fixture.source_id("team");

    // Step 1: Record defaults
    fixture.log_step("Initialize project settings");
    let output = fixture.run_skills(&["--robot", "init", "-t", "claude-code", "--repos", &repo]);
    fixture.assert_success(&output, "init");
    let json = output.json();
    assert_eq!(json["data"]["settings"]["defaultAgent"], "claude-code");
    fixture.assert_project_path(".agent-skills.json", true);
    fixture.checkpoint("post_init");

    // Step 2: Browse what the source offers
    fixture.log_step("List remote skills");
    let output = fixture.run_skills(&["--robot", "list", "--remote"]);
    fixture.assert_success(&output, "list --remote");
    let json = output.json();
    assert_eq!(json["data"]["count"], 2);
    let review = json["data"]["skills"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "code-review")
        .unwrap();
    assert_eq!(review["description"], "Review pull requests");

    // Step 3: Install both without --tool or --repo
    fixture.log_step("Add skills using settings");
    let output = fixture.run_skills(&["add", "git-commit", "code-review"]);
    fixture.assert_success(&output, "add");
    fixture.assert_output_contains(&output, "Target agent: Claude Code");
    fixture.assert_output_contains(&output, "Trigger: Use when committing changes");
    fixture.assert_output_contains(&output, "Successfully installed 2 skill(s)");
    fixture.assert_project_path(".claude/skills/git-commit/SKILL.md", true);
    fixture.assert_project_path(".claude/skills/code-review/templates/comment.md", true);
    fixture.assert_project_path(".claude/references", false);
    fixture.checkpoint("post_add");

    let lock = fixture.read_lock(".claude/skills");
    assert_eq!(lock["skills"]["git-commit"]["repo"], repo.as_str());
    assert!(lock["skills"]["code-review"]["installedAt"].is_string());

    // Step 4: Listing shows them under the agent
    fixture.log_step("List installed skills");
    let output = fixture.run_skills(&["list"]);
    fixture.assert_success(&output, "list");
    fixture.assert_output_contains(&output, "Claude Code (.claude/skills/)");
    fixture.assert_output_contains(&output, "Total: 2 skill(s) installed locally");

    // Step 5: Details include the full description and file listing
    fixture.log_step("Show skill details");
    let output = fixture.run_skills(&["--robot", "info", "code-review"]);
    fixture.assert_success(&output, "info");
    let json = output.json();
    assert_eq!(json["data"]["description"], "Review pull requests\nSecond line");
    assert_eq!(json["data"]["files"][1], "templates/comment.md");

    fixture.generate_report();
}

#[test]
fn test_reinstall_overwrites_in_place() {
    let mut fixture = E2EFixture::new("reinstall_overwrites");
    seed_source(&mut fixture);
    let repo = fixture.source_id("team");

    fixture.log_step("Install once");
    let output = fixture.run_skills(&["--robot", "add", "git-commit", "-t", "cursor", "-r", &repo]);
    fixture.assert_success(&output, "first add");

    fixture.log_step("Edit the installed copy locally");
    let installed = fixture.project.join(".agents/skills/git-commit/SKILL.md");
    std::fs::write(&installed, "local edits").unwrap();
    std::fs::write(
        fixture.project.join(".agents/skills/git-commit/extra.md"),
        "kept",
    )
    .unwrap();

    fixture.log_step("Install again");
    let output = fixture.run_skills(&["--robot", "add", "git-commit", "-t", "cursor", "-r", &repo]);
    fixture.assert_success(&output, "second add");

    let content = std::fs::read_to_string(&installed).unwrap();
    assert!(content.contains("Write conventional commit messages"));
    fixture.assert_project_path(".agents/skills/git-commit/extra.md", true);
    let lock = fixture.read_lock(".agents/skills");
    assert_eq!(lock["skills"].as_object().unwrap().len(), 1);

    fixture.generate_report();
}

#[test]
fn test_agents_sharing_a_directory_are_listed_once() {
    let mut fixture = E2EFixture::new("shared_directory");
    seed_source(&mut fixture);
    let repo = fixture.source_id("team");

    fixture.log_step("Install for Codex, which shares .agents/skills");
    let output = fixture.run_skills(&["--robot", "add", "git-commit", "-t", "codex", "-r", &repo]);
    fixture.assert_success(&output, "add");

    fixture.log_step("List installed skills");
    let output = fixture.run_skills(&["--robot", "list"]);
    fixture.assert_success(&output, "list");
    let json = output.json();
    assert_eq!(json["data"]["count"], 1);
    let targets = json["data"]["targets"].as_array().unwrap();
    assert_eq!(targets.len(), 1);

    fixture.generate_report();
}
