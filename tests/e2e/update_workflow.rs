//! E2E Scenario: Keeping Installed Skills Current
//!
//! Installs skills from a git source, changes the source, and checks that
//! update refreshes exactly the skills whose content moved.

use super::fixture::{E2EFixture, skill_manifest};

fn seed_source(fixture: &mut E2EFixture) {
    fixture.create_skill("team", "git-commit", &skill_manifest("git-commit", "Commits", None));
    fixture.create_skill(
        "team",
        "reviewer",
        &format!(
            "{}\nSee references/general/style.md before reviewing.\n",
            skill_manifest("reviewer", "Reviews code", None)
        ),
    );
    fixture.write_source_file("team", "references/general/style.md", "style v1");
    fixture.write_source_file("team", "references/python/typing.md", "typing v1");
    fixture.write_source_file("team", "references/go/modules.md", "modules v1");
    fixture.write_source_file("team", "references/vcs/vcs-platform-commands.ref.md", "cmds");
    fixture.write_source_file(
        "team",
        "references/vcs/code-review-posting-github.ref.md",
        "github",
    );
    fixture.write_source_file(
        "team",
        "references/vcs/code-review-posting-gitlab.ref.md",
        "gitlab",
    );
    fixture.commit_source("team", "seed skills");
}

fn statuses(json: &serde_json::Value) -> Vec<(String, String)> {
    let mut all: Vec<(String, String)> = json["data"]["targets"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|target| target["skills"].as_array().unwrap().clone())
        .map(|skill| {
            (
                skill["name"].as_str().unwrap().to_string(),
                skill["status"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    all.sort();
    all
}

#[test]
fn test_update_follows_source_changes() {
    let mut fixture = E2EFixture::new("update_follows_source");
    seed_source(&mut fixture);
    let repo = fixture.source_id("team");

    fixture.log_step("Install both skills with python and github references");
    let output = fixture.run_skills(&[
        "--robot", "add", "git-commit", "reviewer", "-t", "claude-code", "-r", &repo, "--techs",
        "python", "--vcs", "github",
    ]);
    fixture.assert_success(&output, "add");
    fixture.assert_project_path(".claude/references/python/typing.md", true);
    fixture.assert_project_path(".claude/references/go", false);
    let first_lock = fixture.read_lock(".claude/skills");
    fixture.checkpoint("post_add");

    fixture.log_step("Update with nothing changed");
    let output = fixture.run_skills(&["--robot", "update", "-r", &repo]);
    fixture.assert_success(&output, "update (no-op)");
    let json = output.json();
    assert_eq!(json["data"]["updated"], 0);
    assert_eq!(
        statuses(&json),
        vec![
            ("git-commit".to_string(), "up_to_date".to_string()),
            ("reviewer".to_string(), "up_to_date".to_string()),
        ]
    );

    fixture.log_step("Change only the shared references");
    fixture.write_source_file("team", "references/python/typing.md", "typing v2");
    fixture.write_source_file("team", "references/python/protocols.md", "protocols");
    fixture.commit_source("team", "expand python references");

    let output = fixture.run_skills(&["--robot", "update", "-r", &repo]);
    fixture.assert_success(&output, "update (references)");
    let json = output.json();
    assert_eq!(json["data"]["updated"], 1);
    assert_eq!(
        statuses(&json),
        vec![
            ("git-commit".to_string(), "up_to_date".to_string()),
            ("reviewer".to_string(), "updated".to_string()),
        ]
    );
    let typing =
        std::fs::read_to_string(fixture.project.join(".claude/references/python/typing.md"))
            .unwrap();
    assert_eq!(typing, "typing v2");
    fixture.assert_project_path(".claude/references/python/protocols.md", true);
    // The installed selection is reused: no new techs, same platform.
    fixture.assert_project_path(".claude/references/go", false);
    fixture.assert_project_path(
        ".claude/references/vcs/code-review-posting-gitlab.ref.md",
        false,
    );

    let lock = fixture.read_lock(".claude/skills");
    assert_eq!(
        lock["skills"]["git-commit"]["version"],
        first_lock["skills"]["git-commit"]["version"]
    );
    assert_ne!(
        lock["skills"]["reviewer"]["version"],
        first_lock["skills"]["reviewer"]["version"]
    );
    fixture.checkpoint("post_update");

    fixture.generate_report();
}

#[test]
fn test_update_named_skill_and_missing_skill() {
    let mut fixture = E2EFixture::new("update_named_and_missing");
    seed_source(&mut fixture);
    let repo = fixture.source_id("team");

    fixture.log_step("Install git-commit");
    let output = fixture.run_skills(&["--robot", "add", "git-commit", "-t", "cursor", "-r", &repo]);
    fixture.assert_success(&output, "add");

    fixture.log_step("Drop a hand-made skill into the target");
    std::fs::create_dir_all(fixture.project.join(".agents/skills/local-only")).unwrap();
    std::fs::write(
        fixture.project.join(".agents/skills/local-only/SKILL.md"),
        skill_manifest("local-only", "Not from any source", None),
    )
    .unwrap();

    fixture.log_step("Change git-commit upstream");
    fixture.create_skill("team", "git-commit", &skill_manifest("git-commit", "Commits v2", None));
    fixture.commit_source("team", "git-commit v2");

    fixture.log_step("Update only local-only");
    let output = fixture.run_skills(&["--robot", "update", "local-only", "-r", &repo]);
    fixture.assert_success(&output, "update local-only");
    let json = output.json();
    assert_eq!(json["data"]["updated"], 0);
    assert_eq!(
        statuses(&json),
        vec![("local-only".to_string(), "missing_from_sources".to_string())]
    );

    fixture.log_step("Update everything in human mode");
    let output = fixture.run_skills(&["update", "-r", &repo]);
    fixture.assert_success(&output, "update all");
    fixture.assert_output_contains(&output, "git-commit — updated");
    fixture.assert_output_contains(&output, "local-only — not found in remote, skipping");
    fixture.assert_output_contains(&output, "Updated 1 skill(s) successfully.");

    fixture.generate_report();
}

#[test]
fn test_unversioned_source_keeps_local_edits() {
    let mut fixture = E2EFixture::new("unversioned_source");
    fixture.create_skill("plain", "notes", &skill_manifest("notes", "Plain directory", None));
    let repo = fixture.source_id("plain");

    fixture.log_step("Install from a directory that is not a repository");
    let output = fixture.run_skills(&["--robot", "add", "notes", "-t", "cursor", "-r", &repo]);
    fixture.assert_success(&output, "add");
    let lock = fixture.read_lock(".agents/skills");
    assert_eq!(lock["skills"]["notes"]["version"], "unknown");

    fixture.log_step("Edit the installed copy");
    let installed = fixture.project.join(".agents/skills/notes/SKILL.md");
    let edited = skill_manifest("notes", "Edited locally", None);
    std::fs::write(&installed, &edited).unwrap();
    let lock_before = std::fs::read_to_string(fixture.project.join(".agents/skills/.agent-skills-lock.json")).unwrap();

    fixture.log_step("Update leaves matching unknown markers alone");
    let output = fixture.run_skills(&["--robot", "update", "-r", &repo]);
    fixture.assert_success(&output, "update");
    assert_eq!(output.json()["data"]["updated"], 0);
    assert_eq!(std::fs::read_to_string(&installed).unwrap(), edited);
    let lock_after = std::fs::read_to_string(fixture.project.join(".agents/skills/.agent-skills-lock.json")).unwrap();
    assert_eq!(lock_before, lock_after);

    fixture.generate_report();
}

#[test]
fn test_global_update_leaves_project_alone() {
    let mut fixture = E2EFixture::new("global_update");
    seed_source(&mut fixture);
    let repo = fixture.source_id("team");

    fixture.log_step("Install globally and into the project");
    let output = fixture.run_skills(&["--robot", "-g", "add", "git-commit", "-t", "codex", "-r", &repo]);
    fixture.assert_success(&output, "global add");
    let output = fixture.run_skills(&["--robot", "add", "git-commit", "-t", "codex", "-r", &repo]);
    fixture.assert_success(&output, "project add");
    fixture.assert_home_path(".codex/skills/git-commit/SKILL.md", true);

    fixture.log_step("Change upstream and update globally");
    fixture.create_skill("team", "git-commit", &skill_manifest("git-commit", "Commits v3", None));
    fixture.commit_source("team", "git-commit v3");
    let output = fixture.run_skills(&["--robot", "-g", "update", "-r", &repo]);
    fixture.assert_success(&output, "global update");
    let json = output.json();
    assert_eq!(json["data"]["scope"], "global");
    assert_eq!(json["data"]["updated"], 1);

    let global = std::fs::read_to_string(fixture.home.join(".codex/skills/git-commit/SKILL.md"))
        .unwrap();
    let project =
        std::fs::read_to_string(fixture.project.join(".agents/skills/git-commit/SKILL.md"))
            .unwrap();
    assert!(global.contains("Commits v3"));
    assert!(!project.contains("Commits v3"));

    fixture.generate_report();
}
