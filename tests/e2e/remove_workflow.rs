//! E2E Scenario: Removing Skills
//!
//! Covers ledger bookkeeping on removal and cleanup of the shared
//! references tree once the last skill needing it is gone.

use super::fixture::{E2EFixture, skill_manifest};

fn seed_source(fixture: &mut E2EFixture) {
    fixture.create_skill("team", "plain", &skill_manifest("plain", "No references", None));
    for name in ["reviewer", "planner"] {
        fixture.create_skill(
            "team",
            name,
            &format!(
                "{}\nRead references/general/style.md first.\n",
                skill_manifest(name, "Needs references", None)
            ),
        );
    }
    fixture.write_source_file("team", "references/general/style.md", "style");
    fixture.commit_source("team", "seed skills");
}

#[test]
fn test_references_removed_with_last_dependent_skill() {
    let mut fixture = E2EFixture::new("references_cleanup");
    seed_source(&mut fixture);
    let repo = fixture.source_id("team");

    fixture.log_step("Install three skills");
    let output = fixture.run_skills(&[
        "--robot", "add", "plain", "reviewer", "planner", "-t", "claude-code", "-r", &repo,
    ]);
    fixture.assert_success(&output, "add");
    fixture.assert_project_path(".claude/references/general/style.md", true);
    fixture.checkpoint("post_add");

    fixture.log_step("Remove one skill that needs references");
    let output = fixture.run_skills(&["--robot", "remove", "reviewer", "-t", "claude-code"]);
    fixture.assert_success(&output, "remove reviewer");
    let json = output.json();
    assert_eq!(json["data"]["references_cleaned"], false);
    fixture.assert_project_path(".claude/references/general/style.md", true);

    fixture.log_step("Remove the last skill that needs references");
    let output = fixture.run_skills(&["remove", "planner", "-t", "claude-code"]);
    fixture.assert_success(&output, "remove planner");
    fixture.assert_output_contains(&output, "Cleaned up unused references directory.");
    fixture.assert_project_path(".claude/references", false);
    fixture.assert_project_path(".claude/skills/plain/SKILL.md", true);

    let lock = fixture.read_lock(".claude/skills");
    let names: Vec<&String> = lock["skills"].as_object().unwrap().keys().collect();
    assert_eq!(names, vec!["plain"]);
    fixture.checkpoint("post_remove");

    fixture.generate_report();
}

#[test]
fn test_remove_validates_every_name_first() {
    let mut fixture = E2EFixture::new("remove_validation");
    seed_source(&mut fixture);
    let repo = fixture.source_id("team");

    fixture.log_step("Install two skills");
    let output = fixture.run_skills(&["--robot", "add", "plain", "reviewer", "-t", "cursor", "-r", &repo]);
    fixture.assert_success(&output, "add");

    fixture.log_step("Remove with one unknown name");
    let output = fixture.run_skills(&["remove", "plain", "ghost", "-t", "cursor"]);
    fixture.assert_failure(&output, "remove with unknown name");
    fixture.assert_output_contains(&output, "ghost");
    fixture.assert_project_path(".agents/skills/plain", true);

    fixture.log_step("Remove by manifest name, twice in one call");
    let output = fixture.run_skills(&["--robot", "rm", "plain", "plain", "-t", "cursor"]);
    fixture.assert_success(&output, "remove duplicate names");
    assert_eq!(output.json()["data"]["removed"].as_array().unwrap().len(), 1);
    fixture.assert_project_path(".agents/skills/plain", false);

    fixture.generate_report();
}

#[test]
fn test_remove_from_empty_target() {
    let mut fixture = E2EFixture::new("remove_empty");

    fixture.log_step("Remove with nothing installed");
    let output = fixture.run_skills(&["remove", "anything", "-t", "windsurf"]);
    fixture.assert_success(&output, "remove");
    fixture.assert_output_contains(&output, "No skills installed for this agent.");

    fixture.generate_report();
}
