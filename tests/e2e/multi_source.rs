//! E2E Scenario: Several Source Repositories
//!
//! Skills from every configured source are offered together; lookups take
//! the first source that has a match.

use super::fixture::{E2EFixture, skill_manifest};

fn seed_sources(fixture: &mut E2EFixture) {
    fixture.create_skill("team", "git-commit", &skill_manifest("git-commit", "Team commits", None));
    fixture.commit_source("team", "team skills");

    fixture.create_skill(
        "community",
        "git-commit",
        &skill_manifest("git-commit", "Community commits", None),
    );
    fixture.create_skill("community", "docker", &skill_manifest("docker", "Container builds", None));
    fixture.commit_source("community", "community skills");
}

#[test]
fn test_first_source_wins_by_name() {
    let mut fixture = E2EFixture::new("first_source_wins");
    seed_sources(&mut fixture);
    let team = fixture.source_id("team");
    let community = fixture.source_id("community");
    let repos = format!("{team},{community}");

    fixture.log_step("Record both sources");
    let output = fixture.run_skills(&["--robot", "init", "-t", "cursor", "--repos", &repos]);
    fixture.assert_success(&output, "init");

    fixture.log_step("Remote listing keeps both copies");
    let output = fixture.run_skills(&["--robot", "list", "--remote"]);
    fixture.assert_success(&output, "list --remote");
    let json = output.json();
    assert_eq!(json["data"]["count"], 3);
    assert_eq!(json["data"]["skills"][0]["repo"], team.as_str());

    fixture.log_step("Install one skill from each source");
    let output = fixture.run_skills(&["--robot", "add", "git-commit", "docker"]);
    fixture.assert_success(&output, "add");

    let lock = fixture.read_lock(".agents/skills");
    assert_eq!(lock["skills"]["git-commit"]["repo"], team.as_str());
    assert_eq!(lock["skills"]["docker"]["repo"], community.as_str());
    let manifest =
        std::fs::read_to_string(fixture.project.join(".agents/skills/git-commit/SKILL.md"))
            .unwrap();
    assert!(manifest.contains("Team commits"));

    fixture.log_step("Search spans every source");
    let output = fixture.run_skills(&["--robot", "search", "commits"]);
    fixture.assert_success(&output, "search");
    assert_eq!(output.json()["data"]["count"], 2);

    fixture.generate_report();
}

#[test]
fn test_repo_flag_replaces_configured_sources() {
    let mut fixture = E2EFixture::new("repo_flag_overrides");
    seed_sources(&mut fixture);
    let team = fixture.source_id("team");
    let community = fixture.source_id("community");

    fixture.log_step("Configure only the team source");
    let output = fixture.run_skills(&["--robot", "init", "-t", "cursor", "--repos", &team]);
    fixture.assert_success(&output, "init");

    fixture.log_step("Install docker from the community source via --repo");
    let output = fixture.run_skills(&["--robot", "add", "docker", "-r", &community]);
    fixture.assert_success(&output, "add with --repo");
    fixture.assert_project_path(".agents/skills/docker/SKILL.md", true);

    fixture.log_step("Without --repo docker is unknown");
    let output = fixture.run_skills(&["--robot", "info", "docker"]);
    fixture.assert_failure(&output, "info docker");
    assert_eq!(output.json()["status"]["error"]["code"], "SKILL_NOT_FOUND");

    fixture.generate_report();
}

#[test]
fn test_repeated_source_is_fetched_once() {
    let mut fixture = E2EFixture::new("repeated_source");
    seed_sources(&mut fixture);
    let team = fixture.source_id("team");
    let repos = format!("{team},{team}");

    let output = fixture.run_skills(&["--robot", "init", "-t", "cursor", "--repos", &repos]);
    fixture.assert_success(&output, "init");

    let output = fixture.run_skills(&["--robot", "list", "--remote"]);
    fixture.assert_success(&output, "list --remote");
    assert_eq!(output.json()["data"]["count"], 1);

    fixture.generate_report();
}

#[test]
fn test_unreachable_source_aborts_before_installing() {
    let mut fixture = E2EFixture::new("unreachable_source");
    seed_sources(&mut fixture);
    let team = fixture.source_id("team");
    let missing = fixture.source_id("does-not-exist");
    let repos = format!("{team},{missing}");

    let output = fixture.run_skills(&["--robot", "init", "-t", "cursor", "--repos", &repos]);
    fixture.assert_success(&output, "init");

    let output = fixture.run_skills(&["--robot", "add", "git-commit"]);
    fixture.assert_failure(&output, "add");
    assert_eq!(output.json()["status"]["error"]["code"], "FETCH_FAILED");
    fixture.assert_project_path(".agents/skills/git-commit", false);

    fixture.generate_report();
}
