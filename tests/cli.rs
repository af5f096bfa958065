use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::str::{contains, starts_with};

fn cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("boostkit");
    cmd.env_remove("BOOSTKIT_LOG");
    cmd
}

#[test]
fn check_matches_injected_command() {
    cmd()
        .args(["script", "check", "@php artisan boost:update --ansi"])
        .assert()
        .success()
        .stdout(starts_with("match\t@php artisan boost:update --ansi"));
}

#[test]
fn check_accepts_dot_prefixed_entry_point() {
    cmd()
        .args(["script", "check", "php .artisan boost:update"])
        .assert()
        .success()
        .stdout(starts_with("match\tphp .artisan boost:update"));
}

#[test]
fn check_rejects_sibling_command() {
    cmd()
        .args(["script", "check", "php artisan boost:updater"])
        .assert()
        .success()
        .stdout(contains("no match"));
}

#[test]
fn check_json() {
    cmd()
        .args(["--json", "script", "check", "  PHP ./ARTISAN boost:update  "])
        .assert()
        .success()
        .stdout(contains("\"matches\": true"))
        .stdout(contains("\"verb\": \"boost:update\""));
}

#[test]
fn targets_lists_catalogue() {
    let project = tempfile::TempDir::new().unwrap();
    cmd()
        .arg("--project-dir")
        .arg(project.path())
        .arg("targets")
        .assert()
        .success()
        .stdout(contains("claude\tClaude Code"))
        .stdout(contains("gemini\tGemini CLI"))
        .stdout(contains("missing"));
}

#[test]
fn unknown_agent_is_a_usage_error() {
    cmd()
        .args(["sync", "--agent", "vim"])
        .assert()
        .failure()
        .stderr(contains("invalid value"));
}

#[test]
fn prune_error_goes_to_stderr_in_text_mode() {
    let project = tempfile::TempDir::new().unwrap();
    std::fs::write(project.path().join("composer.json"), "{").unwrap();
    cmd()
        .arg("--project-dir")
        .arg(project.path())
        .args(["script", "prune"])
        .assert()
        .failure()
        .stderr(contains("error: invalid JSON"));
}
