// ABOUTME: Integration tests for the hoist CLI commands.
// ABOUTME: Validates --help output, init behavior, and deploy preconditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn hoist_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hoist"));
    cmd.env_remove("HOIST_ACCESS_TOKEN");
    cmd
}

#[test]
fn help_shows_commands() {
    hoist_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("hoist.yml");

    hoist_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--app", "web"])
        .assert()
        .success();

    assert!(config_path.exists(), "hoist.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("app: web"), "config should name the app");
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("hoist.yml");

    fs::write(&config_path, "app: existing").unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "app: existing");
}

#[test]
fn init_force_overwrites() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("hoist.yml");
    fs::write(&config_path, "app: existing").unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--app", "fresh", "--force"])
        .assert()
        .success();

    assert!(fs::read_to_string(&config_path).unwrap().contains("app: fresh"));
}

#[test]
fn deploy_requires_access_token() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("hoist.yml"), "app: web\n").unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .args(["deploy", "nginx:latest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HOIST_ACCESS_TOKEN"));
}

#[test]
fn deploy_requires_app_name() {
    let temp_dir = tempfile::tempdir().unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .env("HOIST_ACCESS_TOKEN", "token")
        .args(["deploy", "nginx:latest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no app name"));
}

#[test]
fn deploy_reads_app_from_config_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    let elsewhere = temp_dir.path().join("deploy");
    fs::create_dir(&elsewhere).unwrap();
    fs::write(elsewhere.join("hoist.yml"), "app: web\n").unwrap();

    // The app name is found, so the next precondition (the token) is what fails
    hoist_cmd()
        .current_dir(temp_dir.path())
        .args(["--config", "deploy", "deploy", "nginx:latest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HOIST_ACCESS_TOKEN"));
}

#[test]
fn missing_config_flag_target_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .env("HOIST_ACCESS_TOKEN", "token")
        .args(["deploy", "nginx:latest", "--config", "custom.yaml", "--app", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn quiet_and_json_conflict() {
    hoist_cmd()
        .args(["--quiet", "--json", "status"])
        .assert()
        .failure();
}
