//! Failures: exit code 1 and a readable message on stderr.

use std::fs;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd_in(dir: &TempDir) -> assert_cmd::Command {
    let config = dir.path().join("churn.toml");
    fs::write(&config, "").unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("create-churn");
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn unknown_flag_exits_with_one() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["app", "--foo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown flag: --foo"));

    assert!(!dir.path().join("app").exists());
}

#[test]
fn existing_project_is_refused() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("taken");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("keep.txt"), "mine").unwrap();

    cmd_in(&dir)
        .args(["taken", "--skip-install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Project already exists"))
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(root.join("keep.txt")).unwrap(), "mine");
    assert!(!root.join("package.json").exists());
}

#[test]
fn incompatible_orm_and_database() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["bad", "--drizzle", "--mongodb", "--skip-install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("drizzle"))
        .stderr(predicate::str::contains("mongodb"));

    assert!(!dir.path().join("bad").exists());
}

#[test]
fn path_like_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["..", "--skip-install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project name"));
}

#[test]
fn blocked_target_reports_directory_failure() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("blocked"), "a file, not a directory").unwrap();

    cmd_in(&dir)
        .args(["blocked", "--skip-install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to create project directory"));
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    cargo::cargo_bin_cmd!("create-churn")
        .current_dir(dir.path())
        .env("NO_COLOR", "1")
        .args(["--config", "does-not-exist.toml", "app"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}
