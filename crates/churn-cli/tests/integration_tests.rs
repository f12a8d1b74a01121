//! End-to-end runs of the create-churn binary in temporary directories.
//!
//! Every run passes `--skip-install` (or disables install through config)
//! so no package manager is ever spawned.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// A temp workspace with an empty config file, so the user's own
/// configuration never leaks into a test.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        Self::with_config("")
    }

    fn with_config(body: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("churn.toml");
        fs::write(&config, body).unwrap();
        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = self.cmd_without_no_color();
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Same as [`Workspace::cmd`] but with `NO_COLOR` unset.
    fn cmd_without_no_color(&self) -> assert_cmd::Command {
        let mut cmd = cargo::cargo_bin_cmd!("create-churn");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("NO_COLOR")
            .arg("--config")
            .arg(&self.config);
        cmd
    }
}

#[test]
fn help_lists_configuration_flags() {
    cargo::cargo_bin_cmd!("create-churn")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create-churn"))
        .stdout(predicate::str::contains("--solidity"))
        .stdout(predicate::str::contains("--no-orm"));
}

#[test]
fn version_flag() {
    cargo::cargo_bin_cmd!("create-churn")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn typescript_backend_with_every_layer() {
    let ws = Workspace::new();
    ws.cmd()
        .args([
            "my-api", "--ts", "--pnpm", "--drizzle", "--sqlite", "--jwt", "--vitest", "--docker",
            "--github", "--skip-install",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'my-api' created"))
        .stdout(predicate::str::contains("cd my-api"))
        .stdout(predicate::str::contains("pnpm install"))
        .stdout(predicate::str::contains("pnpm dev"))
        .stdout(predicate::str::contains("https://github.com/Basharkhan7776/Churn"));

    let root = ws.path().join("my-api");
    for file in [
        "package.json",
        "tsconfig.json",
        "src/index.ts",
        "src/env.ts",
        "src/db/schema.ts",
        "src/db/index.ts",
        "drizzle.config.ts",
        "src/auth/jwt.ts",
        "vitest.config.ts",
        "Dockerfile",
        ".github/workflows/ci-cd.yml",
    ] {
        assert!(root.join(file).is_file(), "missing {file}");
    }

    let manifest = fs::read_to_string(root.join("package.json")).unwrap();
    assert!(manifest.contains("\"drizzle-orm\""));
    assert!(manifest.contains("\"better-sqlite3\""));
    assert!(!manifest.contains("\"@prisma/client\""));
}

#[test]
fn no_configuration_flags_use_the_defaults() {
    let ws = Workspace::new();
    ws.cmd().args(["--yes", "--skip-install"]).assert().success();

    let root = ws.path().join("my-churn-app");
    assert!(root.join("src/index.ts").is_file());
    assert!(root.join("prisma/schema.prisma").is_file());
    assert!(!root.join("Dockerfile").exists());
}

#[test]
fn javascript_websocket_has_no_typescript_files() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["chat", "--js", "--ws", "--no-orm", "--skip-install"])
        .assert()
        .success();

    let root = ws.path().join("chat");
    let index = fs::read_to_string(root.join("index.js")).unwrap();
    assert!(index.contains("WebSocket"));
    assert!(!root.join("tsconfig.json").exists());
    assert!(!root.join("prisma").exists());
}

#[test]
fn foundry_project_layout() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["my-token", "--solidity", "--foundry", "--token", "--uups", "--skip-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("forge install"))
        .stdout(predicate::str::contains("forge build"));

    let root = ws.path().join("my-token");
    for file in [
        "foundry.toml",
        "remappings.txt",
        "src/MyToken.sol",
        "test/MyToken.t.sol",
        "script/Deploy.s.sol",
    ] {
        assert!(root.join(file).is_file(), "missing {file}");
    }
    assert!(!root.join("package.json").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["preview", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("package.json"));

    assert!(!ws.path().join("preview").exists());
}

#[test]
fn json_output_reports_skipped_installs() {
    let ws = Workspace::new();
    let out = ws
        .cmd()
        .args(["svc", "--npm", "--output-format", "json", "--skip-install"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["report"]["stage"], "completed");
    assert_eq!(value["report"]["kind"], "backend");
    assert_eq!(value["report"]["installs"][0]["command"], "npm install");
    assert_eq!(value["report"]["installs"][0]["status"], "skipped");
    assert!(value["finished_at"].is_string());
}

#[test]
fn config_file_supplies_defaults() {
    let ws = Workspace::with_config(
        "[defaults]\nlanguage = \"javascript\"\npackage_manager = \"yarn\"\n\n[install]\nenabled = false\n",
    );
    ws.cmd()
        .args(["from-config", "--no-orm", "--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"yarn install\""))
        .stdout(predicate::str::contains("\"skipped\""));

    assert!(ws.path().join("from-config/index.js").is_file());
}

#[test]
fn environment_disables_install() {
    let ws = Workspace::new();
    ws.cmd()
        .env("CHURN_INSTALL__ENABLED", "false")
        .args(["env-app", "--bun", "--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"skipped\""));
}

#[test]
fn force_replaces_an_existing_project() {
    let ws = Workspace::new();
    let root = ws.path().join("app");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("stale.txt"), "old").unwrap();

    ws.cmd()
        .args(["app", "--force", "--skip-install"])
        .assert()
        .success();

    assert!(!root.join("stale.txt").exists());
    assert!(root.join("package.json").is_file());
}

#[test]
fn empty_existing_directory_is_reused() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path().join("empty")).unwrap();

    ws.cmd().args(["empty", "--skip-install"]).assert().success();
    assert!(ws.path().join("empty/package.json").is_file());
}

#[test]
fn no_color_env_accepts_any_value() {
    for value in ["1", "yes", "true"] {
        let ws = Workspace::new();
        ws.cmd()
            .env("NO_COLOR", value)
            .args(["tinted", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Dry run"));
    }
}

#[test]
fn runs_without_no_color_in_the_environment() {
    let ws = Workspace::new();
    ws.cmd_without_no_color()
        .args(["plain-env", "--skip-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'plain-env' created"))
        .stdout(predicate::str::contains("\u{1b}[").not());

    assert!(ws.path().join("plain-env/package.json").is_file());
}

#[test]
fn no_color_flag_is_accepted() {
    let ws = Workspace::new();
    ws.cmd_without_no_color()
        .args(["flagged", "--no-color", "--dry-run"])
        .assert()
        .success();
}
