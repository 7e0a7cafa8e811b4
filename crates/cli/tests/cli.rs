use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("devpulse");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("state_db_path"));
    assert!(content.contains("reddit_subreddits"));
    assert!(content.contains("newsapi_key_env"));
}

#[test]
fn config_init_refuses_overwrite_without_force() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# existing").expect("write existing");

    let mut cmd = cargo_bin_cmd!("devpulse");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let content = fs::read_to_string(&config_path).expect("read config");
    assert_eq!(content, "# existing");
}

#[test]
fn doctor_reports_config_and_state() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("state.sqlite");

    let mut cmd = cargo_bin_cmd!("devpulse");
    let output = cmd
        .env("DEVPULSE__GENERAL__STATE_DB_PATH", &db_path)
        .env_remove("NEWSAPI_KEY")
        .current_dir(dir.path())
        .args(["doctor", "--json"])
        .output()
        .expect("run doctor");

    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["config"]["status"], "ok");
    assert_eq!(report["state"]["status"], "ok");
    // missing NewsAPI key downgrades to warn, never error
    assert_eq!(report["newsapi"]["status"], "warn");
    assert_eq!(report["overall"], "warn");
}

#[test]
fn mark_and_bookmark_are_offline_operations() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("state.sqlite");

    let mut cmd = cargo_bin_cmd!("devpulse");
    cmd.env("DEVPULSE__GENERAL__STATE_DB_PATH", &db_path)
        .current_dir(dir.path())
        .args(["mark", "read", "devto-123", "--url", "https://dev.to/a/post"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked read: devto-123"));

    let mut cmd = cargo_bin_cmd!("devpulse");
    cmd.env("DEVPULSE__GENERAL__STATE_DB_PATH", &db_path)
        .current_dir(dir.path())
        .args(["mark", "bookmark", "devto-123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmarked: devto-123"));
}

#[test]
fn collections_roundtrip_via_cli() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("state.sqlite");

    let mut cmd = cargo_bin_cmd!("devpulse");
    cmd.env("DEVPULSE__GENERAL__STATE_DB_PATH", &db_path)
        .current_dir(dir.path())
        .args(["collections", "create", "Rust reads", "--description", "long-form rust posts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created collection Rust reads"));

    let mut cmd = cargo_bin_cmd!("devpulse");
    let output = cmd
        .env("DEVPULSE__GENERAL__STATE_DB_PATH", &db_path)
        .current_dir(dir.path())
        .args(["collections", "list", "--json"])
        .output()
        .expect("run list");

    assert!(output.status.success());
    let collections: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(collections.as_array().map(|a| a.len()), Some(1));
    assert_eq!(collections[0]["name"], "Rust reads");
    assert_eq!(collections[0]["description"], "long-form rust posts");
}

#[test]
fn fetch_rejects_unknown_source() {
    let dir = TempDir::new().expect("temp dir");

    let mut cmd = cargo_bin_cmd!("devpulse");
    cmd.env("DEVPULSE__GENERAL__STATE_DB_PATH", dir.path().join("state.sqlite"))
        .current_dir(dir.path())
        .args(["fetch", "--source", "geocities"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown source"));
}
