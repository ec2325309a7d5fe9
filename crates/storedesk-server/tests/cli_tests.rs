//! CLI integration tests for storedesk
//!
//! Tests the storedesk CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with configuration and database isolated in `dir`
#[allow(deprecated)]
fn storedesk_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("storedesk").unwrap();
    cmd.env("STOREDESK_CONFIG_DIR", dir.path());
    cmd.env("STOREDESK_DATABASE", dir.path().join("shop.db"));
    cmd.env_remove("STOREDESK_LISTEN");
    cmd.env_remove("STOREDESK_TOKEN");
    cmd.env("RUST_LOG", "off");
    cmd
}

fn seeded() -> TempDir {
    let dir = TempDir::new().unwrap();
    storedesk_cmd(&dir).arg("seed").assert().success();
    dir
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    storedesk_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_migrate_reports_version() {
    let dir = TempDir::new().unwrap();

    storedesk_cmd(&dir)
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated"));

    storedesk_cmd(&dir)
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn test_seed_prints_tokens() {
    let dir = TempDir::new().unwrap();

    storedesk_cmd(&dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created demo tenant"))
        .stdout(predicate::str::contains("demo-root-token"));

    storedesk_cmd(&dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_search_text_output() {
    let dir = seeded();

    storedesk_cmd(&dir)
        .args(["search", "para", "--token", "demo-pharmacist-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paracetamol 500mg"))
        .stdout(predicate::str::contains("Paragon").not());
}

#[test]
fn test_search_json_output() {
    let dir = seeded();

    let output = storedesk_cmd(&dir)
        .args([
            "search",
            "para",
            "--token",
            "demo-root-token",
            "--types",
            "supplier",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["type"], "supplier");
    assert_eq!(results[0]["title"], "Paragon Medical Supply");
}

#[test]
fn test_search_no_results() {
    let dir = seeded();

    storedesk_cmd(&dir)
        .args(["search", "zzzz", "--token", "demo-root-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results."));
}

#[test]
fn test_search_rejects_bad_input() {
    let dir = seeded();

    storedesk_cmd(&dir)
        .args(["search", "  ", "--token", "demo-root-token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'q'"));

    storedesk_cmd(&dir)
        .args(["search", "para", "--token", "unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active user"));
}

#[test]
fn test_config_set_get_list_reset() {
    let dir = TempDir::new().unwrap();

    storedesk_cmd(&dir)
        .args(["config", "set", "search.max_results", "50"])
        .assert()
        .success();

    storedesk_cmd(&dir)
        .args(["config", "get", "search.max_results"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50"));

    storedesk_cmd(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("server.listen"));

    storedesk_cmd(&dir)
        .args(["config", "set", "search.max_results", "1000"])
        .assert()
        .failure();

    storedesk_cmd(&dir).args(["config", "reset"]).assert().success();

    storedesk_cmd(&dir)
        .args(["config", "get", "search.max_results"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20"));
}

#[test]
fn test_config_unknown_key() {
    let dir = TempDir::new().unwrap();
    storedesk_cmd(&dir)
        .args(["config", "get", "nope.nope"])
        .assert()
        .failure();
}
