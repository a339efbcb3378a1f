//! Binary-level behavior of `moira`.

use assert_cmd::Command;
use predicates::prelude::*;

fn moira() -> Command {
    let mut cmd = Command::cargo_bin("moira").unwrap();
    cmd.env_remove("MOIRA_API_URL")
        .env_remove("MOIRA_LOGIN")
        .env_remove("MOIRA_CONFIG");
    cmd
}

#[test]
fn help_lists_screens() {
    moira()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("triggers"))
        .stdout(predicate::str::contains("subscriptions"))
        .stdout(predicate::str::contains("silent"));
}

#[test]
fn unknown_maintenance_is_a_usage_error() {
    moira()
        .args(["trigger", "maintenance", "t1", "2y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2y"));
}

#[test]
fn unreachable_api_reports_error() {
    moira()
        .args(["--api-url", "http://127.0.0.1:9/api", "tags", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    moira()
        .args(["--config"])
        .arg(dir.path().join("absent.toml"))
        .args(["tags", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
