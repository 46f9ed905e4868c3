//! The `gosrcs` binary.
//!
//! None of these reach a real `go list`: they stop at argument parsing, at
//! manifest discovery, or at a deliberately missing go binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gosrcs() -> Command {
    let mut cmd = Command::cargo_bin("gosrcs").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("GOSRCS_GO").env_remove("GOSRCS_BASE_DIR");
    cmd
}

#[test]
fn test_help() {
    gosrcs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("List the files needed to build a Go package"))
        .stdout(predicate::str::contains("--tags"))
        .stdout(predicate::str::contains("--base-dir"));
}

#[test]
fn test_version() {
    gosrcs().arg("--version").assert().success().stdout(predicate::str::contains("gosrcs"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    gosrcs().args(["-v", "-q"]).assert().failure().code(2);
}

#[test]
fn test_unknown_format_is_rejected() {
    gosrcs().args(["--format", "yaml"]).assert().failure().code(2);
}

#[test]
fn test_missing_manifest() {
    let temp = TempDir::new().unwrap();
    // Skip on hosts where some ancestor of the temp dir is itself a Go module.
    if temp.path().ancestors().any(|dir| dir.join("go.mod").exists()) {
        return;
    }

    gosrcs()
        .arg(temp.path())
        .args(["--go", "/nonexistent/go"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("go.mod not found"));
}

#[test]
fn test_missing_go_binary() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("go.mod"), "module example.com/m\n").unwrap();
    let missing = temp.path().join("bin").join("go");

    gosrcs()
        .arg(temp.path())
        .env("GOSRCS_GO", &missing)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to load packages"));
}
