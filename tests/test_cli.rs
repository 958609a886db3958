//! Binary-level tests: flag validation and exit codes.
//!
//! None of these reach the network. Validation and credential lookup both
//! happen before the first API call.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with an empty, isolated environment: no tokens, no gh config,
/// no gh on PATH.
fn isolated(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gh-approve-deploy").unwrap();
    cmd.env_clear()
        .env("HOME", home.path())
        .env("GH_CONFIG_DIR", home.path())
        .env("PATH", home.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_exits_zero() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--run-id"))
        .stdout(predicate::str::contains("--approve"))
        .stdout(predicate::str::contains("--reject"));
}

#[test]
fn test_both_decisions_rejected() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["-r", "octo/app", "-e", "production", "-i", "1234", "--approve", "--reject"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "--approve and --reject are mutually exclusive",
        ));
}

#[test]
fn test_no_decision_rejected() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["-r", "octo/app", "-e", "production", "-i", "1234"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn test_missing_required_flag_exits_one() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["-e", "production", "-i", "1234", "--approve"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--repo"));
}

#[test]
fn test_unknown_flag_exits_one() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["-r", "octo/app", "-e", "production", "-i", "1234", "--approve", "--force"])
        .assert()
        .code(1);
}

#[test]
fn test_malformed_repo_exits_one() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["-r", "octo", "-e", "production", "-i", "1234", "--approve"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[HOST/]OWNER/REPO"));
}

#[test]
fn test_non_numeric_run_id_exits_one() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["-r", "octo/app", "-e", "production", "-i", "latest", "--reject"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("numeric"));
}

#[test]
fn test_repo_falls_back_to_gh_repo() {
    let home = TempDir::new().unwrap();
    // Gets past flag parsing and validation, then stops at credentials.
    isolated(&home)
        .env("GH_REPO", "octo/app")
        .args(["-e", "production", "-i", "1234", "--approve"])
        .assert()
        .code(5);
}

#[test]
fn test_missing_credentials_exits_five() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["-r", "octo/app", "-e", "production", "-i", "1234", "--approve"])
        .assert()
        .code(5)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("gh auth login"));
}

/// Install a `gh` shell script as the only program on the isolated PATH.
#[cfg(unix)]
fn install_fake_gh(home: &TempDir, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = home.path().join("gh");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_token_from_gh_auth_token() {
    let home = TempDir::new().unwrap();
    install_fake_gh(
        &home,
        "#!/bin/sh\n\
         if [ \"$1 $2 $3 $4\" = \"auth token --hostname approve-deploy.invalid\" ]; then\n\
         \x20 echo gho_from_keyring\n\
         \x20 exit 0\n\
         fi\n\
         exit 1\n",
    );

    // The token is found, so the run gets as far as the first API call,
    // which cannot resolve the .invalid host.
    isolated(&home)
        .args([
            "-r",
            "approve-deploy.invalid/octo/app",
            "-e",
            "production",
            "-i",
            "1234",
            "--approve",
        ])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("request to GitHub failed"))
        .stderr(predicate::str::contains("gh auth login").not());
}

#[cfg(unix)]
#[test]
fn test_failing_gh_auth_token_is_missing_credentials() {
    let home = TempDir::new().unwrap();
    install_fake_gh(&home, "#!/bin/sh\necho 'not logged in' >&2\nexit 1\n");

    isolated(&home)
        .env("GH_HOST", "approve-deploy.invalid")
        .args(["-r", "octo/app", "-e", "production", "-i", "1234", "--approve"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("approve-deploy.invalid"));
}
