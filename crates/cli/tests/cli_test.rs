//! Integration tests for the xcrunner binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn xcrunner() -> Command {
    Command::cargo_bin("xcrunner").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    xcrunner()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("launch"));
}

#[test]
fn test_requires_a_subcommand() {
    xcrunner()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_version_prints_the_package_version() {
    xcrunner()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_build_help_documents_selection_flags() {
    xcrunner()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--scheme"))
        .stdout(predicate::str::contains("--configuration"))
        .stdout(predicate::str::contains("--destination"));
}

#[test]
fn test_build_alias_is_accepted() {
    xcrunner().args(["b", "--help"]).assert().success();
}

#[test]
fn test_build_fails_in_an_empty_root() {
    let temp = TempDir::new().unwrap();

    xcrunner()
        .args(["build", "--root"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no Xcode workspace or project found",
        ));
}

#[test]
fn test_build_rejects_a_missing_root() {
    xcrunner()
        .args(["build", "--root", "/nonexistent/xcrunner-root"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot access workspace root"));
}
