// tests/cli_test.rs
use std::process::Command;

#[test]
fn test_git_autotag_help() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "git-autotag", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-autotag"));
    assert!(stdout.contains("--dev-branch"));
    assert!(stdout.contains("--include-shorter-versions"));
}

#[test]
fn test_git_autotag_version() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "git-autotag", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-autotag"));
}
