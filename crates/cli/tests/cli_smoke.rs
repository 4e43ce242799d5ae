//! CLI smoke tests for raft.
//!
//! These tests verify that every command parses its arguments, runs without
//! panicking and returns an appropriate exit code. None of them reach git or
//! cmake.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the raft binary with settings isolated to `temp`.
fn raft_cmd(temp: &TempDir) -> Command {
  let mut cmd: Command = cargo_bin_cmd!("raft");
  cmd.env("RAFT_CONFIG", temp.path().join("raftconfig.json"));
  cmd.env("RAFT_HELPER_DIR", temp.path().join("helper"));
  cmd.env_remove("RUST_LOG");
  cmd.current_dir(temp.path());
  cmd
}

/// Create a temp directory holding a raft project.
fn temp_project(raftfile: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  let raft_dir = temp.path().join("Raft");
  std::fs::create_dir_all(&raft_dir).unwrap();
  std::fs::write(raft_dir.join("raftfile.json"), raftfile).unwrap();
  temp
}

const EMPTY_RAFTFILE: &str = r#"{ "dependencies": [] }"#;

#[test]
fn help_works() {
  let temp = TempDir::new().unwrap();
  raft_cmd(&temp)
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("build"))
    .stdout(predicate::str::contains("clean"));
}

#[test]
fn version_works() {
  let temp = TempDir::new().unwrap();
  raft_cmd(&temp)
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn subcommand_help_works() {
  let temp = TempDir::new().unwrap();
  for subcommand in ["build", "run", "clean", "info"] {
    raft_cmd(&temp).args([subcommand, "--help"]).assert().success();
  }
}

#[test]
fn build_help_lists_target_flags() {
  let temp = TempDir::new().unwrap();
  raft_cmd(&temp)
    .args(["build", "--help"])
    .assert()
    .success()
    .stdout(predicate::str::contains("--platform"))
    .stdout(predicate::str::contains("--architecture"))
    .stdout(predicate::str::contains("--release"))
    .stdout(predicate::str::contains("--distribute"));
}

#[test]
fn info_lists_registered_platforms() {
  let temp = TempDir::new().unwrap();
  raft_cmd(&temp)
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("Android"))
    .stdout(predicate::str::contains("arm64-v8a"))
    .stdout(predicate::str::contains("iOS"));
}

#[test]
fn info_json_is_valid() {
  let temp = TempDir::new().unwrap();
  let output = raft_cmd(&temp).args(["info", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let platforms: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let names: Vec<&str> = platforms
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["name"].as_str().unwrap())
    .collect();
  assert_eq!(names[0], "Host");
  assert!(names.contains(&"Ninja"));
}

#[test]
fn build_outside_a_project_fails() {
  let temp = TempDir::new().unwrap();
  raft_cmd(&temp)
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("not inside a raft project"));
}

#[test]
fn unknown_platform_fails_before_running_tools() {
  let temp = temp_project(EMPTY_RAFTFILE);
  raft_cmd(&temp)
    .args(["build", "--platform", "playstation"])
    .env("RAFT_GIT", "/nonexistent/git")
    .env("RAFT_CMAKE", "/nonexistent/cmake")
    .assert()
    .failure()
    .stderr(predicate::str::contains("playstation"));

  assert!(!temp.path().join("build").exists());
}

#[test]
fn malformed_raftfile_fails() {
  let temp = temp_project("{ not json");
  raft_cmd(&temp).arg("build").assert().failure();
}

#[test]
fn run_without_executable_name_fails() {
  let temp = temp_project(EMPTY_RAFTFILE);
  raft_cmd(&temp)
    .arg("run")
    .env("RAFT_CMAKE", "/nonexistent/cmake")
    .assert()
    .failure()
    .stderr(predicate::str::contains("executableName"));
}

#[test]
fn clean_flags_conflict() {
  let temp = temp_project(EMPTY_RAFTFILE);
  raft_cmd(&temp)
    .args(["clean", "--dependencies", "--dependency", "zlib"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn clean_empty_project_succeeds() {
  let temp = temp_project(EMPTY_RAFTFILE);
  raft_cmd(&temp)
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
fn clean_unknown_dependency_fails() {
  let temp = temp_project(EMPTY_RAFTFILE);
  raft_cmd(&temp)
    .args(["clean", "--dependency", "zlib"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown dependency 'zlib'"));
}
