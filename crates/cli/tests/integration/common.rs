//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Logs `git <args>` and creates the destination on clone.
const FAKE_GIT: &str = r#"#!/bin/sh
echo "git $*" >> "$RAFT_TEST_LOG"
if [ "$1" = "clone" ]; then
  mkdir -p "$3"
fi
exit 0
"#;

/// Logs `cmake <args>`. Fails when `RAFT_TEST_FAIL` appears in the arguments.
const FAKE_CMAKE: &str = r#"#!/bin/sh
echo "cmake $*" >> "$RAFT_TEST_LOG"
case "$*" in
  *"$RAFT_TEST_FAIL"*) echo "simulated failure" >&2; exit 3 ;;
esac
exit 0
"#;

/// Isolated test environment.
///
/// Each test gets its own project directory, helper directory and tool log.
pub struct TestEnv {
  pub temp: TempDir,
  pub project: PathBuf,
}

impl TestEnv {
  /// A project whose raftfile is `raftfile`.
  pub fn with_raftfile(raftfile: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let project = dunce::canonicalize(temp.path()).unwrap().join("game");
    let env = Self { temp, project };
    env.write_file("Raft/raftfile.json", raftfile);
    env.write_script("bin/git", FAKE_GIT);
    env.write_script("bin/cmake", FAKE_CMAKE);
    env
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.project.join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  fn write_script(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  pub fn helper_dir(&self) -> PathBuf {
    self.temp.path().join("helper")
  }

  fn log_path(&self) -> PathBuf {
    self.temp.path().join("tools.log")
  }

  /// Every tool invocation so far, one per line.
  pub fn tool_log(&self) -> Vec<String> {
    std::fs::read_to_string(self.log_path())
      .unwrap_or_default()
      .lines()
      .map(String::from)
      .collect()
  }

  pub fn count_calls(&self, prefix: &str) -> usize {
    self.tool_log().iter().filter(|line| line.starts_with(prefix)).count()
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.project.join(relative_path)
  }

  /// Get a pre-configured Command for the raft binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `RAFT_CONFIG`: a settings file that does not exist
  /// - `RAFT_HELPER_DIR`: isolated helper directory
  /// - `RAFT_GIT` / `RAFT_CMAKE`: the logging stand-ins
  /// - `RAFT_TEST_LOG`: where the stand-ins append their arguments
  pub fn raft_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("raft");
    cmd.env("RAFT_CONFIG", self.temp.path().join("raftconfig.json"));
    cmd.env("RAFT_HELPER_DIR", self.helper_dir());
    cmd.env("RAFT_GIT", self.tool("git"));
    cmd.env("RAFT_CMAKE", self.tool("cmake"));
    cmd.env("RAFT_TEST_LOG", self.log_path());
    cmd.env("RAFT_TEST_FAIL", "no-such-argument");
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(&self.project);
    cmd
  }

  fn tool(&self, name: &str) -> PathBuf {
    self.temp.path().join("bin").join(name)
  }
}
