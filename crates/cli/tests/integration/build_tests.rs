use predicates::prelude::*;

use super::common::TestEnv;

const ZLIB_RAFTFILE: &str = r#"{
  "dependencies": [
    {
      "name": "zlib",
      "repository": { "type": "git", "location": "https://example.com/zlib.git", "branch": "v1.3" },
      "buildSystem": "cmake",
      "configOptions": [{ "name": "ZLIB_BUILD_EXAMPLES", "value": "OFF" }]
    }
  ]
}"#;

#[test]
fn build_clones_builds_and_installs_dependencies() {
  let env = TestEnv::with_raftfile(ZLIB_RAFTFILE);

  env
    .raft_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Build complete!"))
    .stdout(predicate::str::contains("Host/Host (Debug)"));

  let log = env.tool_log();
  assert!(log[0].starts_with("git clone https://example.com/zlib.git"), "{log:?}");
  assert_eq!(log[1], "git checkout v1.3");
  assert!(env.path("Raft/libs/src/zlib").is_dir());

  let install = env.path("Raft/libs/install/Host/Host/Debug");
  let configure = log.iter().find(|line| line.contains("ZLIB_BUILD_EXAMPLES")).unwrap();
  assert!(configure.contains(&format!("-DCMAKE_INSTALL_PREFIX={}", install.display())));
  assert!(log.iter().any(|line| line.contains("--target install")));

  // Root project configure and build come last.
  let last = log.last().unwrap();
  assert!(last.starts_with("cmake --build"));
  assert!(last.contains(&env.path("build/Host/Host").display().to_string()));

  assert!(env.helper_dir().join("raft.cmake").is_file());
}

#[test]
fn second_build_does_not_clone_again() {
  let env = TestEnv::with_raftfile(ZLIB_RAFTFILE);

  env.raft_cmd().arg("build").assert().success();
  env.raft_cmd().arg("build").assert().success();

  assert_eq!(env.count_calls("git clone"), 1);
  // Build and install for zlib plus the root build, twice.
  assert_eq!(env.count_calls("cmake --build"), 6);
}

#[test]
fn release_builds_use_release_directories() {
  let env = TestEnv::with_raftfile(ZLIB_RAFTFILE);

  env.raft_cmd().args(["build", "--release"]).assert().success();

  let log = env.tool_log();
  assert!(log.iter().any(|line| line.contains("Raft/libs/build/Host/Host/Release/zlib")));
  assert!(log.iter().any(|line| line.contains("--config Release")));
}

#[test]
fn build_json_reports_dependencies() {
  let env = TestEnv::with_raftfile(ZLIB_RAFTFILE);

  let output = env.raft_cmd().args(["build", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["platform"], "Host");
  assert_eq!(report["mode"], "Debug");
  assert_eq!(report["dependencies"], serde_json::json!(["zlib"]));
}

#[test]
fn failing_dependency_build_stops_the_build() {
  let env = TestEnv::with_raftfile(ZLIB_RAFTFILE);

  env
    .raft_cmd()
    .arg("build")
    .env("RAFT_TEST_FAIL", "ZLIB_BUILD_EXAMPLES")
    .assert()
    .failure()
    .stderr(predicate::str::contains("simulated failure"));

  // Nothing ran after the failed configure.
  assert!(env.tool_log().last().unwrap().contains("ZLIB_BUILD_EXAMPLES"));
}

#[test]
fn undeclared_target_is_rejected() {
  let env = TestEnv::with_raftfile(
    r#"{
      "dependencies": [],
      "architectures": [{ "platform": "Android", "architecture": "arm64-v8a" }]
    }"#,
  );

  env
    .raft_cmd()
    .args(["build", "--platform", "iOS"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no declared architecture matches"));

  assert!(env.tool_log().is_empty());
}
