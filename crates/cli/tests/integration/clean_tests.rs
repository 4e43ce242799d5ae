use predicates::prelude::*;

use super::common::TestEnv;

const RAFTFILE: &str = r#"{
  "dependencies": [
    { "name": "zlib", "repository": { "type": "git", "location": "https://example.com/zlib.git" }, "buildSystem": "cmake" },
    { "name": "png", "repository": { "type": "git", "location": "https://example.com/png.git" }, "buildSystem": "cmake" }
  ]
}"#;

fn built_env() -> TestEnv {
  let env = TestEnv::with_raftfile(RAFTFILE);
  env.write_file("Raft/libs/src/zlib/CMakeLists.txt", "");
  env.write_file("Raft/libs/build/Host/Host/Debug/zlib/CMakeCache.txt", "");
  env.write_file("Raft/libs/build/Host/Host/Debug/png/CMakeCache.txt", "");
  env.write_file("Raft/libs/build/Host/Host/Release/zlib/CMakeCache.txt", "");
  env.write_file("Raft/libs/install/Host/Host/Debug/lib/libz.a", "");
  env.write_file("build/Host/Host/CMakeCache.txt", "");
  env
}

#[test]
fn clean_removes_everything_but_sources() {
  let env = built_env();

  env
    .raft_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Clean complete!"));

  assert!(!env.path("build").exists());
  assert!(!env.path("Raft/libs/build").exists());
  assert!(!env.path("Raft/libs/install").exists());
  assert!(env.path("Raft/libs/src/zlib/CMakeLists.txt").exists());
}

#[test]
fn clean_dependencies_keeps_project_build() {
  let env = built_env();

  env.raft_cmd().args(["clean", "--dependencies"]).assert().success();

  assert!(env.path("build/Host/Host").exists());
  assert!(!env.path("Raft/libs/build").exists());
  assert!(!env.path("Raft/libs/install").exists());
}

#[test]
fn clean_one_dependency_removes_only_its_build_dirs() {
  let env = built_env();

  env.raft_cmd().args(["clean", "--dependency", "zlib"]).assert().success();

  assert!(!env.path("Raft/libs/build/Host/Host/Debug/zlib").exists());
  assert!(!env.path("Raft/libs/build/Host/Host/Release/zlib").exists());
  assert!(env.path("Raft/libs/build/Host/Host/Debug/png").exists());
  assert!(env.path("Raft/libs/install/Host/Host/Debug/lib/libz.a").exists());
  assert!(env.tool_log().is_empty());
}

#[test]
fn clean_json_lists_removed_directories() {
  let env = built_env();

  let output = env.raft_cmd().args(["clean", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["removed"].as_array().unwrap().len(), 3);
}
