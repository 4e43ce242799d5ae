//! Test doubles for raft-lib.
//!
//! [`RecordingRunner`] stands in for `git` and `cmake` so ordering can be
//! asserted without either tool installed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::{BuildConfiguration, BuildRequest};
use crate::dependency::ResolutionContext;
use crate::error::{RaftError, Result};
use crate::events::{Event, EventSink, NullSink};
use crate::process::{BoxFuture, CommandRunner, Invocation, ProcessOutput};
use crate::project::{Project, RAFT_DIR, RAFT_FILE};
use crate::settings::Settings;

/// Records invocations instead of running them.
///
/// `git clone <location> <dest>` creates `dest` and writes any files
/// registered for `location` with [`RecordingRunner::with_repository`].
/// Working directories are created the way the real runner creates them.
#[derive(Debug, Default)]
pub struct RecordingRunner {
  invocations: Mutex<Vec<Invocation>>,
  repositories: HashMap<String, Vec<(PathBuf, String)>>,
  fail_on: Option<String>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_repository(mut self, location: &str, files: &[(&str, &str)]) -> Self {
    let files = files
      .iter()
      .map(|(path, contents)| (PathBuf::from(path), contents.to_string()))
      .collect();
    self.repositories.insert(location.to_string(), files);
    self
  }

  /// A repository whose clone contains a raft project with `raftfile`.
  pub fn with_raft_repository(self, location: &str, raftfile: &str) -> Self {
    let path = format!("{RAFT_DIR}/{RAFT_FILE}");
    self.with_repository(location, &[(path.as_str(), raftfile)])
  }

  /// Fails any invocation whose command line contains `needle`.
  pub fn fail_on(mut self, needle: &str) -> Self {
    self.fail_on = Some(needle.to_string());
    self
  }

  pub fn invocations(&self) -> Vec<Invocation> {
    self.invocations.lock().unwrap().clone()
  }

  pub fn command_lines(&self) -> Vec<String> {
    self.invocations().iter().map(Invocation::command_line).collect()
  }

  fn simulate(&self, invocation: &Invocation) -> Result<ProcessOutput> {
    self.invocations.lock().unwrap().push(invocation.clone());

    if let Some(needle) = &self.fail_on
      && invocation.command_line().contains(needle.as_str())
    {
      return Err(RaftError::ExternalTool {
        command: invocation.command_line(),
        code: Some(1),
        stderr: "simulated failure".to_string(),
      });
    }

    if let Some(cwd) = &invocation.cwd {
      std::fs::create_dir_all(cwd).unwrap();
    }

    if invocation.args.first().map(String::as_str) == Some("clone") {
      let location = &invocation.args[1];
      let dest = Path::new(&invocation.args[2]);
      std::fs::create_dir_all(dest).unwrap();
      for (path, contents) in self.repositories.get(location).into_iter().flatten() {
        let file = dest.join(path);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, contents).unwrap();
      }
    }

    Ok(ProcessOutput::default())
  }
}

impl CommandRunner for RecordingRunner {
  fn execute<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, Result<ProcessOutput>> {
    Box::pin(async move { self.simulate(invocation) })
  }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
  events: Mutex<Vec<Event>>,
}

impl MemorySink {
  pub fn events(&self) -> Vec<Event> {
    self.events.lock().unwrap().clone()
  }
}

impl EventSink for MemorySink {
  fn record(&self, event: &Event) {
    self.events.lock().unwrap().push(event.clone());
  }
}

/// Writes `Raft/raftfile.json` under `root`.
pub fn write_raftfile(root: &Path, raftfile: &str) {
  std::fs::create_dir_all(root.join(RAFT_DIR)).unwrap();
  std::fs::write(root.join(RAFT_DIR).join(RAFT_FILE), raftfile).unwrap();
}

/// Settings that keep the helper directory inside `temp`.
pub fn test_settings(temp: &Path) -> Settings {
  Settings {
    helper_dir: temp.join("helper"),
    ..Settings::default()
  }
}

/// A resolution context for a host debug build of `root`.
pub fn host_context(root: Project, temp: &Path, runner: Arc<RecordingRunner>) -> Arc<ResolutionContext> {
  let config = BuildConfiguration::resolve(&BuildRequest::default(), &[]).unwrap();
  Arc::new(ResolutionContext::new(
    root,
    config,
    test_settings(temp),
    runner,
    Arc::new(NullSink),
  ))
}

/// A raftfile with one dependency per `(name, location, buildSystem)`.
pub fn raftfile(dependencies: &[(&str, &str, &str)]) -> String {
  let entries = dependencies
    .iter()
    .map(|(name, location, build_system)| {
      serde_json::json!({
        "name": name,
        "repository": {"type": "git", "location": location},
        "buildSystem": build_system,
        "patches": [],
      })
    })
    .collect::<Vec<_>>();
  serde_json::json!({ "dependencies": entries }).to_string()
}
