//! Running external tools.
//!
//! Arguments are always passed as a list, never joined into a shell string.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{RaftError, Result};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  /// Created before the command runs if it does not exist.
  pub cwd: Option<PathBuf>,
  /// Short description used in logs instead of the full command line.
  pub label: Option<String>,
  /// Connect the child to this process's stdio instead of capturing output.
  pub interactive: bool,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      label: None,
      interactive: false,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn path_arg(self, path: &Path) -> Self {
    self.arg(path.to_string_lossy())
  }

  pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
    self.cwd = Some(cwd.into());
    self
  }

  pub fn label(mut self, label: impl Into<String>) -> Self {
    self.label = Some(label.into());
    self
  }

  pub fn interactive(mut self) -> Self {
    self.interactive = true;
    self
  }

  /// Quoted command line for messages. Not meant to be run by a shell.
  pub fn command_line(&self) -> String {
    std::iter::once(&self.program)
      .chain(&self.args)
      .map(|part| {
        if part.is_empty() || part.contains(char::is_whitespace) {
          format!("\"{part}\"")
        } else {
          part.clone()
        }
      })
      .collect::<Vec<_>>()
      .join(" ")
  }

  fn display_name(&self) -> String {
    self.label.clone().unwrap_or_else(|| self.command_line())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
  pub stdout: String,
  pub stderr: String,
}

/// Executes [`Invocation`]s.
///
/// Implementations resolve with the captured output on a zero exit status and
/// fail with [`RaftError::ExternalTool`] otherwise.
pub trait CommandRunner: Send + Sync {
  fn execute<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, Result<ProcessOutput>>;
}

/// Runs commands with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn execute<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, Result<ProcessOutput>> {
    Box::pin(run(invocation))
  }
}

async fn run(invocation: &Invocation) -> Result<ProcessOutput> {
  let name = invocation.display_name();
  let mut command = Command::new(&invocation.program);
  command.args(&invocation.args).kill_on_drop(true);

  if let Some(cwd) = &invocation.cwd {
    if !cwd.exists() {
      tokio::fs::create_dir_all(cwd)
        .await
        .map_err(RaftError::fs("create directory", cwd))?;
      debug!(dir = %cwd.display(), "created working directory");
    }
    command.current_dir(cwd);
  }

  info!(command = %name, cwd = ?invocation.cwd, "running");

  let spawn_error = |source: std::io::Error| RaftError::ExternalTool {
    command: invocation.command_line(),
    code: None,
    stderr: source.to_string(),
  };

  if invocation.interactive {
    let status = command
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .await
      .map_err(spawn_error)?;
    if !status.success() {
      return Err(RaftError::ExternalTool {
        command: invocation.command_line(),
        code: status.code(),
        stderr: String::new(),
      });
    }
    return Ok(ProcessOutput::default());
  }

  let output = command.stdin(Stdio::null()).output().await.map_err(spawn_error)?;
  let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
  let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

  if !output.status.success() {
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }
    return Err(RaftError::ExternalTool {
      command: invocation.command_line(),
      code: output.status.code(),
      stderr,
    });
  }

  debug!(command = %name, "finished");
  Ok(ProcessOutput { stdout, stderr })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;
  use tempfile::TempDir;

  #[cfg(unix)]
  fn shell(script: &str) -> Invocation {
    Invocation::new("/bin/sh").args(["-c", script])
  }

  #[test]
  fn command_line_quotes_spaces() {
    let invocation = Invocation::new("cmake")
      .args(["-G", "Visual Studio 17 2022"])
      .arg("");
    assert_eq!(invocation.command_line(), r#"cmake -G "Visual Studio 17 2022" """#);
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn captures_output() {
    let output = SystemRunner
      .execute(&shell("echo out; echo err >&2"))
      .await
      .unwrap();
    assert_eq!(output.stdout.trim(), "out");
    assert_eq!(output.stderr.trim(), "err");
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn creates_missing_working_directory() {
    let temp = TempDir::new().unwrap();
    let cwd = temp.path().join("a").join("b");

    let output = SystemRunner.execute(&shell("pwd").cwd(&cwd)).await.unwrap();
    assert!(cwd.is_dir());
    assert!(output.stdout.trim().ends_with("a/b"));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn non_zero_exit_carries_stderr() {
    let err = SystemRunner
      .execute(&shell("echo broken >&2; exit 3"))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalTool);
    match err {
      RaftError::ExternalTool { code, stderr, .. } => {
        assert_eq!(code, Some(3));
        assert_eq!(stderr.trim(), "broken");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn missing_program_is_an_external_tool_error() {
    let err = SystemRunner
      .execute(&Invocation::new("raft-definitely-not-a-real-program"))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalTool);
  }
}
