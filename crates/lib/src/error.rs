//! Error types shared by every stage of a raft build.
//!
//! Every failure is fatal to the current invocation. Callers that need to
//! render or branch on the failure class use [`RaftError::kind`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`RaftError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The raftfile is malformed, or the requested target matches nothing.
  Configuration,
  /// The caller supplied an invalid combination of inputs.
  CommandLine,
  /// `git` or `cmake` exited unsuccessfully.
  ExternalTool,
  /// A filesystem operation failed.
  Filesystem,
}

#[derive(Debug, Error)]
pub enum RaftError {
  #[error("invalid raft file: {0}")]
  Configuration(String),

  #[error("invalid raft file '{path}': {source}")]
  Manifest {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid command line option: {0}")]
  CommandLine(String),

  #[error("command failed with exit code {code:?}: {command}\n{stderr}")]
  ExternalTool {
    command: String,
    code: Option<i32>,
    stderr: String,
  },

  #[error("failed to {action} '{path}': {source}")]
  Filesystem {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(
    "install directory is locked by another raft process: {holder}\n\
     If you're sure no raft process is running, remove the lock file:\n  {lock_path}"
  )]
  Locked { holder: String, lock_path: PathBuf },

  #[error("resolution was interrupted: {0}")]
  Interrupted(String),
}

impl RaftError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      RaftError::Configuration(_) | RaftError::Manifest { .. } => ErrorKind::Configuration,
      RaftError::CommandLine(_) => ErrorKind::CommandLine,
      RaftError::ExternalTool { .. } | RaftError::Interrupted(_) => ErrorKind::ExternalTool,
      RaftError::Filesystem { .. } | RaftError::Locked { .. } => ErrorKind::Filesystem,
    }
  }

  /// Builds a closure that wraps an [`io::Error`] for use with `map_err`.
  pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> RaftError {
    let path = path.into();
    move |source| RaftError::Filesystem { action, path, source }
  }

  pub(crate) fn not_found(action: &'static str, path: impl Into<PathBuf>) -> RaftError {
    RaftError::Filesystem {
      action,
      path: path.into(),
      source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
    }
  }
}

pub type Result<T, E = RaftError> = std::result::Result<T, E>;
