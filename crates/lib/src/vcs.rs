//! Source checkout through the `git` command line.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{RaftError, Result};
use crate::manifest::{GIT_REPOSITORY, RepositoryDescriptor};
use crate::process::{CommandRunner, Invocation};

/// A git remote and the optional branch (or tag) to check out after cloning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepository {
  pub location: String,
  pub branch: Option<String>,
}

impl GitRepository {
  pub fn from_descriptor(descriptor: &RepositoryDescriptor) -> Result<Self> {
    if !descriptor.kind.eq_ignore_ascii_case(GIT_REPOSITORY) {
      return Err(RaftError::Configuration(format!(
        "unsupported repository type '{}'",
        descriptor.kind
      )));
    }
    Ok(Self {
      location: descriptor.location.clone(),
      branch: descriptor.branch.clone(),
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
  Cloned,
  /// The destination already existed. It is never updated.
  AlreadyPresent,
}

#[derive(Clone)]
pub struct VcsClient {
  runner: Arc<dyn CommandRunner>,
  program: String,
}

impl VcsClient {
  pub fn new(runner: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
    Self {
      runner,
      program: program.into(),
    }
  }

  /// Clones `repository` into `dest` unless `dest` exists.
  pub async fn download(&self, repository: &GitRepository, dest: &Path) -> Result<DownloadOutcome> {
    if dest.exists() {
      debug!(dest = %dest.display(), "source already present, skipping clone");
      return Ok(DownloadOutcome::AlreadyPresent);
    }

    let parent = dest
      .parent()
      .ok_or_else(|| RaftError::Configuration(format!("cannot clone into '{}'", dest.display())))?;

    info!(location = %repository.location, dest = %dest.display(), "cloning");
    let clone = Invocation::new(&self.program)
      .arg("clone")
      .arg(&repository.location)
      .path_arg(dest)
      .cwd(parent)
      .label(format!("git clone {}", repository.location));
    self.runner.execute(&clone).await?;

    if let Some(branch) = &repository.branch {
      let checkout = Invocation::new(&self.program).arg("checkout").arg(branch).cwd(dest);
      self.runner.execute(&checkout).await?;
    }

    Ok(DownloadOutcome::Cloned)
  }

  /// Applies `patch` to the working tree at `repo_dir`.
  pub async fn patch(&self, repo_dir: &Path, patch: &Path) -> Result<()> {
    if !repo_dir.is_dir() {
      return Err(RaftError::not_found("patch", repo_dir));
    }
    if !patch.is_file() {
      return Err(RaftError::not_found("read patch", patch));
    }

    info!(repo = %repo_dir.display(), patch = %patch.display(), "applying patch");
    let apply = Invocation::new(&self.program).arg("apply").path_arg(patch).cwd(repo_dir);
    self.runner.execute(&apply).await?;
    Ok(())
  }
}
