use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::events::Event;
use crate::manifest::DependencyDescriptor;
use crate::vcs::{DownloadOutcome, GitRepository};

use super::ResolutionContext;

/// A dependency that is only downloaded: cloned, then patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDependency {
  descriptor: DependencyDescriptor,
  repository: GitRepository,
  patches: Vec<PathBuf>,
}

impl RepositoryDependency {
  /// `raft_dir` is the `Raft` directory of the project that declared the
  /// dependency; patch paths are relative to it.
  pub fn new(descriptor: &DependencyDescriptor, raft_dir: &Path) -> Result<Self> {
    Ok(Self {
      repository: GitRepository::from_descriptor(&descriptor.repository)?,
      patches: descriptor.patches.iter().map(|patch| raft_dir.join(patch)).collect(),
      descriptor: descriptor.clone(),
    })
  }

  pub fn name(&self) -> &str {
    &self.descriptor.name
  }

  pub fn descriptor(&self) -> &DependencyDescriptor {
    &self.descriptor
  }

  /// Clones into the root's source tree and applies patches after a fresh
  /// clone. An existing source directory is left exactly as it is.
  pub(crate) async fn fetch(&self, ctx: &ResolutionContext) -> Result<DownloadOutcome> {
    let dest = ctx.root().dir_for_dependency(self.name());
    let lock = ctx.source_lock(&dest);
    let _source = lock.lock().await;
    let _slot = ctx.download_slot().await?;

    ctx.emit(Event::Downloading {
      name: self.name().to_string(),
    });

    let vcs = ctx.vcs();
    let outcome = vcs.download(&self.repository, &dest).await?;
    if outcome == DownloadOutcome::Cloned {
      for patch in &self.patches {
        ctx.emit(Event::Patching {
          name: self.name().to_string(),
          patch: patch.clone(),
        });
        vcs.patch(&dest, patch).await?;
      }
    }

    ctx.emit(Event::Downloaded {
      name: self.name().to_string(),
      outcome,
    });
    Ok(outcome)
  }
}
