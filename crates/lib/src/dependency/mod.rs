//! Dependency resolution.
//!
//! Each raftfile entry becomes a [`Dependency`] node. Resolution runs in two
//! passes: [`download_all`] clones every node (siblings concurrently, nested
//! projects recursively), then [`build_install_all`] builds and installs
//! them one at a time in raftfile order. Everything lands in the root
//! project's trees, described by a shared [`ResolutionContext`].

mod context;
mod native;
mod nested;
mod repository;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{RaftError, Result};
use crate::manifest::{BuildSystem, DependencyDescriptor};
use crate::process::BoxFuture;

pub use context::ResolutionContext;
pub use native::NativeBuildDependency;
pub use nested::NestedProjectDependency;
pub use repository::RepositoryDependency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
  Repository(RepositoryDependency),
  NativeBuild(NativeBuildDependency),
  NestedProject(NestedProjectDependency),
}

impl Dependency {
  /// Builds a node for `descriptor`, declared by the project whose `Raft`
  /// directory is `raft_dir`. `ancestry` lists the project roots from the
  /// root project down to the declaring project.
  pub fn from_descriptor(descriptor: &DependencyDescriptor, raft_dir: &Path, ancestry: &[PathBuf]) -> Result<Self> {
    let source = RepositoryDependency::new(descriptor, raft_dir)?;
    Ok(match descriptor.build_system {
      BuildSystem::None => Dependency::Repository(source),
      BuildSystem::Cmake => Dependency::NativeBuild(NativeBuildDependency::new(source)),
      BuildSystem::Raft => Dependency::NestedProject(NestedProjectDependency::new(source, ancestry.to_vec())),
    })
  }

  pub fn source(&self) -> &RepositoryDependency {
    match self {
      Dependency::Repository(source) => source,
      Dependency::NativeBuild(native) => native.source(),
      Dependency::NestedProject(nested) => nested.source(),
    }
  }

  pub fn name(&self) -> &str {
    self.source().name()
  }

  /// Clones (and for nested projects, loads and downloads children).
  pub fn download(self, ctx: Arc<ResolutionContext>) -> BoxFuture<'static, Result<Self>> {
    Box::pin(async move {
      match self {
        Dependency::NestedProject(nested) => nested.download(ctx).await.map(Dependency::NestedProject),
        other => {
          other.source().fetch(&ctx).await?;
          Ok(other)
        }
      }
    })
  }

  /// Builds and installs into the root's shared install tree. Repository-only
  /// dependencies have nothing to build.
  pub fn build_install<'a>(&'a self, ctx: &'a ResolutionContext) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
      match self {
        Dependency::Repository(_) => Ok(()),
        Dependency::NativeBuild(native) => native.build_install(ctx).await,
        Dependency::NestedProject(nested) => nested.build_install(ctx).await,
      }
    })
  }

  /// Names of this node and everything beneath it, children first.
  pub fn resolved_names(&self) -> Vec<String> {
    let mut names = Vec::new();
    if let Dependency::NestedProject(nested) = self {
      for child in nested.children() {
        names.extend(child.resolved_names());
      }
    }
    names.push(self.name().to_string());
    names
  }
}

/// Builds nodes for the root project's raftfile.
pub fn root_dependencies(ctx: &ResolutionContext) -> Result<Vec<Dependency>> {
  let root = ctx.root();
  let ancestry = [root.root().to_path_buf()];
  let raft_dir = root.raft_dir();
  root
    .dependencies()
    .iter()
    .map(|descriptor| Dependency::from_descriptor(descriptor, &raft_dir, &ancestry))
    .collect()
}

/// Downloads sibling dependencies concurrently.
///
/// Returns the downloaded nodes in their original order. The first failure
/// aborts every sibling still running.
pub async fn download_all(dependencies: Vec<Dependency>, ctx: Arc<ResolutionContext>) -> Result<Vec<Dependency>> {
  let mut join_set = JoinSet::new();
  let mut slots: Vec<Option<Dependency>> = Vec::with_capacity(dependencies.len());

  for (index, dependency) in dependencies.into_iter().enumerate() {
    slots.push(None);
    let ctx = ctx.clone();
    join_set.spawn(async move { dependency.download(ctx).await.map(|dependency| (index, dependency)) });
  }

  while let Some(joined) = join_set.join_next().await {
    let outcome = joined.map_err(|err| RaftError::Interrupted(err.to_string())).and_then(|result| result);
    match outcome {
      Ok((index, dependency)) => slots[index] = Some(dependency),
      Err(err) => {
        join_set.abort_all();
        return Err(err);
      }
    }
  }

  debug!(count = slots.len(), "downloaded dependencies");
  Ok(slots.into_iter().flatten().collect())
}

/// Builds and installs `dependencies` one at a time, in order.
///
/// They all write into the same install tree, so they never run
/// concurrently.
pub async fn build_install_all(dependencies: &[Dependency], ctx: &ResolutionContext) -> Result<()> {
  for dependency in dependencies {
    dependency.build_install(ctx).await?;
  }
  Ok(())
}
