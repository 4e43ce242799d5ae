use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::{RaftError, Result};
use crate::events::Event;
use crate::project::Project;

use super::{Dependency, RepositoryDependency, ResolutionContext, build_install_all, download_all};

/// A dependency that is itself a raft project with its own raftfile.
///
/// Its children are cloned, built and installed against the root project's
/// trees, never its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedProjectDependency {
  source: RepositoryDependency,
  /// Roots of every project between the root and the declaring project.
  ancestry: Vec<PathBuf>,
  resolved: Option<ResolvedProject>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedProject {
  project: Project,
  children: Vec<Dependency>,
}

impl NestedProjectDependency {
  pub fn new(source: RepositoryDependency, ancestry: Vec<PathBuf>) -> Self {
    Self {
      source,
      ancestry,
      resolved: None,
    }
  }

  pub fn source(&self) -> &RepositoryDependency {
    &self.source
  }

  pub fn children(&self) -> &[Dependency] {
    self.resolved.as_ref().map_or(&[], |resolved| &resolved.children)
  }

  pub(crate) async fn download(mut self, ctx: Arc<ResolutionContext>) -> Result<Self> {
    let name = self.source.name().to_string();
    self.source.fetch(&ctx).await?;

    let project = Project::find(&ctx.root().dir_for_dependency(&name)).await?;
    if project.is_same_project(ctx.root()) {
      return Err(RaftError::Configuration(format!(
        "dependency '{name}' is declared as a raft project but has no Raft directory"
      )));
    }
    if self.ancestry.iter().any(|root| root == project.root()) {
      let chain = self
        .ancestry
        .iter()
        .chain(std::iter::once(&project.root().to_path_buf()))
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ");
      return Err(RaftError::Configuration(format!(
        "dependency '{name}' forms a cycle: {chain}"
      )));
    }

    let mut ancestry = self.ancestry.clone();
    ancestry.push(project.root().to_path_buf());
    let raft_dir = project.raft_dir();
    let children = project
      .dependencies()
      .iter()
      .map(|descriptor| Dependency::from_descriptor(descriptor, &raft_dir, &ancestry))
      .collect::<Result<Vec<_>>>()?;

    debug!(%name, children = children.len(), "loaded nested project");
    let children = download_all(children, ctx).await?;
    self.resolved = Some(ResolvedProject { project, children });
    Ok(self)
  }

  /// Installs every child, then configures, builds and installs the nested
  /// project itself.
  pub(crate) async fn build_install(&self, ctx: &ResolutionContext) -> Result<()> {
    let name = self.source.name();
    let resolved = self.resolved.as_ref().ok_or_else(|| {
      RaftError::Configuration(format!("dependency '{name}' must be downloaded before it is built"))
    })?;

    build_install_all(&resolved.children, ctx).await?;

    ctx.emit(Event::Building { name: name.to_string() });
    let root = ctx.root();
    let config = ctx.config();
    let options = resolved
      .project
      .build_options(root, config, &ctx.settings().helper_dir)
      .extra_flags(&self.source.descriptor().config_options);

    let driver = ctx.driver(root.dir_for_dependency_build(name, config));
    driver.run_all(resolved.project.root(), &options).await?;

    ctx.record_install(self.source.descriptor());
    ctx.emit(Event::Installed {
      name: name.to_string(),
      install_dir: root.dir_for_dependency_install(config),
    });
    Ok(())
  }
}
