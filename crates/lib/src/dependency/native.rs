use tracing::debug;

use crate::error::Result;
use crate::events::Event;

use super::{RepositoryDependency, ResolutionContext};

/// A plain cmake project, built and installed into the root's shared tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBuildDependency {
  source: RepositoryDependency,
}

impl NativeBuildDependency {
  pub fn new(source: RepositoryDependency) -> Self {
    Self { source }
  }

  pub fn source(&self) -> &RepositoryDependency {
    &self.source
  }

  pub(crate) async fn build_install(&self, ctx: &ResolutionContext) -> Result<()> {
    let name = self.source.name();
    let root = ctx.root();
    let config = ctx.config();

    ctx.emit(Event::Building { name: name.to_string() });

    let options = root
      .dependency_build_options(config, &ctx.settings().helper_dir)
      .extra_flags(&self.source.descriptor().config_options);
    debug!(%name, flags = ?options.to_flag_args(), "assembled build options");

    let driver = ctx.driver(root.dir_for_dependency_build(name, config));
    driver.run_all(&root.dir_for_dependency(name), &options).await?;

    ctx.record_install(self.source.descriptor());
    ctx.emit(Event::Installed {
      name: name.to_string(),
      install_dir: root.dir_for_dependency_install(config),
    });
    Ok(())
  }
}
