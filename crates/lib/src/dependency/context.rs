use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::warn;

use crate::cmake::BuildDriver;
use crate::config::BuildConfiguration;
use crate::error::{RaftError, Result};
use crate::events::{Event, EventSink};
use crate::manifest::DependencyDescriptor;
use crate::process::CommandRunner;
use crate::project::Project;
use crate::settings::Settings;
use crate::vcs::VcsClient;

/// State shared by every node of one resolution pass.
///
/// Directories are always derived from the root project, so nested projects
/// resolve into the same shared trees as the root's own dependencies.
pub struct ResolutionContext {
  root: Project,
  config: BuildConfiguration,
  settings: Settings,
  runner: Arc<dyn CommandRunner>,
  events: Arc<dyn EventSink>,
  download_slots: Semaphore,
  /// One lock per source directory so two declarations of the same name
  /// never clone concurrently.
  source_locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
  installed: Mutex<HashMap<String, DependencyDescriptor>>,
}

impl ResolutionContext {
  pub fn new(
    root: Project,
    config: BuildConfiguration,
    settings: Settings,
    runner: Arc<dyn CommandRunner>,
    events: Arc<dyn EventSink>,
  ) -> Self {
    let download_slots = Semaphore::new(settings.download_parallelism());
    Self {
      root,
      config,
      settings,
      runner,
      events,
      download_slots,
      source_locks: Mutex::new(HashMap::new()),
      installed: Mutex::new(HashMap::new()),
    }
  }

  pub fn root(&self) -> &Project {
    &self.root
  }

  pub fn config(&self) -> &BuildConfiguration {
    &self.config
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn emit(&self, event: Event) {
    self.events.record(&event);
  }

  pub(crate) fn vcs(&self) -> VcsClient {
    VcsClient::new(self.runner.clone(), &self.settings.git)
  }

  pub(crate) fn driver(&self, build_dir: PathBuf) -> BuildDriver<'_> {
    BuildDriver::new(self.runner.as_ref(), &self.settings.cmake, build_dir, self.config)
  }

  pub(crate) async fn download_slot(&self) -> Result<SemaphorePermit<'_>> {
    self
      .download_slots
      .acquire()
      .await
      .map_err(|_| RaftError::Interrupted("download queue closed".to_string()))
  }

  pub(crate) fn source_lock(&self, dir: &Path) -> Arc<tokio::sync::Mutex<()>> {
    let mut locks = self.source_locks.lock().unwrap_or_else(PoisonError::into_inner);
    locks.entry(dir.to_path_buf()).or_default().clone()
  }

  /// Notes that `descriptor` was installed into the shared tree.
  ///
  /// A second install under the same name overwrites the first. When the two
  /// declarations point at different sources that is almost certainly a
  /// mistake, so it is logged.
  pub(crate) fn record_install(&self, descriptor: &DependencyDescriptor) {
    let mut installed = self.installed.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(previous) = installed.insert(descriptor.name.clone(), descriptor.clone())
      && previous.repository != descriptor.repository
    {
      warn!(
        name = %descriptor.name,
        first = %previous.repository.location,
        second = %descriptor.repository.location,
        "dependency installed twice from different repositories; the last install wins"
      );
    }
  }
}
