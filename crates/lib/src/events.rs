//! Progress notifications emitted while a build runs.
//!
//! Resolution code reports what it is doing through an [`EventSink`] and
//! never prints. The CLI decides how events look.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::vcs::DownloadOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  /// The build target was chosen.
  Resolved { target: String },
  Downloading { name: String },
  Downloaded { name: String, outcome: DownloadOutcome },
  Patching { name: String, patch: PathBuf },
  Building { name: String },
  Installed { name: String, install_dir: PathBuf },
  BeforeBuild { architecture: String },
  ProjectConfiguring { root: PathBuf },
  ProjectBuilt { build_dir: PathBuf },
  Cleaned { path: PathBuf },
}

pub trait EventSink: Send + Sync {
  fn record(&self, event: &Event);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
  fn record(&self, event: &Event) {
    match event {
      Event::Resolved { target } => info!(%target, "build target"),
      Event::Downloading { name } => info!(%name, "downloading"),
      Event::Downloaded { name, outcome } => debug!(%name, ?outcome, "downloaded"),
      Event::Patching { name, patch } => info!(%name, patch = %patch.display(), "patching"),
      Event::Building { name } => info!(%name, "building"),
      Event::Installed { name, install_dir } => info!(%name, dir = %install_dir.display(), "installed"),
      Event::BeforeBuild { architecture } => info!(%architecture, "running pre-build hook"),
      Event::ProjectConfiguring { root } => info!(root = %root.display(), "configuring project"),
      Event::ProjectBuilt { build_dir } => info!(dir = %build_dir.display(), "project built"),
      Event::Cleaned { path } => info!(path = %path.display(), "removed"),
    }
  }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
  fn record(&self, _: &Event) {}
}
