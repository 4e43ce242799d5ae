mod build;
mod clean;
mod info;
mod run;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use info::cmd_info;
pub use run::cmd_run;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use raft_lib::Orchestrator;
use raft_lib::events::{EventSink, TracingSink};
use raft_lib::process::SystemRunner;
use raft_lib::settings::Settings;

use crate::output::{ConsoleSink, OutputFormat};

/// Loads settings and wires the real process runner. JSON output keeps
/// stdout clean by sending progress to the log instead of the console.
fn orchestrator(output: OutputFormat) -> Result<Orchestrator> {
  let settings = Settings::load().context("Failed to load settings")?;
  let events: Arc<dyn EventSink> = if output.is_json() {
    Arc::new(TracingSink)
  } else {
    Arc::new(ConsoleSink)
  };
  Ok(Orchestrator::new(settings, Arc::new(SystemRunner), events))
}

fn current_dir() -> Result<PathBuf> {
  std::env::current_dir().context("Failed to read current directory")
}

fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Runtime::new().context("Failed to create async runtime")
}
