use anyhow::{Context, Result};
use tracing::info;

use raft_lib::config::BuildRequest;

use super::{current_dir, orchestrator, runtime};
use crate::output::OutputFormat;

/// Builds, then runs the raftfile's `executableName` attached to this terminal.
pub fn cmd_run(request: BuildRequest) -> Result<()> {
  let cwd = current_dir()?;
  let orchestrator = orchestrator(OutputFormat::Text)?;

  let report = runtime()?
    .block_on(orchestrator.run(&cwd, &request))
    .context("Run failed")?;

  info!(executable = %report.executable.display(), "executable exited");
  Ok(())
}
