use std::time::Instant;

use anyhow::{Context, Result};

use raft_lib::config::BuildRequest;

use super::{current_dir, orchestrator, runtime};
use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

pub fn cmd_build(request: BuildRequest, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let cwd = current_dir()?;
  let orchestrator = orchestrator(output)?;

  let report = runtime()?
    .block_on(orchestrator.build(&cwd, &request))
    .context("Build failed")?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    println!();
    print_success("Build complete!");
    print_stat("Target", &format!("{}/{} ({})", report.platform, report.architecture, report.mode));
    print_stat("Dependencies", &report.dependencies.len().to_string());
    print_stat("Build directory", &report.build_dir.display().to_string());
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}
