use anyhow::{Context, Result};

use raft_lib::orchestrator::CleanScope;

use super::{current_dir, orchestrator, runtime};
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_clean(scope: CleanScope, output: OutputFormat) -> Result<()> {
  let cwd = current_dir()?;
  let orchestrator = orchestrator(output)?;

  let report = runtime()?
    .block_on(orchestrator.clean(&cwd, &scope))
    .context("Clean failed")?;

  if output.is_json() {
    print_json(&report)?;
  } else if report.removed.is_empty() {
    print_info("Nothing to clean");
  } else {
    println!();
    print_success("Clean complete!");
    print_stat("Directories removed", &report.removed.len().to_string());
  }

  Ok(())
}
