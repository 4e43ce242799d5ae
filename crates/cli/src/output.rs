//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output including colored status
//! messages, duration formatting, and the console rendering of build events.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use raft_lib::events::{Event, EventSink};
use raft_lib::vcs::DownloadOutcome;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_step(label: &str, detail: &str) {
  println!(
    "{} {} {}",
    symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
    label.if_supports_color(Stream::Stdout, |s| s.bold()),
    detail
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Prints build progress as it happens.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
  fn record(&self, event: &Event) {
    match event {
      Event::Resolved { target } => print_info(&format!("Building for {target}")),
      Event::Downloading { name } => print_step("Downloading", name),
      Event::Downloaded {
        name,
        outcome: DownloadOutcome::AlreadyPresent,
      } => print_step("Up to date", name),
      Event::Downloaded { .. } => {}
      Event::Patching { name, patch } => print_step("Patching", &format!("{name} ({})", patch.display())),
      Event::Building { name } => print_step("Building", name),
      Event::Installed { name, .. } => print_step("Installed", name),
      Event::BeforeBuild { architecture } => print_step("Preparing", architecture),
      Event::ProjectConfiguring { root } => print_step("Configuring", &root.display().to_string()),
      Event::ProjectBuilt { .. } => {}
      Event::Cleaned { path } => print_step("Removed", &path.display().to_string()),
    }
  }
}
