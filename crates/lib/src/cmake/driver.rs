use std::path::{Path, PathBuf};

use tracing::info;

use super::BuildOptionSet;
use crate::config::BuildConfiguration;
use crate::error::Result;
use crate::process::{CommandRunner, Invocation};

/// Configure, build and install for one cmake build directory.
///
/// Each phase awaits the tool before returning; callers run them in order.
pub struct BuildDriver<'a> {
  runner: &'a dyn CommandRunner,
  program: &'a str,
  build_dir: PathBuf,
  config: BuildConfiguration,
}

impl<'a> BuildDriver<'a> {
  pub fn new(runner: &'a dyn CommandRunner, program: &'a str, build_dir: PathBuf, config: BuildConfiguration) -> Self {
    Self {
      runner,
      program,
      build_dir,
      config,
    }
  }

  /// `[-G <generator>] <source> -D...`
  pub fn configure_args(&self, source_dir: &Path, options: &BuildOptionSet) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(generator) = self.config.generator() {
      args.push("-G".to_string());
      args.push(generator.to_string());
    }
    args.push(source_dir.to_string_lossy().into_owned());
    args.extend(options.to_flag_args());
    args
  }

  /// `--build <dir> --config <Mode> [-j N] [-- <arch args>]`
  pub fn build_args(&self) -> Vec<String> {
    let mut args = self.base_build_args();
    args.extend(self.config.platform.build_parallelism_flags());
    self.push_native_args(&mut args);
    args
  }

  /// `--build <dir> --config <Mode> --target install [-- <arch args>]`
  pub fn install_args(&self) -> Vec<String> {
    let mut args = self.base_build_args();
    args.push("--target".to_string());
    args.push("install".to_string());
    self.push_native_args(&mut args);
    args
  }

  pub async fn configure(&self, source_dir: &Path, options: &BuildOptionSet) -> Result<()> {
    info!(source = %source_dir.display(), build = %self.build_dir.display(), "configuring");
    self.invoke("configure", self.configure_args(source_dir, options)).await
  }

  pub async fn build(&self) -> Result<()> {
    info!(build = %self.build_dir.display(), mode = %self.config.mode(), "building");
    self.invoke("build", self.build_args()).await
  }

  pub async fn install(&self) -> Result<()> {
    info!(build = %self.build_dir.display(), "installing");
    self.invoke("install", self.install_args()).await
  }

  /// Configure, build and install, in that order.
  pub async fn run_all(&self, source_dir: &Path, options: &BuildOptionSet) -> Result<()> {
    self.configure(source_dir, options).await?;
    self.build().await?;
    self.install().await
  }

  async fn invoke(&self, phase: &str, args: Vec<String>) -> Result<()> {
    let invocation = Invocation::new(self.program)
      .args(args)
      .cwd(&self.build_dir)
      .label(format!("cmake {phase} {}", self.build_dir.display()));
    self.runner.execute(&invocation).await?;
    Ok(())
  }

  fn base_build_args(&self) -> Vec<String> {
    vec![
      "--build".to_string(),
      self.build_dir.to_string_lossy().into_owned(),
      "--config".to_string(),
      self.config.mode().as_str().to_string(),
    ]
  }

  fn push_native_args(&self, args: &mut Vec<String>) {
    let native = self.config.architecture.extra_build_args();
    if !native.is_empty() {
      args.push("--".to_string());
      args.extend(native);
    }
  }
}
