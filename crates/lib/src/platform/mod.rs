//! Build targets.
//!
//! A [`Platform`] is a named build family (the desktop host, Android, iOS, ...)
//! and an [`Architecture`] is one variant inside it. Both are plain data
//! records held in a static registry; per-target behavior is expressed as
//! function values rather than trait objects.

pub mod flags;
mod hooks;
pub mod paths;
mod registry;

use std::fmt;
use std::path::Path;

use crate::config::BuildConfiguration;
use crate::error::Result;
use crate::project::Project;
use crate::settings::Settings;

pub use flags::Flag;
pub use registry::PLATFORMS;

/// Inputs available to an architecture when it produces its cmake flags.
#[derive(Debug, Clone, Copy)]
pub struct FlagContext<'a> {
  pub release: bool,
  /// Directory holding `raft.cmake` and the bundled toolchain files.
  pub helper_dir: &'a Path,
}

/// Work an architecture performs before the root project is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeBuild {
  Nothing,
  /// Copy the NDK's `libc++_shared.so` into the shared install `lib` directory.
  InstallAndroidStl,
}

/// A named build variant within a [`Platform`].
#[derive(Debug, Clone, Copy)]
pub struct Architecture {
  pub name: &'static str,
  flags: fn(&Architecture, &FlagContext<'_>) -> Vec<Flag>,
  build_args: fn(&Architecture) -> Vec<String>,
  generator: Option<&'static str>,
  before_build: BeforeBuild,
}

impl Architecture {
  pub(crate) const fn new(name: &'static str, flags: fn(&Architecture, &FlagContext<'_>) -> Vec<Flag>) -> Self {
    Self {
      name,
      flags,
      build_args: no_build_args,
      generator: None,
      before_build: BeforeBuild::Nothing,
    }
  }

  pub(crate) const fn with_build_args(mut self, build_args: fn(&Architecture) -> Vec<String>) -> Self {
    self.build_args = build_args;
    self
  }

  pub(crate) const fn with_generator(mut self, generator: &'static str) -> Self {
    self.generator = Some(generator);
    self
  }

  pub(crate) const fn with_before_build(mut self, before_build: BeforeBuild) -> Self {
    self.before_build = before_build;
    self
  }

  /// Cache variables this architecture contributes to every configure step.
  pub fn native_build_flags(&self, ctx: &FlagContext<'_>) -> Vec<Flag> {
    (self.flags)(self, ctx)
  }

  /// Arguments forwarded to the native build tool after `--`.
  pub fn extra_build_args(&self) -> Vec<String> {
    (self.build_args)(self)
  }

  pub fn generator_override(&self) -> Option<&'static str> {
    self.generator
  }

  pub fn before_build_hook(&self) -> BeforeBuild {
    self.before_build
  }

  /// Runs the architecture's pre-build hook against the root project.
  pub async fn before_build(&self, project: &Project, config: &BuildConfiguration, settings: &Settings) -> Result<()> {
    match self.before_build {
      BeforeBuild::Nothing => Ok(()),
      BeforeBuild::InstallAndroidStl => hooks::install_android_stl(project, config, settings).await,
    }
  }
}

impl PartialEq for Architecture {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name && self.generator == other.generator && self.before_build == other.before_build
  }
}

impl Eq for Architecture {}

impl fmt::Display for Architecture {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// A named build family with one or more architectures.
#[derive(Debug)]
pub struct Platform {
  pub name: &'static str,
  architectures: &'static [Architecture],
  generator: fn() -> Option<&'static str>,
  parallel_build: bool,
}

impl Platform {
  pub(crate) const fn new(name: &'static str, architectures: &'static [Architecture]) -> Self {
    Self {
      name,
      architectures,
      generator: no_generator,
      parallel_build: true,
    }
  }

  pub(crate) const fn with_generator(mut self, generator: fn() -> Option<&'static str>) -> Self {
    self.generator = generator;
    self
  }

  /// The generator already parallelizes builds; don't pass `-j`.
  pub(crate) const fn serial_build_flags(mut self) -> Self {
    self.parallel_build = false;
    self
  }

  pub fn architectures(&self) -> &'static [Architecture] {
    self.architectures
  }

  /// The first registered architecture.
  pub fn default_architecture(&self) -> &'static Architecture {
    &self.architectures[0]
  }

  pub fn generator_name(&self) -> Option<&'static str> {
    (self.generator)()
  }

  pub fn build_parallelism_flags(&self) -> Vec<String> {
    if !self.parallel_build {
      return Vec::new();
    }
    let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    vec!["-j".to_string(), (cpus + 1).to_string()]
  }

  /// Case-insensitive architecture lookup.
  pub fn find_architecture(&self, name: &str) -> Option<&'static Architecture> {
    self.architectures.iter().find(|arch| arch.name.eq_ignore_ascii_case(name))
  }
}

impl PartialEq for Platform {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}

impl Eq for Platform {}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// Every platform raft can target, in registration order.
pub fn platforms() -> &'static [Platform] {
  PLATFORMS
}

/// The desktop platform of the machine running raft.
pub fn host_platform() -> &'static Platform {
  &PLATFORMS[0]
}

/// Case-insensitive platform lookup.
pub fn find_platform(name: &str) -> Option<&'static Platform> {
  PLATFORMS.iter().find(|platform| platform.name.eq_ignore_ascii_case(name))
}

fn no_build_args(_: &Architecture) -> Vec<String> {
  Vec::new()
}

fn no_generator() -> Option<&'static str> {
  None
}
