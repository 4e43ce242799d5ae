//! Build target resolution.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{RaftError, Result};
use crate::manifest::ArchitectureDescriptor;
use crate::platform::{Architecture, Platform, find_platform, host_platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
  Debug,
  Release,
}

impl Mode {
  /// Directory name and `--config` value.
  pub fn as_str(&self) -> &'static str {
    match self {
      Mode::Debug => "Debug",
      Mode::Release => "Release",
    }
  }

  /// Value of `CMAKE_BUILD_TYPE`.
  pub fn build_type(&self) -> &'static str {
    match self {
      Mode::Debug => "DEBUG",
      Mode::Release => "RELEASE",
    }
  }
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// What the caller asked to build. Names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRequest {
  pub platform: Option<String>,
  pub architecture: Option<String>,
  pub release: bool,
  pub distribute: bool,
}

/// One resolved build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfiguration {
  pub platform: &'static Platform,
  pub architecture: &'static Architecture,
  pub release: bool,
  pub distributable: bool,
}

impl BuildConfiguration {
  /// Matches `request` against the raftfile's declared targets.
  ///
  /// An empty `declared` list means the host platform with its default
  /// architecture. Otherwise the first declared pair matching the request
  /// wins.
  pub fn resolve(request: &BuildRequest, declared: &[ArchitectureDescriptor]) -> Result<Self> {
    let candidates = if declared.is_empty() {
      let host = host_platform();
      vec![(host, host.default_architecture())]
    } else {
      declared.iter().map(lookup).collect::<Result<Vec<_>>>()?
    };

    let matches = |wanted: &Option<String>, actual: &str| wanted.as_deref().is_none_or(|w| w.eq_ignore_ascii_case(actual));

    let (platform, architecture) = candidates
      .into_iter()
      .find(|(platform, arch)| matches(&request.platform, platform.name) && matches(&request.architecture, arch.name))
      .ok_or_else(|| {
        RaftError::Configuration(format!(
          "no declared architecture matches platform '{}' and architecture '{}'",
          request.platform.as_deref().unwrap_or("*"),
          request.architecture.as_deref().unwrap_or("*"),
        ))
      })?;

    debug!(platform = %platform, architecture = %architecture, release = request.release, "resolved build configuration");
    Ok(Self {
      platform,
      architecture,
      release: request.release,
      distributable: request.distribute,
    })
  }

  pub fn mode(&self) -> Mode {
    if self.release { Mode::Release } else { Mode::Debug }
  }

  /// The architecture's generator if it has one, else the platform's.
  pub fn generator(&self) -> Option<&'static str> {
    self.architecture.generator_override().or_else(|| self.platform.generator_name())
  }
}

impl fmt::Display for BuildConfiguration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{} ({})", self.platform, self.architecture, self.mode())
  }
}

fn lookup(descriptor: &ArchitectureDescriptor) -> Result<(&'static Platform, &'static Architecture)> {
  let platform = find_platform(&descriptor.platform)
    .ok_or_else(|| RaftError::Configuration(format!("unknown platform '{}'", descriptor.platform)))?;
  let architecture = platform.find_architecture(&descriptor.architecture).ok_or_else(|| {
    RaftError::Configuration(format!(
      "platform '{}' has no architecture '{}'",
      platform, descriptor.architecture
    ))
  })?;
  Ok((platform, architecture))
}
