//! User settings stored in `~/.raftconfig`.
//!
//! The file is optional JSON. Environment variables are applied on top of it:
//! - `RAFT_CONFIG`: alternate settings file
//! - `RAFT_CMAKE`: cmake executable
//! - `RAFT_GIT`: git executable
//! - `RAFT_HELPER_DIR`: directory holding `raft.cmake` and toolchain files
//! - `ANDROID_NDK`: NDK root used by the Android pre-build hook

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::consts::SETTINGS_FILENAME;
use crate::error::{RaftError, Result};
use crate::platform::paths::{data_dir, home_dir};

const DEFAULT_PARALLELISM: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
  pub cmake: String,
  pub git: String,
  pub helper_dir: PathBuf,
  pub android_ndk: Option<PathBuf>,
  /// Maximum number of dependency downloads in flight at once.
  pub parallelism: usize,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      cmake: "cmake".to_string(),
      git: "git".to_string(),
      helper_dir: data_dir().join("cmake"),
      android_ndk: None,
      parallelism: DEFAULT_PARALLELISM,
    }
  }
}

impl Settings {
  /// Loads the settings file (if any) and applies environment overrides.
  pub fn load() -> Result<Self> {
    let settings = Self::load_from(&settings_path())?;
    Ok(settings.with_env_overrides())
  }

  /// Loads settings from `path`, falling back to defaults when it does not exist.
  pub fn load_from(path: &Path) -> Result<Self> {
    if !path.exists() {
      debug!(path = %path.display(), "no settings file, using defaults");
      return Ok(Self::default());
    }

    let content = std::fs::read_to_string(path).map_err(RaftError::fs("read", path))?;
    let settings: Settings = serde_json::from_str(&content).map_err(|source| RaftError::Manifest {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
  }

  fn with_env_overrides(mut self) -> Self {
    if let Ok(cmake) = std::env::var("RAFT_CMAKE") {
      self.cmake = cmake;
    }
    if let Ok(git) = std::env::var("RAFT_GIT") {
      self.git = git;
    }
    if let Some(dir) = std::env::var_os("RAFT_HELPER_DIR") {
      self.helper_dir = PathBuf::from(dir);
    }
    if let Some(ndk) = std::env::var_os("ANDROID_NDK") {
      self.android_ndk = Some(PathBuf::from(ndk));
    }
    self
  }

  pub fn download_parallelism(&self) -> usize {
    self.parallelism.max(1)
  }
}

/// Location of the user settings file.
pub fn settings_path() -> PathBuf {
  std::env::var_os("RAFT_CONFIG")
    .map(PathBuf::from)
    .unwrap_or_else(|| home_dir().join(SETTINGS_FILENAME))
}
