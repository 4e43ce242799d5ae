use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::consts::HELPER_FILENAME;
use crate::platform::flags::{self, Flag, bool_value};
use crate::platform::paths::to_cmake_path;
use crate::platform::{Architecture, FlagContext};
use crate::project::FRAMEWORK_DIR;

/// Cache variables for one configure step.
///
/// Every setter returns a new set and leaves `self` untouched, so a partially
/// built set can be shared as the base for several configure steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptionSet {
  options: BTreeMap<String, String>,
  helper_dir: PathBuf,
}

impl BuildOptionSet {
  /// Seeds the install prefixes and the `RAFT` helper path.
  pub fn create(install_dir: &Path, helper_dir: &Path) -> Self {
    Self {
      options: BTreeMap::new(),
      helper_dir: helper_dir.to_path_buf(),
    }
    .install_dir(install_dir)
    .with_path(flags::RAFT, &helper_dir.join(HELPER_FILENAME))
  }

  pub fn include_dir(&self, path: &Path) -> Self {
    self.with_path(flags::RAFT_INCLUDE_DIR, path)
  }

  pub fn lib_dir(&self, path: &Path) -> Self {
    self.with_path(flags::RAFT_LIB_DIR, path)
  }

  pub fn framework_dir(&self, path: &Path) -> Self {
    self.with_path(flags::RAFT_FRAMEWORK_DIR, path)
  }

  /// Points both install prefixes at `path`.
  pub fn install_dir(&self, path: &Path) -> Self {
    self
      .with_path(flags::CMAKE_INSTALL_PREFIX, path)
      .with_path(flags::CMAKE_INSTALL_FRAMEWORK_PREFIX, &path.join(FRAMEWORK_DIR))
  }

  pub fn release_mode(&self, release: bool) -> Self {
    let build_type = if release { "RELEASE" } else { "DEBUG" };
    self.with(flags::CMAKE_BUILD_TYPE, build_type)
  }

  pub fn distributable(&self, distributable: bool) -> Self {
    self.with(flags::RAFT_DISTRIBUTABLE, bool_value(distributable))
  }

  /// Merges the architecture's own flags.
  pub fn architecture(&self, architecture: &Architecture, release: bool) -> Self {
    let ctx = FlagContext {
      release,
      helper_dir: &self.helper_dir,
    };
    self.extra_flags(&architecture.native_build_flags(&ctx))
  }

  /// Merges raftfile `configOptions`. Later values win.
  pub fn extra_flags(&self, extra: &[Flag]) -> Self {
    let mut copy = self.clone();
    for flag in extra {
      copy.options.insert(flag.name.clone(), flag.value.clone());
    }
    copy
  }

  /// Leaves the set unchanged when `path` is `None`.
  pub fn cmake_module_path(&self, path: Option<&Path>) -> Self {
    match path {
      Some(path) => self.with_path(flags::CMAKE_MODULE_PATH, path),
      None => self.clone(),
    }
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.options.get(name).map(String::as_str)
  }

  /// `-D<name>=<value>` tokens, sorted by name.
  pub fn to_flag_args(&self) -> Vec<String> {
    self
      .options
      .iter()
      .map(|(name, value)| format!("-D{name}={value}"))
      .collect()
  }

  fn with(&self, name: &str, value: impl Into<String>) -> Self {
    let mut copy = self.clone();
    copy.options.insert(name.to_string(), value.into());
    copy
  }

  fn with_path(&self, name: &str, path: &Path) -> Self {
    self.with(name, to_cmake_path(path))
  }
}
