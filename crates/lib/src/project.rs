//! A loaded raft project and the directory layout derived from its root.
//!
//! ```text
//! <root>/Raft/raftfile.json
//! <root>/Raft/libs/src/<name>
//! <root>/Raft/libs/build/<platform>/<architecture>/<mode>/<name>
//! <root>/Raft/libs/install/<platform>/<architecture>/<mode>/{include,lib,framework}
//! <root>/build/<platform>/<architecture>
//! <root>/install
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cmake::BuildOptionSet;
use crate::config::BuildConfiguration;
use crate::error::{RaftError, Result};
use crate::manifest::{DependencyDescriptor, Manifest};

pub const RAFT_DIR: &str = "Raft";
pub const RAFT_FILE: &str = "raftfile.json";
pub const FRAMEWORK_DIR: &str = "framework";

const LIBS_DIR: &str = "libs";
const SRC_DIR: &str = "src";
const BUILD_DIR: &str = "build";
const INSTALL_DIR: &str = "install";
const INCLUDE_DIR: &str = "include";
const LIB_DIR: &str = "lib";
const CMAKE_MODULES_DIR: &str = "cmake";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
  root: PathBuf,
  manifest: Manifest,
}

impl Project {
  pub fn new(root: PathBuf, manifest: Manifest) -> Self {
    Self { root, manifest }
  }

  /// Loads the project rooted at `root`.
  pub async fn load(root: &Path) -> Result<Self> {
    let root = dunce::canonicalize(root).map_err(RaftError::fs("resolve", root))?;
    let manifest = Manifest::load(&root.join(RAFT_DIR).join(RAFT_FILE)).await?;
    debug!(root = %root.display(), dependencies = manifest.dependencies.len(), "loaded project");
    Ok(Self::new(root, manifest))
  }

  /// Walks from `start` up through its ancestors and loads the first
  /// directory that contains a `Raft` directory.
  pub async fn find(start: &Path) -> Result<Self> {
    let start = dunce::canonicalize(start).map_err(RaftError::fs("resolve", start))?;
    for dir in start.ancestors() {
      if dir.join(RAFT_DIR).is_dir() {
        return Self::load(dir).await;
      }
    }
    Err(RaftError::Configuration(format!(
      "'{}' is not inside a raft project",
      start.display()
    )))
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn manifest(&self) -> &Manifest {
    &self.manifest
  }

  pub fn dependencies(&self) -> &[DependencyDescriptor] {
    &self.manifest.dependencies
  }

  pub fn raft_dir(&self) -> PathBuf {
    self.root.join(RAFT_DIR)
  }

  fn libs_dir(&self) -> PathBuf {
    self.raft_dir().join(LIBS_DIR)
  }

  pub fn dir_for_dependency_sources(&self) -> PathBuf {
    self.libs_dir().join(SRC_DIR)
  }

  /// Where the dependency's source is cloned.
  pub fn dir_for_dependency(&self, name: &str) -> PathBuf {
    self.dir_for_dependency_sources().join(name)
  }

  /// Parent of every dependency build directory.
  pub fn dir_for_dependency_builds(&self) -> PathBuf {
    self.libs_dir().join(BUILD_DIR)
  }

  pub fn dir_for_dependency_build(&self, name: &str, config: &BuildConfiguration) -> PathBuf {
    self
      .dir_for_dependency_builds()
      .join(config.platform.name)
      .join(config.architecture.name)
      .join(config.mode().as_str())
      .join(name)
  }

  /// Parent of every dependency install tree.
  pub fn dir_for_dependency_installs(&self) -> PathBuf {
    self.libs_dir().join(INSTALL_DIR)
  }

  /// The shared install tree for one target.
  pub fn dir_for_dependency_install(&self, config: &BuildConfiguration) -> PathBuf {
    self
      .dir_for_dependency_installs()
      .join(config.platform.name)
      .join(config.architecture.name)
      .join(config.mode().as_str())
  }

  pub fn dir_for_dependency_lib(&self, config: &BuildConfiguration) -> PathBuf {
    self.dir_for_dependency_install(config).join(LIB_DIR)
  }

  pub fn dir_for_dependency_inc(&self, config: &BuildConfiguration) -> PathBuf {
    self.dir_for_dependency_install(config).join(INCLUDE_DIR)
  }

  pub fn dir_for_dependency_framework(&self, config: &BuildConfiguration) -> PathBuf {
    self.dir_for_dependency_install(config).join(FRAMEWORK_DIR)
  }

  /// Parent of every root build directory.
  pub fn dir_for_builds(&self) -> PathBuf {
    self.root.join(BUILD_DIR)
  }

  pub fn dir_for_build(&self, config: &BuildConfiguration) -> PathBuf {
    self
      .dir_for_builds()
      .join(config.platform.name)
      .join(config.architecture.name)
  }

  pub fn dir_for_install(&self) -> PathBuf {
    self.root.join(INSTALL_DIR)
  }

  /// `Raft/cmake`, if the project ships its own cmake modules.
  pub fn cmake_module_dir(&self) -> Option<PathBuf> {
    let dir = self.raft_dir().join(CMAKE_MODULES_DIR);
    dir.is_dir().then_some(dir)
  }

  pub fn is_same_project(&self, other: &Project) -> bool {
    self.root == other.root
  }

  /// Options every dependency of this (root) project is configured with:
  /// install prefix and search paths all point at the shared install tree.
  pub fn dependency_build_options(&self, config: &BuildConfiguration, helper_dir: &Path) -> BuildOptionSet {
    BuildOptionSet::create(&self.dir_for_dependency_install(config), helper_dir)
      .release_mode(config.release)
      .distributable(config.distributable)
      .include_dir(&self.dir_for_dependency_inc(config))
      .lib_dir(&self.dir_for_dependency_lib(config))
      .framework_dir(&self.dir_for_dependency_framework(config))
      .architecture(config.architecture, config.release)
  }

  /// Options for configuring this project inside `root`'s build.
  ///
  /// The root project installs to `<root>/install`; any other project
  /// installs into the root's shared dependency tree.
  pub fn build_options(&self, root: &Project, config: &BuildConfiguration, helper_dir: &Path) -> BuildOptionSet {
    let options = root.dependency_build_options(config, helper_dir);
    let options = if self.is_same_project(root) {
      options.install_dir(&self.dir_for_install())
    } else {
      options
    };
    options.cmake_module_path(self.cmake_module_dir().as_deref())
  }
}
