//! Manifest types for raft.
//!
//! # Example
//!
//! ```json
//! {
//!   "dependencies": [
//!     {
//!       "name": "zlib",
//!       "repository": { "type": "git", "location": "https://github.com/madler/zlib.git", "branch": "v1.3.1" },
//!       "buildSystem": "cmake",
//!       "patches": ["patches/zlib-install-dirs.patch"],
//!       "configOptions": [{ "name": "ZLIB_BUILD_EXAMPLES", "value": "OFF" }]
//!     }
//!   ],
//!   "architectures": [{ "platform": "Host", "architecture": "Host" }],
//!   "executableName": "game"
//! }
//! ```

use std::collections::HashSet;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{RaftError, Result};
use crate::platform::Flag;

/// The only repository type raft knows how to download.
pub const GIT_REPOSITORY: &str = "git";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
  #[serde(default)]
  pub dependencies: Vec<DependencyDescriptor>,

  /// Supported targets. Empty means "the host platform only".
  #[serde(default)]
  pub architectures: Vec<ArchitectureDescriptor>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub executable_name: Option<String>,
}

/// Where a dependency's source is fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
  #[serde(rename = "type")]
  pub kind: String,
  pub location: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub branch: Option<String>,
}

/// How a dependency is built once downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
  /// Download only, for header-only or prebuilt sources.
  None,
  /// A plain cmake project.
  Cmake,
  /// A raft project with its own raftfile.
  Raft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDescriptor {
  pub name: String,
  pub repository: RepositoryDescriptor,
  pub build_system: BuildSystem,

  /// Patch files relative to the declaring project's `Raft` directory.
  #[serde(default)]
  pub patches: Vec<String>,

  /// Extra cache variables passed when configuring this dependency.
  #[serde(default)]
  pub config_options: Vec<Flag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureDescriptor {
  pub platform: String,
  pub architecture: String,
}

impl Manifest {
  /// Parses and validates a raftfile. `path` is only used for error messages.
  pub fn parse(content: &str, path: &Path) -> Result<Self> {
    let manifest: Manifest = serde_json::from_str(content).map_err(|source| RaftError::Manifest {
      path: path.to_path_buf(),
      source,
    })?;
    manifest.validate()?;
    Ok(manifest)
  }

  pub async fn load(path: &Path) -> Result<Self> {
    let content = tokio::fs::read_to_string(path)
      .await
      .map_err(RaftError::fs("read", path))?;
    Self::parse(&content, path)
  }

  /// Checks the invariants resolution relies on.
  pub fn validate(&self) -> Result<()> {
    let mut seen = HashSet::new();
    for dependency in &self.dependencies {
      if dependency.name.is_empty() {
        return Err(RaftError::Configuration("dependency names must not be empty".to_string()));
      }
      if !is_plain_name(&dependency.name) {
        return Err(RaftError::Configuration(format!(
          "dependency name '{}' must be a single directory name",
          dependency.name
        )));
      }
      if !seen.insert(dependency.name.as_str()) {
        return Err(RaftError::Configuration(format!(
          "dependency '{}' is declared more than once",
          dependency.name
        )));
      }
      if !dependency.repository.kind.eq_ignore_ascii_case(GIT_REPOSITORY) {
        return Err(RaftError::Configuration(format!(
          "dependency '{}' uses unsupported repository type '{}'",
          dependency.name, dependency.repository.kind
        )));
      }
    }
    Ok(())
  }

  pub fn dependency(&self, name: &str) -> Option<&DependencyDescriptor> {
    self.dependencies.iter().find(|dependency| dependency.name == name)
  }
}

/// Names become directories under `Raft/libs/{src,build}`, so they must not
/// contain separators or `.`/`..`.
fn is_plain_name(name: &str) -> bool {
  let mut components = Path::new(name).components();
  matches!(components.next(), Some(Component::Normal(_)))
    && components.next().is_none()
    && !name.contains(['/', '\\'])
}
