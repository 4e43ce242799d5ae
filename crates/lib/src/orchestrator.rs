//! The operations the CLI exposes: build, clean and run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::cmake::ensure_helper_file;
use crate::config::{BuildConfiguration, BuildRequest, Mode};
use crate::dependency::{Dependency, ResolutionContext, build_install_all, download_all, root_dependencies};
use crate::error::{RaftError, Result};
use crate::events::{Event, EventSink};
use crate::install_lock::InstallLock;
use crate::process::{CommandRunner, Invocation};
use crate::project::Project;
use crate::settings::Settings;

/// Depth of `<name>` below `Raft/libs/build` (`<platform>/<arch>/<mode>/<name>`).
const DEPENDENCY_BUILD_DEPTH: usize = 4;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
  pub project: PathBuf,
  pub platform: String,
  pub architecture: String,
  pub mode: Mode,
  pub distributable: bool,
  /// Every dependency built, in the order it was installed.
  pub dependencies: Vec<String>,
  pub build_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanScope {
  /// Root build directory plus every dependency build and install tree.
  All,
  /// Dependency build and install trees only.
  Dependencies,
  /// The build directories of one dependency, for every target.
  Dependency(String),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
  pub removed: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
  pub build: BuildReport,
  pub executable: PathBuf,
}

pub struct Orchestrator {
  settings: Settings,
  runner: Arc<dyn CommandRunner>,
  events: Arc<dyn EventSink>,
}

impl Orchestrator {
  pub fn new(settings: Settings, runner: Arc<dyn CommandRunner>, events: Arc<dyn EventSink>) -> Self {
    Self {
      settings,
      runner,
      events,
    }
  }

  /// Builds the project containing `cwd`.
  ///
  /// The target is resolved before any external tool runs. Dependencies are
  /// downloaded, then built and installed in raftfile order while holding
  /// the install tree lock, and finally the root project is configured and
  /// built.
  pub async fn build(&self, cwd: &Path, request: &BuildRequest) -> Result<BuildReport> {
    let root = Project::find(cwd).await?;
    self.build_project(root, request).await
  }

  async fn build_project(&self, root: Project, request: &BuildRequest) -> Result<BuildReport> {
    let config = BuildConfiguration::resolve(request, &root.manifest().architectures)?;
    self.events.record(&Event::Resolved {
      target: config.to_string(),
    });

    ensure_helper_file(&self.settings.helper_dir).await?;
    let _lock = InstallLock::acquire(&root.dir_for_dependency_install(&config), &describe_request(request))?;

    let ctx = Arc::new(ResolutionContext::new(
      root.clone(),
      config,
      self.settings.clone(),
      self.runner.clone(),
      self.events.clone(),
    ));

    let dependencies = download_all(root_dependencies(&ctx)?, ctx.clone()).await?;
    build_install_all(&dependencies, &ctx).await?;

    self.events.record(&Event::BeforeBuild {
      architecture: config.architecture.name.to_string(),
    });
    config.architecture.before_build(&root, &config, &self.settings).await?;

    let build_dir = root.dir_for_build(&config);
    self.events.record(&Event::ProjectConfiguring {
      root: root.root().to_path_buf(),
    });
    let options = root.build_options(&root, &config, &self.settings.helper_dir);
    let driver = ctx.driver(build_dir.clone());
    driver.configure(root.root(), &options).await?;
    driver.build().await?;
    self.events.record(&Event::ProjectBuilt {
      build_dir: build_dir.clone(),
    });

    info!(project = %root.root().display(), target = %config, "build finished");
    Ok(BuildReport {
      project: root.root().to_path_buf(),
      platform: config.platform.name.to_string(),
      architecture: config.architecture.name.to_string(),
      mode: config.mode(),
      distributable: config.distributable,
      dependencies: dependencies.iter().flat_map(Dependency::resolved_names).collect(),
      build_dir,
    })
  }

  /// Removes build output. Dependency sources are never removed.
  pub async fn clean(&self, cwd: &Path, scope: &CleanScope) -> Result<CleanReport> {
    let root = Project::find(cwd).await?;
    let targets = match scope {
      CleanScope::All => vec![
        root.dir_for_builds(),
        root.dir_for_dependency_builds(),
        root.dir_for_dependency_installs(),
      ],
      CleanScope::Dependencies => vec![root.dir_for_dependency_builds(), root.dir_for_dependency_installs()],
      CleanScope::Dependency(name) => {
        let dirs = dependency_build_dirs(&root.dir_for_dependency_builds(), name)?;
        if dirs.is_empty() && root.manifest().dependency(name).is_none() {
          return Err(RaftError::CommandLine(format!("unknown dependency '{name}'")));
        }
        dirs
      }
    };

    let mut report = CleanReport::default();
    for dir in targets {
      if !dir.exists() {
        debug!(path = %dir.display(), "nothing to clean");
        continue;
      }
      tokio::fs::remove_dir_all(&dir)
        .await
        .map_err(RaftError::fs("remove", &dir))?;
      self.events.record(&Event::Cleaned { path: dir.clone() });
      report.removed.push(dir);
    }
    Ok(report)
  }

  /// Builds, then launches the raftfile's `executableName` with inherited
  /// stdio.
  pub async fn run(&self, cwd: &Path, request: &BuildRequest) -> Result<RunReport> {
    let root = Project::find(cwd).await?;
    let name = root
      .manifest()
      .executable_name
      .clone()
      .ok_or_else(|| RaftError::Configuration("raftfile has no executableName".to_string()))?;

    let build = self.build_project(root, request).await?;
    let executable = locate_executable(&build.build_dir, &name, build.mode)?;

    let invocation = Invocation::new(executable.to_string_lossy())
      .cwd(&build.build_dir)
      .label(name)
      .interactive();
    self.runner.execute(&invocation).await?;
    Ok(RunReport { build, executable })
  }
}

fn describe_request(request: &BuildRequest) -> String {
  let mut parts = vec!["raft build".to_string()];
  if let Some(platform) = &request.platform {
    parts.push(format!("--platform {platform}"));
  }
  if let Some(architecture) = &request.architecture {
    parts.push(format!("--architecture {architecture}"));
  }
  if request.release {
    parts.push("--release".to_string());
  }
  if request.distribute {
    parts.push("--distribute".to_string());
  }
  parts.join(" ")
}

/// Every `<platform>/<arch>/<mode>/<name>` directory under `builds`.
fn dependency_build_dirs(builds: &Path, name: &str) -> Result<Vec<PathBuf>> {
  if !builds.is_dir() {
    return Ok(Vec::new());
  }

  let mut dirs = Vec::new();
  let walker = WalkDir::new(builds)
    .min_depth(DEPENDENCY_BUILD_DEPTH)
    .max_depth(DEPENDENCY_BUILD_DEPTH)
    .sort_by_file_name();
  for entry in walker {
    let entry = entry.map_err(|err| {
      let path = err.path().unwrap_or(builds).to_path_buf();
      RaftError::Filesystem {
        action: "scan",
        path,
        source: err.into(),
      }
    })?;
    if entry.file_type().is_dir() && entry.file_name() == name {
      dirs.push(entry.into_path());
    }
  }
  Ok(dirs)
}

/// Single-config generators put the binary in the build dir, multi-config
/// ones (Visual Studio, Xcode) in a per-mode subdirectory.
fn locate_executable(build_dir: &Path, name: &str, mode: Mode) -> Result<PathBuf> {
  let file_name = if cfg!(windows) && Path::new(name).extension().is_none() {
    format!("{name}.exe")
  } else {
    name.to_string()
  };

  let candidates = [build_dir.join(&file_name), build_dir.join(mode.as_str()).join(&file_name)];
  candidates
    .iter()
    .find(|candidate| candidate.is_file())
    .cloned()
    .ok_or_else(|| RaftError::not_found("locate executable", &candidates[0]))
}
