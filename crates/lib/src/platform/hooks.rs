//! Pre-build hooks run against the root project.

use tracing::info;

use crate::config::BuildConfiguration;
use crate::error::{RaftError, Result};
use crate::project::Project;
use crate::settings::Settings;

const STL_DIR_NAME: &str = "llvm-libc++";
const STL_LIB_NAME: &str = "libc++_shared.so";

/// Copies the NDK's shared C++ runtime next to the installed dependencies so
/// the root project can package it.
pub(super) async fn install_android_stl(project: &Project, config: &BuildConfiguration, settings: &Settings) -> Result<()> {
  let ndk = settings.android_ndk.as_deref().ok_or_else(|| {
    RaftError::Configuration("building for Android requires ANDROID_NDK or `androidNdk` in ~/.raftconfig".to_string())
  })?;

  let stl = ndk
    .join("sources")
    .join("cxx-stl")
    .join(STL_DIR_NAME)
    .join("libs")
    .join(config.architecture.name)
    .join(STL_LIB_NAME);
  if !stl.is_file() {
    return Err(RaftError::not_found("locate the Android STL", stl));
  }

  let lib_dir = project.dir_for_dependency_lib(config);
  tokio::fs::create_dir_all(&lib_dir)
    .await
    .map_err(RaftError::fs("create directory", &lib_dir))?;

  let dest = lib_dir.join(STL_LIB_NAME);
  tokio::fs::copy(&stl, &dest).await.map_err(RaftError::fs("copy", &stl))?;

  info!(from = %stl.display(), to = %dest.display(), "installed android stl");
  Ok(())
}
