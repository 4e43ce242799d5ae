//! Cache variables passed to cmake.
//!
//! The names below are read by `raft.cmake`; they must not change.

use serde::{Deserialize, Serialize};

pub const RAFT: &str = "RAFT";
pub const RAFT_INCLUDE_DIR: &str = "RAFT_INCLUDE_DIR";
pub const RAFT_LIB_DIR: &str = "RAFT_LIB_DIR";
pub const RAFT_FRAMEWORK_DIR: &str = "RAFT_FRAMEWORK_DIR";
pub const RAFT_IS_DESKTOP: &str = "RAFT_IS_DESKTOP";
pub const RAFT_IS_MACOS: &str = "RAFT_IS_MACOS";
pub const RAFT_IS_ANDROID: &str = "RAFT_IS_ANDROID";
pub const RAFT_IS_IOS: &str = "RAFT_IS_IOS";
pub const RAFT_ARCH: &str = "RAFT_ARCH";
pub const RAFT_DISTRIBUTABLE: &str = "RAFT_DISTRIBUTABLE";

pub const CMAKE_INSTALL_PREFIX: &str = "CMAKE_INSTALL_PREFIX";
pub const CMAKE_INSTALL_FRAMEWORK_PREFIX: &str = "CMAKE_INSTALL_FRAMEWORK_PREFIX";
pub const CMAKE_BUILD_TYPE: &str = "CMAKE_BUILD_TYPE";
pub const CMAKE_TOOLCHAIN_FILE: &str = "CMAKE_TOOLCHAIN_FILE";
pub const CMAKE_MODULE_PATH: &str = "CMAKE_MODULE_PATH";

pub const ANDROID_ABI: &str = "ANDROID_ABI";
pub const ANDROID_STL: &str = "ANDROID_STL";
pub const ANDROID_NATIVE_API_LEVEL: &str = "ANDROID_NATIVE_API_LEVEL";

pub const TRUE: &str = "true";
pub const FALSE: &str = "false";

pub fn bool_value(value: bool) -> &'static str {
  if value { TRUE } else { FALSE }
}

/// A single `name=value` pair, as written in a raftfile's `configOptions`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flag {
  pub name: String,
  pub value: String,
}

impl Flag {
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
    }
  }
}
