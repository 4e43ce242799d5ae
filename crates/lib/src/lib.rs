//! raft-lib: dependency resolution and build orchestration for raft
//!
//! A raft project declares its native dependencies in `Raft/raftfile.json`.
//! This crate provides:
//! - `Project`: a loaded raftfile plus the directory layout derived from it
//! - `platform`: the registry of build targets and their cmake flags
//! - `dependency`: download and build/install of dependency graphs, including
//!   nested raft projects that resolve against the root's install tree
//! - `Orchestrator`: the build, clean and run operations

pub mod cmake;
pub mod config;
pub mod consts;
pub mod dependency;
pub mod error;
pub mod events;
pub mod install_lock;
pub mod manifest;
pub mod orchestrator;
pub mod platform;
pub mod process;
pub mod project;
pub mod settings;
pub mod util;
pub mod vcs;

pub use orchestrator::Orchestrator;
pub use project::Project;
