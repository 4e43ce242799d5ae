//! Raftfile types.
//!
//! The raftfile (`Raft/raftfile.json`) declares a project's dependencies and the
//! platform/architecture pairs it can be built for.

mod types;

pub use types::*;
