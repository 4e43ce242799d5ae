//! End-to-end tests that drive the raft binary against stand-in `git` and
//! `cmake` scripts which log their arguments.

#![cfg(unix)]

mod build_tests;
mod clean_tests;
mod common;
