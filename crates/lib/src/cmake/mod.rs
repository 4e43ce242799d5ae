//! Everything raft hands to cmake: the cache variables, the three build
//! phases and the `raft.cmake` helper projects include.

mod driver;
mod helper;
mod options;

pub use driver::BuildDriver;
pub use helper::{HELPER_CONTENTS, ensure_helper_file};
pub use options::BuildOptionSet;
