/// Name used for per-user directories and lock metadata.
pub const APP_NAME: &str = "raft";

/// File name of the user settings file in the home directory.
pub const SETTINGS_FILENAME: &str = ".raftconfig";

/// Helper included by every raft project's root CMakeLists.txt via `include(${RAFT})`.
pub const HELPER_FILENAME: &str = "raft.cmake";

/// Lock file placed at the root of a shared install directory.
pub const LOCK_FILENAME: &str = ".lock";
