use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::HELPER_FILENAME;
use crate::error::{RaftError, Result};

/// The `raft.cmake` shipped with this build of raft.
pub const HELPER_CONTENTS: &str = include_str!("../../cmake/raft.cmake");

/// Writes `raft.cmake` into `helper_dir` unless a file is already there.
///
/// An existing file is left alone so users can customize it.
pub async fn ensure_helper_file(helper_dir: &Path) -> Result<PathBuf> {
  let path = helper_dir.join(HELPER_FILENAME);
  if path.is_file() {
    return Ok(path);
  }

  tokio::fs::create_dir_all(helper_dir)
    .await
    .map_err(RaftError::fs("create directory", helper_dir))?;
  tokio::fs::write(&path, HELPER_CONTENTS)
    .await
    .map_err(RaftError::fs("write", &path))?;
  debug!(path = %path.display(), "installed cmake helper");
  Ok(path)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[tokio::test]
  async fn writes_helper_once() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("cmake");

    let path = ensure_helper_file(&dir).await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), HELPER_CONTENTS);

    std::fs::write(&path, "# customized").unwrap();
    ensure_helper_file(&dir).await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# customized");
  }

  #[test]
  fn helper_reads_raft_variables() {
    assert!(HELPER_CONTENTS.contains("RAFT_INCLUDE_DIR"));
    assert!(HELPER_CONTENTS.contains("RAFT_LIB_DIR"));
  }
}
