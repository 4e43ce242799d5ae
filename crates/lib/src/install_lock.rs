//! Exclusive lock on a shared install tree.
//!
//! Every dependency of a root project installs into the same directory, so
//! only one raft process may build into it at a time.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::LOCK_FILENAME;
use crate::error::{RaftError, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct LockMetadata {
  pub version: u32,
  pub pid: u32,
  pub started_at_unix: u64,
  pub command: String,
  pub install_dir: PathBuf,
}

/// Held for as long as the value lives; the OS releases the lock when the
/// file handle closes.
#[derive(Debug)]
pub struct InstallLock {
  file: File,
  lock_path: PathBuf,
}

impl InstallLock {
  /// Takes the lock on `<install_dir>/.lock` without blocking.
  pub fn acquire(install_dir: &Path, command: &str) -> Result<Self> {
    std::fs::create_dir_all(install_dir).map_err(RaftError::fs("create directory", install_dir))?;
    let lock_path = install_dir.join(LOCK_FILENAME);

    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&lock_path)
      .map_err(RaftError::fs("open lock file", &lock_path))?;

    if let Err(err) = try_lock(&file) {
      if err.kind() == io::ErrorKind::WouldBlock {
        return Err(RaftError::Locked {
          holder: describe_holder(&lock_path),
          lock_path,
        });
      }
      return Err(RaftError::Filesystem {
        action: "lock",
        path: lock_path,
        source: err,
      });
    }

    write_metadata(&file, command, install_dir).map_err(RaftError::fs("write lock metadata", &lock_path))?;
    debug!(path = %lock_path.display(), "acquired install lock");
    Ok(Self { file, lock_path })
  }

  pub fn lock_path(&self) -> &Path {
    &self.lock_path
  }

  /// Reads metadata through the held handle. Opening the file again would
  /// fail on Windows while the lock is held.
  pub fn read_metadata(&self) -> io::Result<LockMetadata> {
    let mut file = &self.file;
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    serde_json::from_str(&contents).map_err(io::Error::other)
  }
}

fn write_metadata(file: &File, command: &str, install_dir: &Path) -> io::Result<()> {
  let metadata = LockMetadata {
    version: 1,
    pid: std::process::id(),
    started_at_unix: SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .unwrap_or_default()
      .as_secs(),
    command: command.to_string(),
    install_dir: install_dir.to_path_buf(),
  };

  file.set_len(0)?;
  let mut writer = io::BufWriter::new(file);
  serde_json::to_writer_pretty(&mut writer, &metadata).map_err(io::Error::other)?;
  writer.flush()
}

fn describe_holder(lock_path: &Path) -> String {
  let metadata = std::fs::read_to_string(lock_path)
    .ok()
    .and_then(|contents| serde_json::from_str::<LockMetadata>(&contents).ok());
  match metadata {
    Some(metadata) => format!(
      "{} (PID {}, started Unix timestamp {})",
      metadata.command, metadata.pid, metadata.started_at_unix
    ),
    None => "unknown process".to_string(),
  }
}

#[cfg(unix)]
fn try_lock(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive).map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx};

  let handle = file.as_raw_handle() as HANDLE;

  // SAFETY: OVERLAPPED is plain data and valid when zeroed; the handle is
  // owned by `file` and open for the duration of the call.
  let result = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(
      handle,
      LOCKFILE_FAIL_IMMEDIATELY | LOCKFILE_EXCLUSIVE_LOCK,
      0,
      1,
      0,
      &mut overlapped,
    )
  };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}
