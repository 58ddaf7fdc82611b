use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::{FileSystem, FsError};

/// Filesystem backed by the real disk.
///
/// Scratch directories are created under the platform temp dir.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl OsFs {
  pub fn new() -> Self {
    Self
  }
}

impl FileSystem for OsFs {
  fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
    fs::read(path).map_err(|e| FsError::from_io(path, e))
  }

  fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
    fs::write(path, contents).map_err(|e| FsError::from_io(path, e))
  }

  fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
    if path.as_os_str().is_empty() {
      return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| FsError::from_io(path, e))
  }

  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }

  fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FsError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| FsError::from_io(path, e))? {
      let entry = entry.map_err(|e| FsError::from_io(path, e))?;
      entries.push(path.join(entry.file_name()));
    }
    entries.sort();
    Ok(entries)
  }

  fn remove_dir_all(&self, path: &Path) -> Result<(), FsError> {
    fs::remove_dir_all(path).map_err(|e| FsError::from_io(path, e))
  }

  fn create_temp_dir(&self, prefix: &str) -> Result<PathBuf, FsError> {
    let dir = std::env::temp_dir().join(format!("{}{}", prefix, Uuid::new_v4().simple()));
    fs::create_dir_all(&dir).map_err(|e| FsError::from_io(&dir, e))?;
    debug!(dir = %dir.display(), "created temp dir");
    Ok(dir)
  }
}
