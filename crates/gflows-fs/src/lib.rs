//! GFlows FS
//!
//! This crate provides the filesystem boundary used by the rest of gflows.
//! Template sources, generated workflows and staged libraries are all read and
//! written through the [`FileSystem`] trait so the same code runs against the
//! real disk ([`OsFs`]) and against an in-memory tree ([`MemFs`]).
//!
//! The capability set is intentionally small: read, write, existence checks,
//! directory listing, recursive removal and scratch directory creation.

mod mem;
mod os;
mod path;

pub use mem::MemFs;
pub use os::OsFs;
pub use path::{clean_path, walk};

use std::path::{Path, PathBuf};

/// Error type for filesystem operations.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
  /// The path does not exist.
  #[error("no such file or directory: {}", .0.display())]
  NotFound(PathBuf),

  /// A directory operation was attempted on a file.
  #[error("not a directory: {}", .0.display())]
  NotADirectory(PathBuf),

  /// An I/O error occurred.
  #[error("io error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl FsError {
  /// Whether this error means the path was absent.
  pub fn is_not_found(&self) -> bool {
    matches!(self, FsError::NotFound(_))
  }

  pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
    if source.kind() == std::io::ErrorKind::NotFound {
      FsError::NotFound(path.to_path_buf())
    } else {
      FsError::Io {
        path: path.to_path_buf(),
        source,
      }
    }
  }
}

/// Filesystem trait.
///
/// Implementations must treat an absent file as distinct from an empty one:
/// [`FileSystem::read`] returns [`FsError::NotFound`] for missing paths.
pub trait FileSystem {
  /// Read the full contents of a file.
  fn read(&self, path: &Path) -> Result<Vec<u8>, FsError>;

  /// Replace the full contents of a file. The parent directory must exist.
  fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError>;

  /// Create a directory and all of its missing parents.
  fn create_dir_all(&self, path: &Path) -> Result<(), FsError>;

  /// Whether a file or directory exists at the path.
  fn exists(&self, path: &Path) -> bool;

  /// Whether a directory exists at the path.
  fn is_dir(&self, path: &Path) -> bool;

  /// List the immediate children of a directory, sorted by name.
  fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FsError>;

  /// Remove a directory and everything below it.
  fn remove_dir_all(&self, path: &Path) -> Result<(), FsError>;

  /// Create a fresh, uniquely named scratch directory whose name starts with `prefix`.
  fn create_temp_dir(&self, prefix: &str) -> Result<PathBuf, FsError>;

  /// Read a file as UTF-8 text.
  fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
    let bytes = self.read(path)?;
    String::from_utf8(bytes).map_err(|e| FsError::Io {
      path: path.to_path_buf(),
      source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
  }
}
