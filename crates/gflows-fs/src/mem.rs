use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::path::clean_path;
use crate::{FileSystem, FsError};

/// In-memory filesystem.
///
/// Paths are normalized with [`clean_path`] before use, so `./a/b` and `a/b`
/// address the same entry. Relative and absolute paths live side by side.
/// Writing a file implicitly creates its parent directories.
#[derive(Debug, Default)]
pub struct MemFs {
  state: RefCell<MemState>,
}

#[derive(Debug, Default)]
struct MemState {
  files: BTreeMap<PathBuf, Vec<u8>>,
  dirs: BTreeSet<PathBuf>,
  temp_counter: u64,
}

impl MemState {
  fn add_ancestors(&mut self, path: &Path) {
    let mut current = parent_of(path);
    while !is_root(&current) {
      let next = parent_of(&current);
      self.dirs.insert(current);
      current = next;
    }
  }

  fn is_dir(&self, path: &Path) -> bool {
    is_root(path) || self.dirs.contains(path)
  }
}

impl MemFs {
  pub fn new() -> Self {
    Self::default()
  }

  /// Write a text file, creating parents. Convenience for seeding fixtures.
  pub fn write_str(&self, path: impl AsRef<Path>, contents: &str) {
    let path = clean_path(path.as_ref());
    let mut state = self.state.borrow_mut();
    state.add_ancestors(&path);
    state.files.insert(path, contents.as_bytes().to_vec());
  }
}

impl FileSystem for MemFs {
  fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
    let path = clean_path(path);
    self
      .state
      .borrow()
      .files
      .get(&path)
      .cloned()
      .ok_or(FsError::NotFound(path))
  }

  fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
    let path = clean_path(path);
    let mut state = self.state.borrow_mut();
    if state.dirs.contains(&path) {
      return Err(FsError::Io {
        path,
        source: std::io::Error::other("is a directory"),
      });
    }
    state.add_ancestors(&path);
    state.files.insert(path, contents.to_vec());
    Ok(())
  }

  fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
    let path = clean_path(path);
    let mut state = self.state.borrow_mut();
    if state.files.contains_key(&path) {
      return Err(FsError::NotADirectory(path));
    }
    if !is_root(&path) {
      state.add_ancestors(&path);
      state.dirs.insert(path);
    }
    Ok(())
  }

  fn exists(&self, path: &Path) -> bool {
    let path = clean_path(path);
    let state = self.state.borrow();
    state.files.contains_key(&path) || state.is_dir(&path)
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.state.borrow().is_dir(&clean_path(path))
  }

  fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FsError> {
    let path = clean_path(path);
    let state = self.state.borrow();
    if !state.is_dir(&path) {
      return Err(if state.files.contains_key(&path) {
        FsError::NotADirectory(path)
      } else {
        FsError::NotFound(path)
      });
    }

    let mut entries: Vec<PathBuf> = state
      .files
      .keys()
      .chain(state.dirs.iter())
      .filter(|entry| parent_of(entry) == path && **entry != path)
      .cloned()
      .collect();
    entries.sort();
    Ok(entries)
  }

  fn remove_dir_all(&self, path: &Path) -> Result<(), FsError> {
    let path = clean_path(path);
    let mut state = self.state.borrow_mut();
    if !state.dirs.contains(&path) {
      return Err(if state.files.contains_key(&path) {
        FsError::NotADirectory(path)
      } else {
        FsError::NotFound(path)
      });
    }
    state.files.retain(|file, _| !file.starts_with(&path));
    state.dirs.retain(|dir| !dir.starts_with(&path));
    Ok(())
  }

  fn create_temp_dir(&self, prefix: &str) -> Result<PathBuf, FsError> {
    let mut state = self.state.borrow_mut();
    state.temp_counter += 1;
    let dir = PathBuf::from(format!("/tmp/{}{}", prefix, state.temp_counter));
    state.add_ancestors(&dir);
    state.dirs.insert(dir.clone());
    Ok(dir)
  }
}

fn parent_of(path: &Path) -> PathBuf {
  match path.parent() {
    Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
    Some(parent) => parent.to_path_buf(),
    None => path.to_path_buf(),
  }
}

fn is_root(path: &Path) -> bool {
  path == Path::new(".") || path == Path::new("/")
}
