use std::path::{Component, Path, PathBuf};

use crate::{FileSystem, FsError};

/// Lexically normalize a path: drops `.` segments and folds `..` into its parent.
///
/// Symlinks are not consulted. An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
  let mut out: Vec<Component> = Vec::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.last() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        // `/..` is `/`
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => out.push(component),
      },
      _ => out.push(component),
    }
  }

  if out.is_empty() {
    PathBuf::from(".")
  } else {
    out.iter().collect()
  }
}

/// Recursively list every file below `dir`, depth first in lexical order.
///
/// A missing root yields an empty list, matching a walk that visits nothing.
pub fn walk(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<PathBuf>, FsError> {
  let mut files = Vec::new();
  if !fs.is_dir(dir) {
    return Ok(files);
  }
  walk_into(fs, dir, &mut files)?;
  Ok(files)
}

fn walk_into(fs: &dyn FileSystem, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), FsError> {
  for entry in fs.read_dir(dir)? {
    if fs.is_dir(&entry) {
      walk_into(fs, &entry, files)?;
    } else {
      files.push(entry);
    }
  }
  Ok(())
}
