use std::path::{Path, PathBuf};

use crate::error::PackageError;

/// Provenance of a file that templates were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
  /// Where the file lives on disk (inside a staging directory for libraries).
  pub local_path: PathBuf,
  /// The original location: a filesystem path or a URL.
  pub source_path: String,
  /// Short human readable form, e.g. `my-lib.gflowslib/workflows/test.yml`.
  pub description: String,
}

/// A source of workflow templates.
pub trait Package {
  /// Directory holding this package's workflow templates, if it has one yet.
  fn workflows_dir(&self) -> Option<PathBuf>;

  /// Map a local file of this package back to where it came from.
  fn path_info(&self, local_path: &Path) -> Result<PathInfo, PackageError>;
}

/// The templates checked into the repository itself.
#[derive(Debug, Clone)]
pub struct LocalPackage {
  workflows_dir: PathBuf,
}

impl LocalPackage {
  pub fn new(workflows_dir: impl Into<PathBuf>) -> Self {
    Self {
      workflows_dir: workflows_dir.into(),
    }
  }
}

impl Package for LocalPackage {
  fn workflows_dir(&self) -> Option<PathBuf> {
    Some(self.workflows_dir.clone())
  }

  fn path_info(&self, local_path: &Path) -> Result<PathInfo, PackageError> {
    let path = local_path.display().to_string();
    Ok(PathInfo {
      local_path: local_path.to_path_buf(),
      source_path: path.clone(),
      description: path,
    })
  }
}
