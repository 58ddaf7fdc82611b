use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::PackageError;

/// File suffix identifying a library manifest reference.
pub const MANIFEST_SUFFIX: &str = ".gflowslib";

/// Top-level directories a library may ship files in.
const ALLOWED_DIRS: [&str; 2] = ["libs", "workflows"];

/// A library manifest: `{"files": ["libs/lib.yml", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
  #[serde(default)]
  pub files: Vec<String>,
}

impl Manifest {
  pub fn parse(reference: &str, content: &str) -> Result<Self, PackageError> {
    serde_json::from_str(content).map_err(|source| PackageError::InvalidManifest {
      reference: reference.to_string(),
      source,
    })
  }

  /// Check that every listed file sits below `libs/` or `workflows/`.
  pub fn validate(&self) -> Result<(), PackageError> {
    for file in &self.files {
      validate_file(file)?;
    }
    Ok(())
  }
}

/// Whether a library path in the config refers to a manifest rather than a directory.
pub fn is_manifest_reference(reference: &str) -> bool {
  reference.ends_with(MANIFEST_SUFFIX)
}

fn validate_file(file: &str) -> Result<(), PackageError> {
  let mut components = Path::new(file).components();
  let top_level_ok = matches!(
    components.next(),
    Some(Component::Normal(dir)) if ALLOWED_DIRS.iter().any(|allowed| dir == *allowed)
  );
  let rest: Vec<Component> = components.collect();
  let rest_ok =
    !rest.is_empty() && rest.iter().all(|component| matches!(component, Component::Normal(_)));

  if top_level_ok && rest_ok {
    Ok(())
  } else {
    Err(PackageError::UnexpectedDirectory(file.to_string()))
  }
}
