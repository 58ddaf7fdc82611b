use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gflows_fs::FileSystem;

use crate::error::ContentError;

/// One asset to copy: where it lives in the bundle and where it goes.
///
/// The destination may contain `$NAME` or `${NAME}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSource {
  pub source: String,
  pub destination: String,
}

impl WorkflowSource {
  pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      destination: destination.into(),
    }
  }
}

/// A named, ordered set of assets plus the variables substituted into them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowGenerator {
  pub name: String,
  pub sources: Vec<WorkflowSource>,
  pub template_vars: BTreeMap<String, String>,
}

/// A bundle of assets addressed by `/`-rooted paths.
pub trait AssetSource {
  fn read_asset(&self, path: &str) -> Result<Vec<u8>, ContentError>;
}

/// Assets compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct StaticAssets {
  assets: &'static [(&'static str, &'static str)],
}

impl StaticAssets {
  pub const fn new(assets: &'static [(&'static str, &'static str)]) -> Self {
    Self { assets }
  }
}

impl AssetSource for StaticAssets {
  fn read_asset(&self, path: &str) -> Result<Vec<u8>, ContentError> {
    self
      .assets
      .iter()
      .find(|(name, _)| *name == path)
      .map(|(_, body)| body.as_bytes().to_vec())
      .ok_or_else(|| ContentError::AssetNotFound(path.to_string()))
  }
}

/// Assets read from a directory of a [`FileSystem`].
pub struct FsAssets<'a> {
  fs: &'a dyn FileSystem,
  root: PathBuf,
}

impl<'a> FsAssets<'a> {
  pub fn new(fs: &'a dyn FileSystem, root: impl AsRef<Path>) -> Self {
    Self {
      fs,
      root: root.as_ref().to_path_buf(),
    }
  }
}

impl AssetSource for FsAssets<'_> {
  fn read_asset(&self, path: &str) -> Result<Vec<u8>, ContentError> {
    let full_path = self.root.join(path.trim_start_matches('/'));
    self.fs.read(&full_path).map_err(|e| {
      if e.is_not_found() {
        ContentError::AssetNotFound(path.to_string())
      } else {
        e.into()
      }
    })
  }
}

/// Replace `$NAME` and `${NAME}` with values from `vars`.
///
/// Placeholders naming unknown variables are left untouched, so expressions
/// such as `${{ github.sha }}` survive expansion.
pub fn expand_vars(text: &str, vars: &BTreeMap<String, String>) -> String {
  let mut out = String::with_capacity(text.len());
  let mut rest = text;

  while let Some(pos) = rest.find('$') {
    out.push_str(&rest[..pos]);
    let after = &rest[pos + 1..];

    let (name, consumed) = match after.strip_prefix('{') {
      Some(braced) => match braced.find('}') {
        Some(end) => (&braced[..end], end + 2),
        None => ("", 0),
      },
      None => {
        let end = after
          .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
          .unwrap_or(after.len());
        (&after[..end], end)
      }
    };

    match vars.get(name) {
      Some(value) if !name.is_empty() => {
        out.push_str(value);
        rest = &after[consumed..];
      }
      _ => {
        out.push('$');
        rest = after;
      }
    }
  }

  out.push_str(rest);
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use gflows_fs::MemFs;

  fn vars() -> BTreeMap<String, String> {
    BTreeMap::from([
      ("WORKFLOW_NAME".to_string(), "gflows".to_string()),
      ("JOB_NAME".to_string(), "check-workflows".to_string()),
    ])
  }

  #[test]
  fn test_expand_vars() {
    assert_eq!(
      expand_vars("/workflows/$WORKFLOW_NAME/$WORKFLOW_NAME.yml", &vars()),
      "/workflows/gflows/gflows.yml"
    );
    assert_eq!(expand_vars("name: ${JOB_NAME}", &vars()), "name: check-workflows");
  }

  #[test]
  fn test_expand_vars_keeps_unknown_placeholders() {
    let text = "run: echo ${{ github.sha }} $HOME $ ${UNCLOSED";
    assert_eq!(expand_vars(text, &vars()), text);
  }

  #[test]
  fn test_static_assets() {
    let assets = StaticAssets::new(&[("/config.yml", "templates:\n  engine: ytt\n")]);

    assert_eq!(
      assets.read_asset("/config.yml").unwrap(),
      b"templates:\n  engine: ytt\n".to_vec()
    );
    assert!(matches!(
      assets.read_asset("/missing.yml"),
      Err(ContentError::AssetNotFound(_))
    ));
  }

  #[test]
  fn test_fs_assets() {
    let fs = MemFs::new();
    fs.write_str("/bundle/foo.txt", "foo");
    let assets = FsAssets::new(&fs, "/bundle");

    assert_eq!(assets.read_asset("/foo.txt").unwrap(), b"foo".to_vec());
    assert!(matches!(
      assets.read_asset("/bar.txt"),
      Err(ContentError::AssetNotFound(_))
    ));
  }
}
