use std::path::{Path, PathBuf};
use std::rc::Rc;

use gflows_content::{ContentReader, parse_remote};
use gflows_fs::{FileSystem, clean_path};
use tracing::{debug, warn};

use crate::error::PackageError;
use crate::manifest::{Manifest, is_manifest_reference};
use crate::package::{Package, PathInfo};

/// A template library described by a `.gflowslib` manifest.
///
/// After [`GFlowsLib::setup`] every file listed in the manifest is staged
/// under a private directory, laid out the same way as in the manifest:
/// ```text
/// {local_dir}/
/// ├── libs/
/// │   └── lib.yml
/// └── workflows/
///     └── test.yml
/// ```
///
/// Nested manifests in the file list are set up as child libraries with their
/// own staging directories. The staging directory, and those of all
/// children, are removed by [`GFlowsLib::clean_up`] or when the library is
/// dropped.
pub struct GFlowsLib {
  fs: Rc<dyn FileSystem>,
  reader: ContentReader,
  reference: String,
  local_dir: Option<PathBuf>,
  files: Vec<String>,
  children: Vec<GFlowsLib>,
}

impl GFlowsLib {
  /// Create a library for a manifest at a local path or an http(s) URL.
  pub fn new(fs: Rc<dyn FileSystem>, reader: ContentReader, reference: impl Into<String>) -> Self {
    Self {
      fs,
      reader,
      reference: reference.into(),
      local_dir: None,
      files: Vec::new(),
      children: Vec::new(),
    }
  }

  /// The manifest path or URL this library was created from.
  pub fn reference(&self) -> &str {
    &self.reference
  }

  /// The staging directory, once set up.
  pub fn local_dir(&self) -> Option<&Path> {
    self.local_dir.as_deref()
  }

  /// Files listed in the manifest, relative to the library root.
  pub fn files(&self) -> &[String] {
    &self.files
  }

  /// Libraries included through nested manifests.
  pub fn children(&self) -> &[GFlowsLib] {
    &self.children
  }

  pub fn is_remote(&self) -> bool {
    parse_remote(&self.reference).is_some()
  }

  /// Last segment of the manifest locator, e.g. `my-lib.gflowslib`.
  pub fn manifest_name(&self) -> &str {
    self
      .reference
      .trim_end_matches('/')
      .rsplit('/')
      .next()
      .unwrap_or(&self.reference)
  }

  /// Fetch the manifest and stage every file it lists.
  ///
  /// All listed paths are checked before anything is fetched. On any failure
  /// the partially populated staging directory is removed. Calling `setup` on
  /// a library that is already set up does nothing.
  pub fn setup(&mut self) -> Result<(), PackageError> {
    self.setup_within(&mut Vec::new())
  }

  fn setup_within(&mut self, ancestors: &mut Vec<String>) -> Result<(), PackageError> {
    if self.local_dir.is_some() {
      return Ok(());
    }
    if ancestors.contains(&self.reference) {
      return Err(PackageError::ManifestCycle(self.reference.clone()));
    }

    debug!(reference = %self.reference, "setting up library");
    let content = self.fetch(&self.reference)?;
    let manifest = Manifest::parse(&self.reference, &content)?;
    manifest.validate()?;

    let local_dir = self
      .fs
      .create_temp_dir(&format!("{}-", self.manifest_name()))?;
    self.local_dir = Some(local_dir.clone());

    ancestors.push(self.reference.clone());
    let staged = self.stage_files(&local_dir, &manifest, ancestors);
    ancestors.pop();

    if let Err(e) = staged {
      if let Err(cleanup_err) = self.clean_up() {
        warn!(reference = %self.reference, error = %cleanup_err, "failed to remove staging directory");
      }
      return Err(e);
    }

    self.files = manifest.files;
    debug!(
      reference = %self.reference,
      local_dir = %local_dir.display(),
      files = self.files.len(),
      "library staged"
    );
    Ok(())
  }

  fn stage_files(
    &mut self,
    local_dir: &Path,
    manifest: &Manifest,
    ancestors: &mut Vec<String>,
  ) -> Result<(), PackageError> {
    for file in &manifest.files {
      let locator = self.resolve_locator(file)?;
      let content = self.fetch(&locator)?;

      let staged_path = local_dir.join(file);
      if let Some(parent) = staged_path.parent() {
        self.fs.create_dir_all(parent)?;
      }
      self.fs.write(&staged_path, content.as_bytes())?;

      if is_manifest_reference(file) {
        let mut child = GFlowsLib::new(self.fs.clone(), self.reader.clone(), locator);
        child.setup_within(ancestors)?;
        self.children.push(child);
      }
    }
    Ok(())
  }

  fn fetch(&self, locator: &str) -> Result<String, PackageError> {
    self
      .reader
      .read(locator)
      .map_err(|source| PackageError::Fetch {
        reference: locator.to_string(),
        source,
      })
  }

  /// Resolve a manifest-relative path against the manifest's own location.
  fn resolve_locator(&self, relative: &str) -> Result<String, PackageError> {
    match parse_remote(&self.reference) {
      Some(base) => base
        .join(relative)
        .map(|url| url.to_string())
        .map_err(|e| PackageError::InvalidArgument(format!("Invalid path {}: {}", relative, e))),
      None => {
        let base = Path::new(&self.reference)
          .parent()
          .unwrap_or_else(|| Path::new(""));
        Ok(clean_path(&base.join(relative)).display().to_string())
      }
    }
  }

  fn require_local_dir(&self) -> Result<&Path, PackageError> {
    self
      .local_dir
      .as_deref()
      .ok_or_else(|| PackageError::NotSetUp(self.reference.clone()))
  }

  /// The staged `libs/` directory.
  pub fn libs_dir(&self) -> Result<PathBuf, PackageError> {
    Ok(self.require_local_dir()?.join("libs"))
  }

  /// The staged `libs/` directories of this library and then of every nested library.
  pub fn all_libs_dirs(&self) -> Result<Vec<PathBuf>, PackageError> {
    let mut dirs = vec![self.libs_dir()?];
    for child in &self.children {
      dirs.extend(child.all_libs_dirs()?);
    }
    Ok(dirs)
  }

  /// Map a staged file back to its original location.
  ///
  /// `local_path` must be absolute and lie strictly below the staging
  /// directory. Nested libraries are consulted for paths in their own
  /// staging directories.
  pub fn get_path_info(&self, local_path: &Path) -> Result<PathInfo, PackageError> {
    if !local_path.is_absolute() {
      return Err(PackageError::InvalidArgument(format!(
        "Expected {} to be absolute",
        local_path.display()
      )));
    }

    let local_dir = self.require_local_dir()?;
    let local_path = clean_path(local_path);
    let relative = match local_path.strip_prefix(local_dir) {
      Ok(relative) if !relative.as_os_str().is_empty() => relative,
      _ => {
        if let Some(child) = self.children.iter().find(|child| child.contains(&local_path)) {
          return child.get_path_info(&local_path);
        }
        return Err(PackageError::InvalidArgument(format!(
          "Expected {} to be a subdirectory of {}",
          local_path.display(),
          local_dir.display()
        )));
      }
    };

    let relative = relative
      .components()
      .map(|c| c.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");

    Ok(PathInfo {
      local_path: local_path.clone(),
      source_path: self.resolve_locator(&relative)?,
      description: format!("{}/{}", self.manifest_name(), relative),
    })
  }

  fn contains(&self, path: &Path) -> bool {
    self
      .local_dir
      .as_deref()
      .is_some_and(|dir| path.starts_with(dir) && path != dir)
      || self.children.iter().any(|child| child.contains(path))
  }

  /// Remove the staging directories of this library and all nested libraries.
  ///
  /// Safe to call more than once, and on a library that never set up.
  pub fn clean_up(&mut self) -> Result<(), PackageError> {
    let mut result = Ok(());
    for mut child in self.children.drain(..) {
      if let Err(e) = child.clean_up() {
        result = result.and(Err(e));
      }
    }

    if let Some(dir) = self.local_dir.take() {
      debug!(reference = %self.reference, local_dir = %dir.display(), "removing staging directory");
      match self.fs.remove_dir_all(&dir) {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {}
        Err(e) => result = result.and(Err(e.into())),
      }
    }
    self.files.clear();
    result
  }
}

impl Package for GFlowsLib {
  fn workflows_dir(&self) -> Option<PathBuf> {
    self.local_dir.as_ref().map(|dir| dir.join("workflows"))
  }

  fn path_info(&self, local_path: &Path) -> Result<PathInfo, PackageError> {
    self.get_path_info(local_path)
  }
}

impl Drop for GFlowsLib {
  fn drop(&mut self) {
    if let Err(e) = self.clean_up() {
      warn!(reference = %self.reference, error = %e, "failed to clean up library");
    }
  }
}
