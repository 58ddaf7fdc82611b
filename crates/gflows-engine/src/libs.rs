use std::path::{Path, PathBuf};

use gflows_config::GFlowsContext;
use gflows_content::is_remote;
use gflows_fs::clean_path;
use gflows_package::{LibraryEnv, PackageError, is_manifest_reference};
use tracing::warn;

/// Locator of a manifest named in the config: URLs as written, local paths
/// resolved against the context dir.
pub(crate) fn manifest_reference(context: &GFlowsContext, lib: &str) -> String {
  if is_remote(lib) {
    lib.to_string()
  } else {
    context.resolve_path(lib).display().to_string()
  }
}

/// Set up every library manifest named anywhere in the config.
///
/// Failures are remembered by `env` and reported by the workflows that use
/// the library, so they are only logged here.
pub(crate) fn load_all(context: &GFlowsContext, env: &mut LibraryEnv) {
  for lib in context.config.all_template_libs() {
    if !is_manifest_reference(&lib) {
      continue;
    }
    if let Err(e) = env.load_lib(&manifest_reference(context, &lib)) {
      warn!(lib = %lib, error = %e, "library unavailable");
    }
  }
}

/// Library search path for a workflow: configured directories as resolved
/// paths, manifests as the staged `libs/` directories of the library and its
/// nested libraries. Defaults come before overrides.
pub(crate) fn lib_paths(
  context: &GFlowsContext,
  env: &mut LibraryEnv,
  workflow_name: &str,
) -> Result<Vec<PathBuf>, PackageError> {
  let mut paths = Vec::new();
  for lib in context.config.template_libs(workflow_name) {
    if is_manifest_reference(&lib) {
      let lib = env.load_lib(&manifest_reference(context, &lib))?;
      paths.extend(lib.all_libs_dirs()?);
    } else {
      paths.push(context.resolve_path(&lib));
    }
  }
  Ok(paths)
}

/// Whether `path` is, or lies inside, a library directory named in the config.
pub(crate) fn is_lib_path(context: &GFlowsContext, path: &Path) -> bool {
  let path = clean_path(path);
  context
    .config
    .all_template_libs()
    .iter()
    .filter(|lib| !is_manifest_reference(lib) && !is_remote(lib))
    .map(|lib| context.resolve_path(lib))
    .any(|lib| path.starts_with(&lib))
}
