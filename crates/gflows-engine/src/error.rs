use std::path::PathBuf;

use gflows_content::ContentError;
use gflows_fs::FsError;
use gflows_package::PackageError;

/// Errors that abort an engine operation as a whole.
///
/// Failures of a single template are not errors: they are recorded on the
/// template's [`Definition`](gflows_workflow::Definition) instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  #[error(transparent)]
  Fs(#[from] FsError),

  #[error(transparent)]
  Content(#[from] ContentError),

  #[error(transparent)]
  Package(#[from] PackageError),

  /// An existing workflow could not be read as YAML during import.
  #[error("failed to parse workflow {}: {source}", path.display())]
  ParseWorkflow {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  /// An imported workflow could not be rendered as a template.
  #[error("failed to render template for {}: {source}", path.display())]
  RenderTemplate {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}
