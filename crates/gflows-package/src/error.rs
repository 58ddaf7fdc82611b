use gflows_content::ContentError;
use gflows_fs::FsError;

/// Errors that can occur while resolving or staging a library.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
  /// A caller passed a path the library cannot map.
  #[error("{0}")]
  InvalidArgument(String),

  /// A manifest lists a file outside `libs/` and `workflows/`.
  #[error("Unexpected directory {0}, file must be in libs/ or workflows/")]
  UnexpectedDirectory(String),

  /// The manifest or one of its files could not be fetched.
  #[error("failed to fetch {reference}: {source}")]
  Fetch {
    reference: String,
    #[source]
    source: ContentError,
  },

  /// The manifest is not valid JSON of the expected shape.
  #[error("invalid manifest {reference}: {source}")]
  InvalidManifest {
    reference: String,
    #[source]
    source: serde_json::Error,
  },

  /// A manifest includes itself, directly or through nested manifests.
  #[error("Manifest cycle detected at {0}")]
  ManifestCycle(String),

  /// The library was used before `setup` succeeded.
  #[error("library {0} has not been set up")]
  NotSetUp(String),

  /// A library failed to load earlier in this run.
  #[error("failed to load library {reference}: {reason}")]
  Unavailable { reference: String, reason: String },

  #[error(transparent)]
  Fs(#[from] FsError),
}
