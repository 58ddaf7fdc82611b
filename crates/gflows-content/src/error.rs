use gflows_fs::FsError;

/// Errors raised while reading or writing content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
  #[error(transparent)]
  Fs(#[from] FsError),

  /// The HTTP request could not be completed.
  #[error("request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-success status.
  #[error("request to {url} failed with status {status}")]
  HttpStatus { url: String, status: u16 },

  /// An embedded asset was not found in the bundle.
  #[error("asset not found: {0}")]
  AssetNotFound(String),
}
