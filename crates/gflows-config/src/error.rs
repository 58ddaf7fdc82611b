use std::path::PathBuf;

use gflows_fs::FsError;

/// Errors raised while loading a gflows config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file does not exist.
  #[error("config file not found: {} (run \"gflows init\" to create one)", .0.display())]
  NotFound(PathBuf),

  /// The config file exists but could not be read.
  #[error("failed to read config file {}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: FsError,
  },

  /// The config file is not valid YAML or does not match the config model.
  #[error("invalid config file {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },
}
