use gflows_content::ContentError;
use gflows_engine::EngineError;
use gflows_fs::FsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
  /// At least one workflow could not be generated. Details are on the progress log.
  #[error("errors encountered generating workflows")]
  GenerationFailed,

  /// At least one workflow failed a check. Details are on the progress log.
  #[error("workflow validation failed")]
  ValidationFailed,

  #[error(transparent)]
  Engine(#[from] EngineError),

  #[error(transparent)]
  Content(#[from] ContentError),

  #[error(transparent)]
  Fs(#[from] FsError),
}
