use std::path::{Path, PathBuf};

use gflows_fs::{FileSystem, clean_path};
use tracing::debug;

use crate::config::GFlowsConfig;
use crate::engine::EngineKind;
use crate::error::ConfigError;

/// Config location used when neither `--config` nor `GFLOWS_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = ".gflows/config.yml";

/// The resolved configuration for one command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GFlowsContext {
  /// Directory containing the config file.
  pub dir: PathBuf,
  pub config_path: PathBuf,
  /// Directory receiving generated files (`<github_dir>/workflows/*.yml`).
  pub github_dir: PathBuf,
  /// Directory holding the local template sources.
  pub workflows_dir: PathBuf,
  pub config: GFlowsConfig,
}

impl GFlowsContext {
  /// Load the config file at `config_path` and resolve the context paths.
  pub fn load(fs: &dyn FileSystem, config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let config_path = config_path.as_ref();
    let content = fs.read_to_string(config_path).map_err(|source| {
      if source.is_not_found() {
        ConfigError::NotFound(config_path.to_path_buf())
      } else {
        ConfigError::Read {
          path: config_path.to_path_buf(),
          source,
        }
      }
    })?;

    let config = if content.trim().is_empty() {
      GFlowsConfig::default()
    } else {
      serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
      })?
    };

    let context = Self::from_config(config_path, config);
    debug!(
      config = %context.config_path.display(),
      github_dir = %context.github_dir.display(),
      engine = %context.engine(),
      "loaded context"
    );
    Ok(context)
  }

  /// Build a context from an in-memory config, e.g. before `init` has written one.
  pub fn from_config(config_path: impl AsRef<Path>, config: GFlowsConfig) -> Self {
    let config_path = config_path.as_ref().to_path_buf();
    let dir = clean_path(config_path.parent().unwrap_or(Path::new(".")));

    let github_dir = Path::new(config.github_dir.as_deref().unwrap_or(".github/")).to_path_buf();
    let github_dir = if github_dir.is_absolute() {
      clean_path(&github_dir)
    } else {
      let parent = dir.parent().unwrap_or(Path::new("."));
      clean_path(&parent.join(github_dir))
    };

    let workflows_dir = dir.join("workflows");

    Self {
      dir,
      config_path,
      github_dir,
      workflows_dir,
      config,
    }
  }

  pub fn engine(&self) -> EngineKind {
    self.config.templates.engine
  }

  /// Directory holding the generated GitHub workflow files.
  pub fn github_workflows_dir(&self) -> PathBuf {
    self.github_dir.join("workflows")
  }

  /// Destination of the generated workflow called `workflow_name`.
  pub fn destination_for(&self, workflow_name: &str) -> PathBuf {
    self
      .github_workflows_dir()
      .join(format!("{}.yml", workflow_name))
  }

  /// Resolve a config-relative path against the context dir. Absolute paths are kept.
  pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
      clean_path(path)
    } else {
      clean_path(&self.dir.join(path))
    }
  }

  pub fn resolve_paths<S: AsRef<Path>>(&self, paths: &[S]) -> Vec<PathBuf> {
    paths.iter().map(|path| self.resolve_path(path)).collect()
  }
}
