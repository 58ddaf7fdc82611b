use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gflows_config::EngineKind;
use gflows_content::{WorkflowGenerator, WorkflowSource};
use gflows_fs::walk;
use gflows_package::{Package, PathInfo};
use gflows_workflow::{GitHubWorkflow, normalize_workflow};

use crate::engine::{EngineCore, TemplateEngine};
use crate::error::EngineError;
use crate::evaluator::{EvaluationError, EvaluationRequest, Evaluator, SourceFile, YttCommand};
use crate::libs;

const SOURCE_EXTENSIONS: [&str; 3] = ["yml", "yaml", "txt"];

/// Template engine for ytt: every directory directly below a package's
/// workflows directory that holds at least one source file is a template
/// named after the directory.
pub struct YttTemplateEngine {
  core: EngineCore,
  evaluator: Box<dyn Evaluator>,
}

impl YttTemplateEngine {
  /// Create an engine evaluating with the `ytt` executable.
  pub fn new(core: EngineCore) -> Self {
    Self::with_evaluator(core, Box::new(YttCommand::new()))
  }

  pub fn with_evaluator(core: EngineCore, evaluator: Box<dyn Evaluator>) -> Self {
    Self { core, evaluator }
  }

  /// Source files below `dir`.
  ///
  /// Files directly in the local workflows directory are ignored: a template
  /// needs its own directory to be named.
  fn sources_in_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let workflows_dir = &self.core.context().workflows_dir;
    let files = walk(self.core.fs(), dir)?;
    Ok(
      files
        .into_iter()
        .filter(|path| path.parent() != Some(workflows_dir.as_path()))
        .filter(|path| {
          path
            .extension()
            .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|known| ext == *known))
        })
        .collect(),
    )
  }
}

impl TemplateEngine for YttTemplateEngine {
  fn kind(&self) -> EngineKind {
    EngineKind::Ytt
  }

  fn core(&self) -> &EngineCore {
    &self.core
  }

  fn workflow_sources(&self) -> Result<Vec<PathBuf>, EngineError> {
    self.sources_in_dir(&self.core.context().workflows_dir)
  }

  fn templates_in(&self, package: &dyn Package) -> Result<Vec<PathInfo>, EngineError> {
    let Some(workflows_dir) = package.workflows_dir() else {
      return Ok(Vec::new());
    };
    let fs = self.core.fs();
    if !fs.is_dir(&workflows_dir) {
      return Ok(Vec::new());
    }

    let mut templates = Vec::new();
    for path in fs.read_dir(&workflows_dir)? {
      if !fs.is_dir(&path) || libs::is_lib_path(self.core.context(), &path) {
        continue;
      }
      if !self.sources_in_dir(&path)?.is_empty() {
        templates.push(package.path_info(&path)?);
      }
    }
    Ok(templates)
  }

  fn workflow_name(&self, template: &Path) -> String {
    template
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  fn evaluate(&self, template: &Path, lib_paths: Vec<PathBuf>) -> Result<String, EvaluationError> {
    let sources = self
      .sources_in_dir(template)
      .map_err(|e| EvaluationError::new(e.to_string()))?;
    let mut files = Vec::with_capacity(sources.len());
    for path in sources {
      let content = self
        .core
        .fs()
        .read_to_string(&path)
        .map_err(|e| EvaluationError::new(e.to_string()))?;
      files.push(SourceFile { path, content });
    }

    let request = EvaluationRequest {
      template: template.to_path_buf(),
      files,
      lib_paths,
    };
    self.evaluator.evaluate(&request)
  }

  fn import_workflow(&self, workflow: &GitHubWorkflow) -> Result<PathBuf, EngineError> {
    let content = self.core.fs().read_to_string(&workflow.path)?;
    let template = normalize_workflow(&content).map_err(|source| EngineError::ParseWorkflow {
      path: workflow.path.clone(),
      source,
    })?;

    let template_name = workflow
      .path
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_default();
    let template_path = self
      .core
      .context()
      .workflows_dir
      .join(&template_name)
      .join(format!("{}.yml", template_name));
    self.core.writer().safely_write_file(&template_path, &template)?;
    Ok(template_path)
  }

  fn workflow_generator(&self, template_vars: BTreeMap<String, String>) -> WorkflowGenerator {
    WorkflowGenerator {
      name: "gflows".to_string(),
      sources: vec![
        WorkflowSource::new(
          "/ytt/workflows/common/steps.lib.yml",
          "/workflows/common/steps.lib.yml",
        ),
        WorkflowSource::new(
          "/ytt/workflows/common/workflows.lib.yml",
          "/workflows/common/workflows.lib.yml",
        ),
        WorkflowSource::new(
          "/ytt/workflows/common/values.yml",
          "/workflows/common/values.yml",
        ),
        WorkflowSource::new(
          "/ytt/workflows/gflows/gflows.yml",
          "/workflows/$WORKFLOW_NAME/$WORKFLOW_NAME.yml",
        ),
        WorkflowSource::new("/ytt/config.yml", "/config.yml"),
      ],
      template_vars,
    }
  }
}
