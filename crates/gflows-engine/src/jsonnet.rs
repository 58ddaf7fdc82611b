use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gflows_config::EngineKind;
use gflows_content::{WorkflowGenerator, WorkflowSource};
use gflows_fs::walk;
use gflows_package::{Package, PathInfo};
use gflows_workflow::{GitHubWorkflow, yaml_to_json};

use crate::engine::{EngineCore, TemplateEngine, trim_error};
use crate::error::EngineError;
use crate::evaluator::{EvaluationError, EvaluationRequest, Evaluator, JsonnetCommand, SourceFile};
use crate::libs;

const TEMPLATE_EXTENSION: &str = "jsonnet";
const LIBRARY_EXTENSION: &str = "libsonnet";

const SERIALIZATION_HINT: &str = "You probably need to serialize the output to YAML. See https://github.com/jbrunton/gflows/wiki/Templates#serialization";

/// Template engine for jsonnet: every `.jsonnet` file below a package's
/// workflows directory is a template named after its file stem.
pub struct JsonnetTemplateEngine {
  core: EngineCore,
  evaluator: Box<dyn Evaluator>,
}

impl JsonnetTemplateEngine {
  /// Create an engine evaluating with the `jsonnet` executable.
  pub fn new(core: EngineCore) -> Self {
    Self::with_evaluator(core, Box::new(JsonnetCommand::new()))
  }

  pub fn with_evaluator(core: EngineCore, evaluator: Box<dyn Evaluator>) -> Self {
    Self { core, evaluator }
  }
}

fn has_extension(path: &Path, extension: &str) -> bool {
  path.extension().is_some_and(|ext| ext == extension)
}

impl TemplateEngine for JsonnetTemplateEngine {
  fn kind(&self) -> EngineKind {
    EngineKind::Jsonnet
  }

  fn core(&self) -> &EngineCore {
    &self.core
  }

  fn workflow_sources(&self) -> Result<Vec<PathBuf>, EngineError> {
    let files = walk(self.core.fs(), &self.core.context().workflows_dir)?;
    Ok(
      files
        .into_iter()
        .filter(|path| {
          has_extension(path, TEMPLATE_EXTENSION) || has_extension(path, LIBRARY_EXTENSION)
        })
        .collect(),
    )
  }

  fn templates_in(&self, package: &dyn Package) -> Result<Vec<PathInfo>, EngineError> {
    let Some(workflows_dir) = package.workflows_dir() else {
      return Ok(Vec::new());
    };

    let mut templates = Vec::new();
    for path in walk(self.core.fs(), &workflows_dir)? {
      if has_extension(&path, TEMPLATE_EXTENSION) && !libs::is_lib_path(self.core.context(), &path) {
        templates.push(package.path_info(&path)?);
      }
    }
    Ok(templates)
  }

  fn workflow_name(&self, template: &Path) -> String {
    template
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  fn evaluate(&self, template: &Path, lib_paths: Vec<PathBuf>) -> Result<String, EvaluationError> {
    let content = self
      .core
      .fs()
      .read_to_string(template)
      .map_err(|e| EvaluationError::new(e.to_string()))?;
    let request = EvaluationRequest {
      template: template.to_path_buf(),
      files: vec![SourceFile {
        path: template.to_path_buf(),
        content,
      }],
      lib_paths,
    };

    self.evaluator.evaluate(&request).map_err(|e| {
      let message = trim_error(&e.message);
      if message.contains("expected string result") {
        EvaluationError::new(format!("{}\n{}", message, SERIALIZATION_HINT))
      } else {
        EvaluationError::new(message)
      }
    })
  }

  fn import_workflow(&self, workflow: &GitHubWorkflow) -> Result<PathBuf, EngineError> {
    let content = self.core.fs().read_to_string(&workflow.path)?;
    let json = yaml_to_json(&content).map_err(|source| EngineError::ParseWorkflow {
      path: workflow.path.clone(),
      source,
    })?;
    let json = serde_json::to_string_pretty(&json).map_err(|source| EngineError::RenderTemplate {
      path: workflow.path.clone(),
      source,
    })?;

    let template_name = self.workflow_name(&workflow.path);
    let template_path = self
      .core
      .context()
      .workflows_dir
      .join(format!("{}.{}", template_name, TEMPLATE_EXTENSION));
    let template = format!(
      "local workflow = {};\n\nstd.manifestYamlDoc(workflow)\n",
      json
    );
    self.core.writer().safely_write_file(&template_path, &template)?;
    Ok(template_path)
  }

  fn workflow_generator(&self, template_vars: BTreeMap<String, String>) -> WorkflowGenerator {
    WorkflowGenerator {
      name: "gflows".to_string(),
      sources: vec![
        WorkflowSource::new(
          "/jsonnet/workflows/common/steps.libsonnet",
          "/workflows/common/steps.libsonnet",
        ),
        WorkflowSource::new(
          "/jsonnet/workflows/common/workflows.libsonnet",
          "/workflows/common/workflows.libsonnet",
        ),
        WorkflowSource::new(
          "/jsonnet/workflows/gflows.jsonnet",
          "/workflows/$WORKFLOW_NAME.jsonnet",
        ),
        WorkflowSource::new("/jsonnet/config.yml", "/config.yml"),
      ],
      template_vars,
    }
  }
}
