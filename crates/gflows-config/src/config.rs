use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::EngineKind;

/// The contents of a gflows `config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GFlowsConfig {
  /// Where generated workflows are written. Defaults to `.github/` next to the context dir.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub github_dir: Option<String>,
  pub templates: TemplatesConfig,
  pub workflows: WorkflowsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
  pub engine: EngineKind,
  pub defaults: TemplateOptions,
  pub overrides: BTreeMap<String, TemplateOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOptions {
  /// Library search paths or `.gflowslib` manifest references.
  pub libs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowsConfig {
  pub defaults: WorkflowOptions,
  pub overrides: BTreeMap<String, WorkflowOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowOptions {
  pub checks: Checks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checks {
  pub schema: CheckOptions,
  pub content: CheckOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub enabled: Option<bool>,
}

/// A validation check that can be toggled per workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
  Schema,
  Content,
}

impl Checks {
  fn get(&self, check: Check) -> &CheckOptions {
    match check {
      Check::Schema => &self.schema,
      Check::Content => &self.content,
    }
  }
}

impl GFlowsConfig {
  /// Library paths for a workflow: the defaults followed by its overrides.
  ///
  /// Order matters, it is the include-path precedence. Duplicates are kept.
  pub fn template_libs(&self, workflow_name: &str) -> Vec<String> {
    let mut libs = self.templates.defaults.libs.clone();
    if let Some(overrides) = self.templates.overrides.get(workflow_name) {
      libs.extend(overrides.libs.iter().cloned());
    }
    libs
  }

  /// Every library path mentioned anywhere in the config.
  pub fn all_template_libs(&self) -> Vec<String> {
    let mut libs = self.templates.defaults.libs.clone();
    for overrides in self.templates.overrides.values() {
      libs.extend(overrides.libs.iter().cloned());
    }
    libs
  }

  /// Whether a check runs for a workflow. A per-workflow override wins over the defaults,
  /// and checks are enabled unless configured otherwise.
  pub fn check_enabled(&self, workflow_name: &str, check: Check) -> bool {
    self
      .workflows
      .overrides
      .get(workflow_name)
      .and_then(|options| options.checks.get(check).enabled)
      .or(self.workflows.defaults.checks.get(check).enabled)
      .unwrap_or(true)
  }
}
