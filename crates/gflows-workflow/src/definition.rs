use std::path::PathBuf;

use gflows_package::PathInfo;
use serde_json::Value;
use tracing::debug;

use crate::yaml::yaml_to_json;

/// First line of every generated workflow.
pub const GENERATED_HEADER: &str = "# File generated by gflows, do not modify";

/// Outcome of evaluating or checking a definition.
///
/// A valid result may still carry messages, e.g. a note that a check was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
  pub valid: bool,
  pub errors: Vec<String>,
}

impl ValidationResult {
  pub fn ok() -> Self {
    Self {
      valid: true,
      errors: Vec::new(),
    }
  }

  pub fn invalid(errors: Vec<String>) -> Self {
    Self {
      valid: false,
      errors,
    }
  }

  /// A passing result carrying an informational message.
  pub fn skipped(message: impl Into<String>) -> Self {
    Self {
      valid: true,
      errors: vec![message.into()],
    }
  }
}

impl Default for ValidationResult {
  fn default() -> Self {
    Self::ok()
  }
}

/// One generated workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
  pub name: String,
  /// Local path of the template the workflow is generated from.
  pub source: String,
  /// Path of the generated file.
  pub destination: PathBuf,
  /// Human readable provenance, written into the generated header.
  pub description: String,
  /// Generated text, empty until evaluation succeeds.
  pub content: String,
  /// Whether evaluation succeeded, with its error messages if not.
  pub status: ValidationResult,
  /// `content` as a JSON tree, absent unless evaluation succeeded.
  pub parsed: Option<Value>,
}

impl Definition {
  pub fn new(
    name: impl Into<String>,
    source: impl Into<String>,
    destination: impl Into<PathBuf>,
  ) -> Self {
    let source = source.into();
    Self {
      name: name.into(),
      description: source.clone(),
      source,
      destination: destination.into(),
      content: String::new(),
      status: ValidationResult::ok(),
      parsed: None,
    }
  }

  /// Store the evaluated `body` behind the generated header.
  ///
  /// A body that is not valid YAML fails the definition instead.
  pub fn set_content(&mut self, body: &str, template: &PathInfo) {
    match yaml_to_json(body) {
      Ok(parsed) => {
        self.description = template.description.clone();
        self.content = format!(
          "{}\n# Source: {}\n{}",
          GENERATED_HEADER, template.description, body
        );
        self.parsed = Some(parsed);
      }
      Err(e) => {
        debug!(workflow = %self.name, error = %e, "generated content is not valid YAML");
        self.fail(vec![format!("Generated content is not valid YAML: {}", e)]);
      }
    }
  }

  /// Mark evaluation as failed, discarding any content.
  pub fn fail(&mut self, errors: Vec<String>) {
    self.content.clear();
    self.parsed = None;
    self.status = ValidationResult::invalid(errors);
  }
}

/// A workflow file in the GitHub workflows directory, and the definition
/// generating it if there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct GitHubWorkflow {
  pub path: PathBuf,
  pub definition: Option<Definition>,
}

impl GitHubWorkflow {
  /// Whether the file was written by hand rather than generated.
  pub fn is_unmanaged(&self) -> bool {
    self.definition.is_none()
  }
}
