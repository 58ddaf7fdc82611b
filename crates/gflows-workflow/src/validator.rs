use std::rc::Rc;

use gflows_config::{Check, GFlowsContext};
use gflows_fs::FileSystem;
use serde_json::Value;
use tracing::debug;

use crate::definition::{Definition, ValidationResult};
use crate::error::ValidatorError;

const WORKFLOW_SCHEMA: &str = include_str!("../schema/github-workflow.json");

/// Checks generated workflows against the GitHub workflow schema and against
/// the files already in the GitHub workflows directory.
pub struct Validator {
  fs: Rc<dyn FileSystem>,
  context: Rc<GFlowsContext>,
  schema: jsonschema::Validator,
}

impl Validator {
  pub fn new(fs: Rc<dyn FileSystem>, context: Rc<GFlowsContext>) -> Result<Self, ValidatorError> {
    let schema: Value = serde_json::from_str(WORKFLOW_SCHEMA)?;
    let schema =
      jsonschema::validator_for(&schema).map_err(|e| ValidatorError::InvalidSchema(e.to_string()))?;
    Ok(Self {
      fs,
      context,
      schema,
    })
  }

  /// Validate the parsed content of `definition` against the workflow schema.
  ///
  /// One error per violation, formatted `<instance path>: <message>`, with
  /// `(root)` standing for the document itself.
  pub fn validate_schema(&self, definition: &Definition) -> ValidationResult {
    if !self
      .context
      .config
      .check_enabled(&definition.name, Check::Schema)
    {
      return ValidationResult::skipped(format!(
        "Schema checks disabled for {}, skipping",
        definition.name
      ));
    }

    let Some(parsed) = &definition.parsed else {
      return ValidationResult::invalid(vec![format!(
        "No content generated for \"{}\"",
        definition.name
      )]);
    };

    let errors: Vec<String> = self
      .schema
      .iter_errors(parsed)
      .map(|e| {
        let path = e.instance_path.to_string();
        let path = if path.is_empty() { "(root)".to_string() } else { path };
        format!("{}: {}", path, e)
      })
      .collect();

    debug!(workflow = %definition.name, errors = errors.len(), "validated schema");
    if errors.is_empty() {
      ValidationResult::ok()
    } else {
      ValidationResult::invalid(errors)
    }
  }

  /// Compare the generated content of `definition` with its destination file.
  pub fn validate_content(&self, definition: &Definition) -> ValidationResult {
    if !self
      .context
      .config
      .check_enabled(&definition.name, Check::Content)
    {
      return ValidationResult::skipped(format!(
        "Content checks disabled for {}, skipping",
        definition.name
      ));
    }

    match self.fs.read(&definition.destination) {
      Ok(actual) if actual == definition.content.as_bytes() => ValidationResult::ok(),
      Ok(_) => ValidationResult::invalid(vec![format!(
        "Content is out of date for \"{}\" ({})",
        definition.name,
        definition.destination.display()
      )]),
      Err(e) if e.is_not_found() => ValidationResult::invalid(vec![format!(
        "Workflow missing for \"{}\" (expected workflow at {})",
        definition.name,
        definition.destination.display()
      )]),
      Err(e) => ValidationResult::invalid(vec![e.to_string()]),
    }
  }
}
