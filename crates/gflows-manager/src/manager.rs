use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gflows_config::GFlowsContext;
use gflows_content::{ContentWriter, Logger};
use gflows_engine::{STARTER_ASSETS, TemplateEngine};
use gflows_fs::FileSystem;
use gflows_workflow::{Definition, GitHubWorkflow, Validator};
use tracing::{debug, info};

use crate::diff::update_preview;
use crate::error::ManagerError;

const DEFAULT_JOB_NAME: &str = "check-workflows";
const DEFAULT_WORKFLOW_NAME: &str = "gflows";

/// Runs the user-facing workflow actions on top of a template engine.
pub struct WorkflowManager {
  fs: Rc<dyn FileSystem>,
  logger: Logger,
  validator: Validator,
  context: Rc<GFlowsContext>,
  writer: ContentWriter,
  engine: Box<dyn TemplateEngine>,
}

impl WorkflowManager {
  pub fn new(
    fs: Rc<dyn FileSystem>,
    logger: Logger,
    validator: Validator,
    context: Rc<GFlowsContext>,
    writer: ContentWriter,
    engine: Box<dyn TemplateEngine>,
  ) -> Self {
    Self {
      fs,
      logger,
      validator,
      context,
      writer,
      engine,
    }
  }

  pub fn engine(&self) -> &dyn TemplateEngine {
    self.engine.as_ref()
  }

  /// Workflow files in the GitHub workflows directory, each with the
  /// definition generating it, if any.
  pub fn get_workflows(&self) -> Result<Vec<GitHubWorkflow>, ManagerError> {
    let dir = self.context.github_workflows_dir();
    if !self.fs.is_dir(&dir) {
      return Ok(Vec::new());
    }

    let files: Vec<PathBuf> = self
      .fs
      .read_dir(&dir)?
      .into_iter()
      .filter(|path| path.extension().is_some_and(|ext| ext == "yml") && !self.fs.is_dir(path))
      .collect();
    let mut definitions = self.engine.workflow_definitions()?;

    Ok(
      files
        .into_iter()
        .map(|path| {
          let definition = definitions
            .iter()
            .position(|definition| definition.destination == path)
            .map(|index| definitions.swap_remove(index));
          GitHubWorkflow { path, definition }
        })
        .collect(),
    )
  }

  /// Write every valid definition to its destination.
  ///
  /// Every definition is attempted. Failures are logged as they are found and
  /// reported together once all definitions have been processed.
  pub fn update_workflows(&self) -> Result<(), ManagerError> {
    let definitions = self.engine.workflow_definitions()?;
    let mut valid = true;

    for definition in &definitions {
      let details = format!("(from {})", definition.description);
      if !definition.status.valid {
        self
          .writer
          .log_errors(&definition.destination, &details, &definition.status.errors);
        valid = false;
        continue;
      }

      let schema = self.validator.validate_schema(definition);
      if schema.valid {
        if let Err(e) =
          self
            .writer
            .update_file_content(&definition.destination, &definition.content, &details)
        {
          self
            .writer
            .log_errors(&definition.destination, &details, &[e.to_string()]);
          valid = false;
        }
      } else {
        self
          .writer
          .log_errors(&definition.destination, &details, &schema.errors);
        valid = false;
      }
    }

    info!(workflows = definitions.len(), valid, "updated workflows");
    if valid {
      Ok(())
    } else {
      Err(ManagerError::GenerationFailed)
    }
  }

  /// Check every definition for evaluation errors, schema violations and
  /// drift from the file on disk, optionally printing a diff for drift.
  pub fn validate_workflows(&self, show_diff: bool) -> Result<(), ManagerError> {
    let definitions = self.engine.workflow_definitions()?;
    let mut valid = true;

    for definition in &definitions {
      if !self.check_workflow(definition, show_diff) {
        valid = false;
      }
    }

    if valid {
      Ok(())
    } else {
      Err(ManagerError::ValidationFailed)
    }
  }

  fn check_workflow(&self, definition: &Definition, show_diff: bool) -> bool {
    let styles = self.logger.styles();
    self
      .logger
      .print(&format!("Checking {} ... ", styles.bold(&definition.name)));

    if !definition.status.valid {
      self.logger.println(&styles.error("FAILED"));
      self.logger.println("  Error parsing template:");
      self.logger.print_status_errors(&definition.status.errors);
      return false;
    }

    let schema = self.validator.validate_schema(definition);
    if !schema.valid {
      self.logger.println(&styles.error("FAILED"));
      self.logger.println("  Schema validation failed:");
      self.logger.print_status_errors(&schema.errors);
    }

    let content = self.validator.validate_content(definition);
    if !content.valid {
      if schema.valid {
        self.logger.println(&styles.error("FAILED"));
      }
      for error in &content.errors {
        self.logger.println(&format!("  {}", error));
      }
      self
        .logger
        .println(&format!("  {} Run \"gflows update\" to update", styles.error("►")));

      if show_diff {
        self.print_update_preview(definition);
      }
    }

    if schema.valid && content.valid {
      self.logger.println(&styles.ok("OK"));
      for message in schema.errors.iter().chain(&content.errors) {
        self
          .logger
          .println(&format!("  {} {}", styles.warning("Warning:"), message));
      }
    }

    debug!(workflow = %definition.name, schema = schema.valid, content = content.valid, "checked workflow");
    schema.valid && content.valid
  }

  fn print_update_preview(&self, definition: &Definition) {
    let actual = match self.fs.read_to_string(&definition.destination) {
      Ok(actual) => actual,
      Err(e) if e.is_not_found() => String::new(),
      Err(e) => {
        self
          .logger
          .print_status_errors(&[format!("Unable to show diff: {}", e)]);
        return;
      }
    };
    let preview = update_preview(
      &actual,
      &definition.content,
      &definition.source,
      &definition.destination,
    );
    self.logger.pretty_print_diff(&preview);
  }

  /// Scaffold a new context: the engine's starter templates and a config file.
  pub fn init_workflows(
    &self,
    workflow_name: &str,
    github_dir: &str,
    config_path: &Path,
  ) -> Result<(), ManagerError> {
    let job_name = if workflow_name == DEFAULT_WORKFLOW_NAME {
      DEFAULT_JOB_NAME.to_string()
    } else {
      format!("{} [{}]", DEFAULT_JOB_NAME, workflow_name)
    };
    let template_vars = BTreeMap::from([
      ("WORKFLOW_NAME".to_string(), workflow_name.to_string()),
      ("JOB_NAME".to_string(), job_name),
      ("GITHUB_DIR".to_string(), github_dir.to_string()),
      (
        "CONFIG_PATH".to_string(),
        config_path.display().to_string(),
      ),
    ]);

    let generator = self.engine.workflow_generator(template_vars);
    self
      .writer
      .apply_generator(&STARTER_ASSETS, &self.context.dir, &generator)?;
    Ok(())
  }

  /// Turn every unmanaged workflow into a local template. Returns the
  /// paths of the templates created.
  pub fn import_workflows(&self) -> Result<Vec<PathBuf>, ManagerError> {
    let mut imported = Vec::new();
    for workflow in self.get_workflows()? {
      self
        .logger
        .println(&format!("Found workflow: {}", workflow.path.display()));
      match &workflow.definition {
        Some(definition) => {
          self
            .logger
            .println(&format!("  Source: {}", definition.description));
        }
        None => {
          let template = self.engine.import_workflow(&workflow)?;
          self
            .logger
            .println(&format!("  Imported template: {}", template.display()));
          imported.push(template);
        }
      }
    }

    if !imported.is_empty() {
      self.logger.println(&format!(
        "Run \"gflows update\" to regenerate {} imported workflow(s) from their templates",
        imported.len()
      ));
    }
    Ok(imported)
  }

  /// Print each workflow file with where it is generated from.
  pub fn list_workflows(&self) -> Result<(), ManagerError> {
    let workflows = self.get_workflows()?;
    if workflows.is_empty() {
      self.logger.println(&format!(
        "No workflows found in {}",
        self.context.github_workflows_dir().display()
      ));
      return Ok(());
    }

    let styles = self.logger.styles();
    for workflow in &workflows {
      let source = match &workflow.definition {
        Some(definition) => format!("(from {})", definition.description),
        None => styles.warning("(unmanaged)"),
      };
      self
        .logger
        .println(&format!("{} {}", workflow.path.display(), source));
    }
    Ok(())
  }
}
