use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gflows_config::{EngineKind, GFlowsContext};
use gflows_content::{ContentReader, ContentWriter, WorkflowGenerator};
use gflows_fs::FileSystem;
use gflows_package::{LibraryEnv, LocalPackage, Package, PathInfo};
use gflows_workflow::{Definition, GitHubWorkflow};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::evaluator::EvaluationError;
use crate::libs;

/// Collaborators shared by every template engine.
#[derive(Clone)]
pub struct EngineCore {
  fs: Rc<dyn FileSystem>,
  context: Rc<GFlowsContext>,
  writer: ContentWriter,
  reader: ContentReader,
}

impl EngineCore {
  pub fn new(
    fs: Rc<dyn FileSystem>,
    context: Rc<GFlowsContext>,
    writer: ContentWriter,
    reader: ContentReader,
  ) -> Self {
    Self {
      fs,
      context,
      writer,
      reader,
    }
  }

  pub fn fs(&self) -> &dyn FileSystem {
    self.fs.as_ref()
  }

  pub fn context(&self) -> &GFlowsContext {
    &self.context
  }

  pub fn writer(&self) -> &ContentWriter {
    &self.writer
  }

  fn library_env(&self) -> LibraryEnv {
    LibraryEnv::new(self.fs.clone(), self.reader.clone())
  }
}

/// Turns templates into workflow definitions.
///
/// Implementations decide what a template looks like and how it is rendered.
/// Discovery across packages, library resolution, destination collisions and
/// per-template error capture are shared by [`TemplateEngine::workflow_definitions`].
pub trait TemplateEngine {
  fn kind(&self) -> EngineKind;

  fn core(&self) -> &EngineCore;

  /// Every local file that can affect generated workflows, templates and
  /// library fragments alike.
  fn workflow_sources(&self) -> Result<Vec<PathBuf>, EngineError>;

  /// Templates provided by `package`, with their provenance.
  fn templates_in(&self, package: &dyn Package) -> Result<Vec<PathInfo>, EngineError>;

  /// Name of the workflow generated by the template at `template`.
  fn workflow_name(&self, template: &Path) -> String;

  /// Render one template with the given library search path.
  fn evaluate(&self, template: &Path, lib_paths: Vec<PathBuf>) -> Result<String, EvaluationError>;

  /// Convert an existing workflow file into a local template and return the template's path.
  fn import_workflow(&self, workflow: &GitHubWorkflow) -> Result<PathBuf, EngineError>;

  /// Starter files written by `gflows init`.
  fn workflow_generator(&self, template_vars: BTreeMap<String, String>) -> WorkflowGenerator;

  /// Templates in the local workflows directory.
  fn workflow_templates(&self) -> Result<Vec<PathInfo>, EngineError> {
    let local = LocalPackage::new(&self.core().context().workflows_dir);
    self.templates_in(&local)
  }

  /// Discover and evaluate every template of the local package and of all
  /// configured libraries.
  ///
  /// A template that fails to evaluate yields an invalid definition rather
  /// than an error. Libraries are staged for the duration of the call only.
  fn workflow_definitions(&self) -> Result<Vec<Definition>, EngineError> {
    let context = self.core().context();
    let mut env = self.core().library_env();
    libs::load_all(context, &mut env);

    let local = LocalPackage::new(&context.workflows_dir);
    let mut templates = self.templates_in(&local)?;
    for lib in env.libs() {
      templates.extend(self.templates_in(lib)?);
    }

    let mut definitions: Vec<(Definition, PathInfo)> = templates
      .into_iter()
      .map(|template| {
        let name = self.workflow_name(&template.local_path);
        let destination = context.destination_for(&name);
        let mut definition = Definition::new(
          name,
          template.local_path.display().to_string(),
          destination,
        );
        definition.description = template.description.clone();
        (definition, template)
      })
      .collect();
    flag_duplicate_destinations(&mut definitions);

    for (definition, template) in &mut definitions {
      if !definition.status.valid {
        continue;
      }
      let lib_paths = match libs::lib_paths(context, &mut env, &definition.name) {
        Ok(lib_paths) => lib_paths,
        Err(e) => {
          definition.fail(vec![e.to_string()]);
          continue;
        }
      };
      match self.evaluate(&template.local_path, lib_paths) {
        Ok(body) => definition.set_content(&body, template),
        Err(e) => definition.fail(vec![trim_error(&e.message).to_string()]),
      }
      debug!(
        workflow = %definition.name,
        valid = definition.status.valid,
        "evaluated template"
      );
    }

    if let Err(e) = env.clean_up() {
      warn!(error = %e, "failed to clean up libraries");
    }
    Ok(definitions.into_iter().map(|(definition, _)| definition).collect())
  }
}

/// Trim the padding evaluators tend to leave around messages.
pub(crate) fn trim_error(message: &str) -> &str {
  message.trim_matches(|c: char| c == ' ' || c == '\n' || c == '\r')
}

/// Fail every definition whose destination is shared with another one.
fn flag_duplicate_destinations(definitions: &mut [(Definition, PathInfo)]) {
  let mut by_destination: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
  for (index, (definition, _)) in definitions.iter().enumerate() {
    by_destination
      .entry(definition.destination.clone())
      .or_default()
      .push(index);
  }

  for (destination, indices) in by_destination {
    if indices.len() < 2 {
      continue;
    }
    let sources: Vec<String> = indices
      .iter()
      .map(|&index| definitions[index].0.description.clone())
      .collect();
    let message = format!(
      "Duplicate destination {} generated by {}",
      destination.display(),
      join_with_and(&sources)
    );
    warn!(destination = %destination.display(), "duplicate workflow destination");
    for index in indices {
      definitions[index].0.fail(vec![message.clone()]);
    }
  }
}

fn join_with_and(items: &[String]) -> String {
  match items {
    [] => String::new(),
    [only] => only.clone(),
    [init @ .., last] => format!("{} and {}", init.join(", "), last),
  }
}
