use std::fmt;
use std::path::Path;
use std::rc::Rc;

use gflows_fs::FileSystem;
use tracing::debug;

use crate::error::ContentError;
use crate::generator::{AssetSource, WorkflowGenerator, expand_vars};
use crate::logger::Logger;

/// Width of the right-aligned verb column in progress lines.
const VERB_WIDTH: usize = 11;

/// How a write changed the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
  /// No file existed before.
  Create,
  /// A file existed with different content.
  Update,
  /// The file already had exactly this content; nothing was written.
  Identical,
}

impl FileAction {
  pub fn verb(&self) -> &'static str {
    match self {
      FileAction::Create => "create",
      FileAction::Update => "update",
      FileAction::Identical => "identical",
    }
  }
}

impl fmt::Display for FileAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.verb())
  }
}

/// Writes content to a filesystem and reports each change on the progress log.
#[derive(Clone)]
pub struct ContentWriter {
  fs: Rc<dyn FileSystem>,
  logger: Logger,
}

impl ContentWriter {
  pub fn new(fs: Rc<dyn FileSystem>, logger: Logger) -> Self {
    Self { fs, logger }
  }

  /// Create any missing parent directories, then replace the whole file.
  pub fn safely_write_file(&self, path: &Path, content: &str) -> Result<(), ContentError> {
    if let Some(parent) = path.parent() {
      self.fs.create_dir_all(parent)?;
    }
    self.fs.write(path, content.as_bytes())?;
    Ok(())
  }

  /// Write `content` unless the file already matches it, and log what happened.
  pub fn update_file_content(
    &self,
    path: &Path,
    content: &str,
    details: &str,
  ) -> Result<FileAction, ContentError> {
    let existing = match self.fs.read(path) {
      Ok(bytes) => Some(bytes),
      Err(e) if e.is_not_found() => None,
      Err(e) => return Err(e.into()),
    };

    let action = match existing {
      None => FileAction::Create,
      Some(bytes) if bytes == content.as_bytes() => FileAction::Identical,
      Some(_) => FileAction::Update,
    };

    if action != FileAction::Identical {
      self.safely_write_file(path, content)?;
    }

    debug!(path = %path.display(), action = %action, "updated file content");
    let verb = self.styled_verb(action);
    self.log_line(&verb, path, details);
    Ok(action)
  }

  /// Log a failure for `path` followed by one bullet per detail.
  pub fn log_errors(&self, path: &Path, message: &str, details: &[String]) {
    let verb = self
      .logger
      .styles()
      .error(&format!("{:>width$}", "error", width = VERB_WIDTH));
    self.log_line(&verb, path, message);
    self.logger.print_status_errors(details);
  }

  /// Copy every source of `generator` from `assets` into `base_dir`, in declaration order.
  pub fn apply_generator(
    &self,
    assets: &dyn AssetSource,
    base_dir: &Path,
    generator: &WorkflowGenerator,
  ) -> Result<(), ContentError> {
    debug!(generator = %generator.name, base_dir = %base_dir.display(), "applying generator");
    for source in &generator.sources {
      let bytes = assets.read_asset(&source.source)?;
      let content = expand_vars(&String::from_utf8_lossy(&bytes), &generator.template_vars);
      let destination = expand_vars(&source.destination, &generator.template_vars);
      let path = base_dir.join(destination.trim_start_matches('/'));
      self.update_file_content(&path, &content, "")?;
    }
    Ok(())
  }

  fn styled_verb(&self, action: FileAction) -> String {
    let padded = format!("{:>width$}", action.verb(), width = VERB_WIDTH);
    let styles = self.logger.styles();
    match action {
      FileAction::Create => styles.added(&padded),
      FileAction::Update => styles.warning(&padded),
      FileAction::Identical => styles.info(&padded),
    }
  }

  fn log_line(&self, verb: &str, path: &Path, details: &str) {
    if details.is_empty() {
      self.logger.println(&format!("{} {}", verb, path.display()));
    } else {
      self
        .logger
        .println(&format!("{} {} {}", verb, path.display(), details));
    }
  }
}
