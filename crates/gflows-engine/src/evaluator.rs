use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

/// A file handed to an evaluator, read through the filesystem boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
  pub path: PathBuf,
  pub content: String,
}

/// Everything an evaluator needs to render one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
  /// The template: a file for jsonnet, a directory for ytt.
  pub template: PathBuf,
  /// The template's own source files.
  pub files: Vec<SourceFile>,
  /// Library search path, in precedence order.
  pub lib_paths: Vec<PathBuf>,
}

/// A template failed to evaluate. The message is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
  pub message: String,
}

impl EvaluationError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

impl fmt::Display for EvaluationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message)
  }
}

impl std::error::Error for EvaluationError {}

/// Renders a template to workflow YAML.
pub trait Evaluator {
  fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError>;
}

impl<F> Evaluator for F
where
  F: Fn(&EvaluationRequest) -> Result<String, EvaluationError>,
{
  fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError> {
    self(request)
  }
}

/// Evaluates jsonnet templates with the `jsonnet` executable.
///
/// Runs `jsonnet -S -J <lib>... <template>`, so templates must produce a string.
#[derive(Debug, Clone)]
pub struct JsonnetCommand {
  program: String,
}

impl JsonnetCommand {
  pub fn new() -> Self {
    Self::with_program("jsonnet")
  }

  pub fn with_program(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }
}

impl Default for JsonnetCommand {
  fn default() -> Self {
    Self::new()
  }
}

impl Evaluator for JsonnetCommand {
  fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError> {
    let mut command = Command::new(&self.program);
    command.arg("-S");
    for lib in &request.lib_paths {
      command.arg("-J").arg(lib);
    }
    command.arg(&request.template);
    run(&self.program, command)
  }
}

/// Evaluates ytt templates with the `ytt` executable.
///
/// Runs `ytt -f <source>... -f <lib>...` with the template's source files,
/// so only the files collected for the template reach ytt.
#[derive(Debug, Clone)]
pub struct YttCommand {
  program: String,
}

impl YttCommand {
  pub fn new() -> Self {
    Self::with_program("ytt")
  }

  pub fn with_program(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }
}

impl Default for YttCommand {
  fn default() -> Self {
    Self::new()
  }
}

impl YttCommand {
  fn command(&self, request: &EvaluationRequest) -> Command {
    let mut command = Command::new(&self.program);
    for file in &request.files {
      command.arg("-f").arg(&file.path);
    }
    for lib in &request.lib_paths {
      command.arg("-f").arg(lib);
    }
    command
  }
}

impl Evaluator for YttCommand {
  fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError> {
    run(&self.program, self.command(request))
  }
}

fn run(program: &str, mut command: Command) -> Result<String, EvaluationError> {
  debug!(command = ?command, "evaluating template");
  let output = command
    .output()
    .map_err(|e| EvaluationError::new(format!("failed to run {}: {}", program, e)))?;

  if output.status.success() {
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  } else {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stderr.trim_matches(|c: char| c == ' ' || c == '\n' || c == '\r');
    if message.is_empty() {
      Err(EvaluationError::new(format!("{} exited with {}", program, output.status)))
    } else {
      Err(EvaluationError::new(message))
    }
  }
}
