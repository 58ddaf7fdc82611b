//! Integration tests for the workflow manager, driving the jsonnet and ytt
//! engines over an in-memory filesystem with stand-in evaluators.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use gflows_config::{DEFAULT_CONFIG_PATH, GFlowsContext};
use gflows_content::{ContentReader, ContentWriter, Logger, OutputBuffer, StaticHttpClient};
use gflows_engine::{EngineCore, EvaluationError, EvaluationRequest, create_engine_with};
use gflows_fs::{FileSystem, MemFs};
use gflows_manager::{ManagerError, WorkflowManager};
use gflows_workflow::Validator;

const TEST_WORKFLOW: &str = "on: push
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - run: echo hello
";

const INVALID_WORKFLOW: &str = "on: push
jobs:
  test:
    steps:
      - run: echo hello
";

const GENERATED_TEST_WORKFLOW: &str = "# File generated by gflows, do not modify
# Source: .gflows/workflows/test.jsonnet
on: push
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - run: echo hello
";

struct Fixture {
  fs: Rc<MemFs>,
  out: OutputBuffer,
  manager: WorkflowManager,
}

/// Evaluates each template to the concatenation of its files, unless one of
/// them calls `error`.
fn fake_evaluator(request: &EvaluationRequest) -> Result<String, EvaluationError> {
  let mut output = String::new();
  for file in &request.files {
    if file.content.starts_with("error ") {
      return Err(EvaluationError::new(format!(
        "RUNTIME ERROR: {}\n",
        file.content.trim_start_matches("error ").trim()
      )));
    }
    output.push_str(&file.content);
  }
  Ok(output)
}

fn setup(config: &str) -> Fixture {
  let fs = Rc::new(MemFs::new());
  fs.write_str(DEFAULT_CONFIG_PATH, config);
  let http = Rc::new(StaticHttpClient::new());
  let context = Rc::new(GFlowsContext::load(fs.as_ref(), DEFAULT_CONFIG_PATH).unwrap());
  let (logger, out) = Logger::buffered();
  let writer = ContentWriter::new(fs.clone(), logger.clone());
  let reader = ContentReader::new(fs.clone(), http);
  let core = EngineCore::new(fs.clone(), context.clone(), writer.clone(), reader);
  let engine = create_engine_with(context.engine(), core, Box::new(fake_evaluator));
  let validator = Validator::new(fs.clone(), context.clone()).unwrap();
  let manager = WorkflowManager::new(fs.clone(), logger, validator, context, writer, engine);
  Fixture { fs, out, manager }
}

fn default_setup() -> Fixture {
  setup("templates:\n  engine: jsonnet\n")
}

impl Fixture {
  fn read(&self, path: &str) -> String {
    self.fs.read_to_string(Path::new(path)).unwrap()
  }

  /// Everything logged so far.
  fn output(&self) -> String {
    self.out.contents()
  }
}

#[test]
fn test_update_workflows() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);

  fixture.manager.update_workflows().unwrap();

  assert_eq!(
    fixture.output(),
    "     create .github/workflows/test.yml (from .gflows/workflows/test.jsonnet)\n"
  );
  assert_eq!(
    fixture.read(".github/workflows/test.yml"),
    GENERATED_TEST_WORKFLOW
  );
}

#[test]
fn test_update_workflows_is_idempotent() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);

  fixture.manager.update_workflows().unwrap();
  fixture.manager.update_workflows().unwrap();

  assert_eq!(
    fixture.output(),
    [
      "     create .github/workflows/test.yml (from .gflows/workflows/test.jsonnet)",
      "  identical .github/workflows/test.yml (from .gflows/workflows/test.jsonnet)",
      "",
    ]
    .join("\n")
  );
}

#[test]
fn test_update_workflows_reports_evaluation_errors() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/broken.jsonnet", "error boom");
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);

  let result = fixture.manager.update_workflows();

  assert!(matches!(result, Err(ManagerError::GenerationFailed)));
  assert_eq!(
    result.unwrap_err().to_string(),
    "errors encountered generating workflows"
  );
  assert_eq!(
    fixture.output(),
    [
      "      error .github/workflows/broken.yml (from .gflows/workflows/broken.jsonnet)",
      "  ► RUNTIME ERROR: boom",
      "     create .github/workflows/test.yml (from .gflows/workflows/test.jsonnet)",
      "",
    ]
    .join("\n")
  );
  assert!(!fixture.fs.exists(Path::new(".github/workflows/broken.yml")));
  assert!(fixture.fs.exists(Path::new(".github/workflows/test.yml")));
}

#[test]
fn test_update_workflows_reports_schema_errors() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", INVALID_WORKFLOW);

  let result = fixture.manager.update_workflows();

  assert!(matches!(result, Err(ManagerError::GenerationFailed)));
  let output = fixture.output();
  assert!(output.starts_with(
    "      error .github/workflows/test.yml (from .gflows/workflows/test.jsonnet)\n  ► /jobs/test: "
  ));
  assert!(!fixture.fs.exists(Path::new(".github/workflows/test.yml")));
}

#[test]
fn test_update_workflows_continues_after_write_errors() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/a.jsonnet", TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".gflows/workflows/b.jsonnet", TEST_WORKFLOW);
  fixture
    .fs
    .create_dir_all(Path::new(".github/workflows/a.yml"))
    .unwrap();

  let result = fixture.manager.update_workflows();

  assert!(matches!(result, Err(ManagerError::GenerationFailed)));
  assert_eq!(
    fixture.output(),
    [
      "      error .github/workflows/a.yml (from .gflows/workflows/a.jsonnet)",
      "  ► io error at .github/workflows/a.yml: is a directory",
      "     create .github/workflows/b.yml (from .gflows/workflows/b.jsonnet)",
      "",
    ]
    .join("\n")
  );
  assert!(fixture.fs.exists(Path::new(".github/workflows/b.yml")));
}

#[test]
fn test_update_skips_schema_when_disabled() {
  let fixture = setup(
    &[
      "templates:",
      "  engine: jsonnet",
      "workflows:",
      "  overrides:",
      "    test:",
      "      checks:",
      "        schema:",
      "          enabled: false",
    ]
    .join("\n"),
  );
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", INVALID_WORKFLOW);

  fixture.manager.update_workflows().unwrap();

  assert!(fixture.fs.exists(Path::new(".github/workflows/test.yml")));
}

#[test]
fn test_validate_missing_workflow() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);

  let result = fixture.manager.validate_workflows(false);

  assert!(matches!(result, Err(ManagerError::ValidationFailed)));
  assert_eq!(
    fixture.output(),
    [
      "Checking test ... FAILED",
      "  Workflow missing for \"test\" (expected workflow at .github/workflows/test.yml)",
      "  ► Run \"gflows update\" to update",
      "",
    ]
    .join("\n")
  );
}

#[test]
fn test_validate_up_to_date_workflow() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".github/workflows/test.yml", GENERATED_TEST_WORKFLOW);

  fixture.manager.validate_workflows(false).unwrap();

  assert_eq!(fixture.output(), "Checking test ... OK\n");
}

#[test]
fn test_validate_reports_skipped_checks_as_warnings() {
  let fixture = setup(
    &[
      "templates:",
      "  engine: jsonnet",
      "workflows:",
      "  defaults:",
      "    checks:",
      "      content:",
      "        enabled: false",
      "  overrides:",
      "    test:",
      "      checks:",
      "        schema:",
      "          enabled: false",
    ]
    .join("\n"),
  );
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", INVALID_WORKFLOW);

  fixture.manager.validate_workflows(false).unwrap();

  assert_eq!(
    fixture.output(),
    [
      "Checking test ... OK",
      "  Warning: Schema checks disabled for test, skipping",
      "  Warning: Content checks disabled for test, skipping",
      "",
    ]
    .join("\n")
  );
}

#[test]
fn test_validate_reports_evaluation_errors() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", "error boom");

  let result = fixture.manager.validate_workflows(false);

  assert!(matches!(result, Err(ManagerError::ValidationFailed)));
  assert_eq!(
    fixture.output(),
    [
      "Checking test ... FAILED",
      "  Error parsing template:",
      "  ► RUNTIME ERROR: boom",
      "",
    ]
    .join("\n")
  );
}

#[test]
fn test_validate_reports_schema_and_content_errors() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", INVALID_WORKFLOW);

  let result = fixture.manager.validate_workflows(false);

  assert!(matches!(result, Err(ManagerError::ValidationFailed)));
  let output = fixture.output();
  assert!(output.starts_with("Checking test ... FAILED\n  Schema validation failed:\n  ► /jobs/test: "));
  assert!(output.ends_with(
    "  Workflow missing for \"test\" (expected workflow at .github/workflows/test.yml)\n  ► Run \"gflows update\" to update\n"
  ));
  assert_eq!(output.matches("FAILED").count(), 1);
}

#[test]
fn test_validate_shows_diff() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);
  fixture.fs.write_str(
    ".github/workflows/test.yml",
    &GENERATED_TEST_WORKFLOW.replace("on: push", "on: pull_request"),
  );

  let result = fixture.manager.validate_workflows(true);

  assert!(result.is_err());
  assert_eq!(
    fixture.output(),
    [
      "Checking test ... FAILED",
      "  Content is out of date for \"test\" (.github/workflows/test.yml)",
      "  ► Run \"gflows update\" to update",
      "src: <generated from: .gflows/workflows/test.jsonnet>",
      "dst: .github/workflows/test.yml",
      "This diff previews what will happen to .github/workflows/test.yml if you run \"gflows update\"",
      "--- .github/workflows/test.yml",
      "+++ .github/workflows/test.yml",
      "@@ -1,6 +1,6 @@",
      " # File generated by gflows, do not modify",
      " # Source: .gflows/workflows/test.jsonnet",
      "-on: pull_request",
      "+on: push",
      " jobs:",
      "   test:",
      "     runs-on: ubuntu-latest",
      "",
    ]
    .join("\n")
  );
}

#[test]
fn test_validate_reports_unreadable_destination_in_diff() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/a.jsonnet", TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);
  fixture
    .fs
    .write(Path::new(".github/workflows/a.yml"), &[0xff, 0xfe])
    .unwrap();
  fixture
    .fs
    .write_str(".github/workflows/test.yml", GENERATED_TEST_WORKFLOW);

  let result = fixture.manager.validate_workflows(true);

  assert!(matches!(result, Err(ManagerError::ValidationFailed)));
  let output = fixture.output();
  assert!(output.starts_with(
    &[
      "Checking a ... FAILED",
      "  Content is out of date for \"a\" (.github/workflows/a.yml)",
      "  ► Run \"gflows update\" to update",
      "  ► Unable to show diff: io error at .github/workflows/a.yml: ",
    ]
    .join("\n")
  ));
  assert!(output.ends_with("Checking test ... OK\n"));
}

#[test]
fn test_validate_continues_after_failures() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/broken.jsonnet", "error boom");
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".github/workflows/test.yml", GENERATED_TEST_WORKFLOW);

  let result = fixture.manager.validate_workflows(false);

  assert!(result.is_err());
  assert!(fixture.output().ends_with("Checking test ... OK\n"));
}

#[test]
fn test_get_workflows() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".github/workflows/test.yml", GENERATED_TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".github/workflows/manual.yml", TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".github/workflows/README.md", "# workflows");

  let workflows = fixture.manager.get_workflows().unwrap();

  assert_eq!(workflows.len(), 2);
  assert_eq!(
    workflows[0].path,
    PathBuf::from(".github/workflows/manual.yml")
  );
  assert!(workflows[0].is_unmanaged());
  assert_eq!(workflows[1].path, PathBuf::from(".github/workflows/test.yml"));
  assert_eq!(
    workflows[1].definition.as_ref().map(|d| d.name.as_str()),
    Some("test")
  );
}

#[test]
fn test_get_workflows_without_github_dir() {
  let fixture = default_setup();

  assert!(fixture.manager.get_workflows().unwrap().is_empty());
}

#[test]
fn test_list_workflows() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".github/workflows/test.yml", GENERATED_TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".github/workflows/manual.yml", TEST_WORKFLOW);

  fixture.manager.list_workflows().unwrap();

  assert_eq!(
    fixture.output(),
    [
      ".github/workflows/manual.yml (unmanaged)",
      ".github/workflows/test.yml (from .gflows/workflows/test.jsonnet)",
      "",
    ]
    .join("\n")
  );
}

#[test]
fn test_init_jsonnet_workflows() {
  let fixture = default_setup();

  fixture
    .manager
    .init_workflows("gflows", ".github/", Path::new(".gflows/config.yml"))
    .unwrap();

  assert_eq!(
    fixture.output(),
    [
      "     create .gflows/workflows/common/steps.libsonnet",
      "     create .gflows/workflows/common/workflows.libsonnet",
      "     create .gflows/workflows/gflows.jsonnet",
      "     update .gflows/config.yml",
      "",
    ]
    .join("\n")
  );
  let template = fixture.read(".gflows/workflows/gflows.jsonnet");
  assert!(template.contains("'check-workflows'"));
  assert!(template.contains("'.gflows/config.yml'"));
}

#[test]
fn test_init_with_custom_workflow_name() {
  let fixture = setup("templates:\n  engine: ytt\n");

  fixture
    .manager
    .init_workflows("my-workflows", ".github/", Path::new(".gflows/config.yml"))
    .unwrap();

  let values = fixture.read(".gflows/workflows/common/values.yml");
  assert!(values.contains("job_name: check-workflows [my-workflows]"));
  assert!(
    fixture
      .fs
      .exists(Path::new(".gflows/workflows/my-workflows/my-workflows.yml"))
  );
}

#[test]
fn test_import_workflows() {
  let fixture = default_setup();
  fixture
    .fs
    .write_str(".gflows/workflows/test.jsonnet", TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".github/workflows/test.yml", GENERATED_TEST_WORKFLOW);
  fixture
    .fs
    .write_str(".github/workflows/manual.yml", "name: manual\non: push\n");

  let imported = fixture.manager.import_workflows().unwrap();

  assert_eq!(
    imported,
    vec![PathBuf::from(".gflows/workflows/manual.jsonnet")]
  );
  assert_eq!(
    fixture.output(),
    [
      "Found workflow: .github/workflows/manual.yml",
      "  Imported template: .gflows/workflows/manual.jsonnet",
      "Found workflow: .github/workflows/test.yml",
      "  Source: .gflows/workflows/test.jsonnet",
      "Run \"gflows update\" to regenerate 1 imported workflow(s) from their templates",
      "",
    ]
    .join("\n")
  );
  assert!(
    fixture
      .read(".gflows/workflows/manual.jsonnet")
      .starts_with("local workflow = {\n  \"name\": \"manual\",")
  );
}
