use std::path::Path;
use std::rc::Rc;

use gflows_content::{ContentReader, StaticHttpClient};
use gflows_fs::{FileSystem, MemFs};
use gflows_package::{GFlowsLib, Package, PackageError, PathInfo};

struct Fixture {
  fs: Rc<MemFs>,
  http: Rc<StaticHttpClient>,
}

impl Fixture {
  fn new() -> Self {
    Self {
      fs: Rc::new(MemFs::new()),
      http: Rc::new(StaticHttpClient::new()),
    }
  }

  fn lib(&self, reference: &str) -> GFlowsLib {
    let reader = ContentReader::new(self.fs.clone(), self.http.clone());
    GFlowsLib::new(self.fs.clone(), reader, reference)
  }

  fn read(&self, path: impl AsRef<Path>) -> String {
    self.fs.read_to_string(path.as_ref()).unwrap()
  }
}

fn assert_temp_dir(dir: &Path, manifest_name: &str) {
  let name = dir.file_name().unwrap().to_string_lossy().into_owned();
  assert!(
    name.starts_with(manifest_name),
    "expected {} to be named after {}",
    dir.display(),
    manifest_name
  );
}

#[test]
fn test_setup_local_lib() {
  let fixture = Fixture::new();
  fixture.fs.write_str(
    "/path/to/my-lib.gflowslib",
    r#"{"files": ["libs/lib.yml", "workflows/test.yml"]}"#,
  );
  fixture.fs.write_str("/path/to/libs/lib.yml", "lib: true");
  fixture.fs.write_str("/path/to/workflows/test.yml", "on: push");
  let mut lib = fixture.lib("/path/to/my-lib.gflowslib");

  lib.setup().unwrap();

  let local_dir = lib.local_dir().unwrap().to_path_buf();
  assert_temp_dir(&local_dir, "my-lib.gflowslib");
  assert!(!lib.is_remote());
  assert_eq!(lib.files(), ["libs/lib.yml", "workflows/test.yml"]);
  assert_eq!(fixture.read(local_dir.join("libs/lib.yml")), "lib: true");
  assert_eq!(fixture.read(local_dir.join("workflows/test.yml")), "on: push");
  assert_eq!(lib.libs_dir().unwrap(), local_dir.join("libs"));
  assert_eq!(lib.workflows_dir(), Some(local_dir.join("workflows")));
}

#[test]
fn test_setup_remote_lib() {
  let fixture = Fixture::new();
  fixture.http.stub_body(
    "https://example.com/path/to/my-lib.gflowslib",
    r#"{"files": ["libs/lib.yml", "workflows/test.yml"]}"#,
  );
  fixture
    .http
    .stub_body("https://example.com/path/to/libs/lib.yml", "lib: true");
  fixture
    .http
    .stub_body("https://example.com/path/to/workflows/test.yml", "on: push");
  let mut lib = fixture.lib("https://example.com/path/to/my-lib.gflowslib");

  lib.setup().unwrap();

  let local_dir = lib.local_dir().unwrap().to_path_buf();
  assert_temp_dir(&local_dir, "my-lib.gflowslib");
  assert!(lib.is_remote());
  assert_eq!(fixture.read(local_dir.join("libs/lib.yml")), "lib: true");
  assert_eq!(fixture.read(local_dir.join("workflows/test.yml")), "on: push");
}

#[test]
fn test_lib_structure_errors() {
  let fixture = Fixture::new();
  fixture.fs.write_str(
    "/path/to/my-lib.gflowslib",
    r#"{"files": ["libs/lib.yml", "foo/lib.yml"]}"#,
  );
  fixture.fs.write_str("/path/to/libs/lib.yml", "lib: true");
  fixture.fs.write_str("/path/to/foo/lib.yml", "lib: true");
  let mut lib = fixture.lib("/path/to/my-lib.gflowslib");

  let err = lib.setup().unwrap_err();

  assert_eq!(
    err.to_string(),
    "Unexpected directory foo/lib.yml, file must be in libs/ or workflows/"
  );
  assert!(lib.local_dir().is_none());
  assert!(!fixture.fs.exists(Path::new("/tmp")));
}

#[test]
fn test_setup_fetch_failure_removes_staging_dir() {
  let fixture = Fixture::new();
  fixture.http.stub_body(
    "https://example.com/my-lib.gflowslib",
    r#"{"files": ["libs/lib.yml", "libs/missing.yml"]}"#,
  );
  fixture
    .http
    .stub_body("https://example.com/libs/lib.yml", "lib: true");
  let mut lib = fixture.lib("https://example.com/my-lib.gflowslib");

  let err = lib.setup().unwrap_err();

  assert!(matches!(err, PackageError::Fetch { ref reference, .. } if reference == "https://example.com/libs/missing.yml"));
  assert!(lib.local_dir().is_none());
  assert!(fixture.fs.read_dir(Path::new("/tmp")).unwrap().is_empty());
}

#[test]
fn test_clean_up() {
  let fixture = Fixture::new();
  fixture
    .fs
    .write_str("/path/to/my-lib.gflowslib", r#"{"files": ["libs/lib.yml"]}"#);
  fixture.fs.write_str("/path/to/libs/lib.yml", "lib: true");
  let mut lib = fixture.lib("/path/to/my-lib.gflowslib");
  lib.setup().unwrap();
  let local_dir = lib.local_dir().unwrap().to_path_buf();

  lib.clean_up().unwrap();
  lib.clean_up().unwrap();

  assert!(!fixture.fs.exists(&local_dir));
  assert!(lib.local_dir().is_none());
}

#[test]
fn test_get_local_path_info() {
  let fixture = Fixture::new();
  fixture
    .fs
    .write_str("/path/to/my-lib.gflowslib", r#"{"files": ["workflows/foo/bar.yml"]}"#);
  fixture.fs.write_str("/path/to/workflows/foo/bar.yml", "on: push");
  let mut lib = fixture.lib("/path/to/my-lib.gflowslib");
  lib.setup().unwrap();
  let local_path = lib.local_dir().unwrap().join("workflows/foo/bar.yml");

  let info = lib.get_path_info(&local_path).unwrap();

  assert_eq!(
    info,
    PathInfo {
      local_path: local_path.clone(),
      source_path: "/path/to/workflows/foo/bar.yml".to_string(),
      description: "my-lib.gflowslib/workflows/foo/bar.yml".to_string(),
    }
  );
}

#[test]
fn test_get_remote_path_info() {
  let fixture = Fixture::new();
  fixture.http.stub_body(
    "https://example.com/path/to/my-lib.gflowslib",
    r#"{"files": ["workflows/foo/bar.yml"]}"#,
  );
  fixture
    .http
    .stub_body("https://example.com/path/to/workflows/foo/bar.yml", "on: push");
  let mut lib = fixture.lib("https://example.com/path/to/my-lib.gflowslib");
  lib.setup().unwrap();
  let local_path = lib.local_dir().unwrap().join("workflows/foo/bar.yml");

  let info = lib.path_info(&local_path).unwrap();

  assert_eq!(info.local_path, local_path);
  assert_eq!(
    info.source_path,
    "https://example.com/path/to/workflows/foo/bar.yml"
  );
  assert_eq!(info.description, "my-lib.gflowslib/workflows/foo/bar.yml");
}

#[test]
fn test_get_path_info_errors() {
  let fixture = Fixture::new();
  fixture
    .fs
    .write_str("/path/to/my-lib.gflowslib", r#"{"files": ["libs/lib.yml"]}"#);
  fixture.fs.write_str("/path/to/libs/lib.yml", "lib: true");
  let mut lib = fixture.lib("/path/to/my-lib.gflowslib");
  lib.setup().unwrap();
  let local_dir = lib.local_dir().unwrap().to_path_buf();

  let err = lib.get_path_info(Path::new("foo/bar.yml")).unwrap_err();
  assert_eq!(err.to_string(), "Expected foo/bar.yml to be absolute");

  let err = lib.get_path_info(Path::new("/path/to/foo/bar.yml")).unwrap_err();
  assert_eq!(
    err.to_string(),
    format!(
      "Expected /path/to/foo/bar.yml to be a subdirectory of {}",
      local_dir.display()
    )
  );

  let err = lib.get_path_info(&local_dir).unwrap_err();
  assert!(matches!(err, PackageError::InvalidArgument(_)));
}

#[test]
fn test_nested_manifest() {
  let fixture = Fixture::new();
  fixture.fs.write_str(
    "/path/to/my-lib.gflowslib",
    r#"{"files": ["libs/lib.yml", "libs/common/common.gflowslib"]}"#,
  );
  fixture.fs.write_str("/path/to/libs/lib.yml", "lib: true");
  fixture.fs.write_str(
    "/path/to/libs/common/common.gflowslib",
    r#"{"files": ["libs/steps.yml"]}"#,
  );
  fixture
    .fs
    .write_str("/path/to/libs/common/libs/steps.yml", "steps: []");
  let mut lib = fixture.lib("/path/to/my-lib.gflowslib");

  lib.setup().unwrap();

  assert_eq!(lib.children().len(), 1);
  let child = &lib.children()[0];
  assert_eq!(child.reference(), "/path/to/libs/common/common.gflowslib");
  let child_dir = child.local_dir().unwrap().to_path_buf();
  assert_eq!(fixture.read(child_dir.join("libs/steps.yml")), "steps: []");

  let dirs = lib.all_libs_dirs().unwrap();
  assert_eq!(
    dirs,
    vec![
      lib.local_dir().unwrap().join("libs"),
      child_dir.join("libs")
    ]
  );

  let info = lib.get_path_info(&child_dir.join("libs/steps.yml")).unwrap();
  assert_eq!(info.description, "common.gflowslib/libs/steps.yml");
  assert_eq!(info.source_path, "/path/to/libs/common/libs/steps.yml");

  lib.clean_up().unwrap();
  assert!(!fixture.fs.exists(&child_dir));
}

#[test]
fn test_repeated_manifest_names_are_not_a_cycle() {
  let fixture = Fixture::new();
  fixture.http.stub_body(
    "https://example.com/a/lib.gflowslib",
    r#"{"files": ["libs/lib.gflowslib"]}"#,
  );
  fixture.http.stub_body(
    "https://example.com/a/libs/lib.gflowslib",
    r#"{"files": ["libs/lib.gflowslib"]}"#,
  );
  fixture.http.stub_body(
    "https://example.com/a/libs/libs/lib.gflowslib",
    r#"{"files": []}"#,
  );
  let mut lib = fixture.lib("https://example.com/a/lib.gflowslib");

  lib.setup().unwrap();

  let child = &lib.children()[0];
  assert_eq!(child.reference(), "https://example.com/a/libs/lib.gflowslib");
  assert_eq!(
    child.children()[0].reference(),
    "https://example.com/a/libs/libs/lib.gflowslib"
  );
}

#[test]
fn test_self_referencing_manifest_is_a_cycle() {
  let fixture = Fixture::new();
  fixture.http.stub_body(
    "https://example.com/a/lib.gflowslib",
    r#"{"files": ["libs/%2e%2e/lib.gflowslib"]}"#,
  );
  let mut lib = fixture.lib("https://example.com/a/lib.gflowslib");

  let err = lib.setup().unwrap_err();

  assert!(matches!(err, PackageError::ManifestCycle(_)));
  assert_eq!(
    err.to_string(),
    "Manifest cycle detected at https://example.com/a/lib.gflowslib"
  );
  assert!(lib.local_dir().is_none());
  assert!(fixture.fs.read_dir(Path::new("/tmp")).unwrap().is_empty());
}
