use std::path::Path;
use std::rc::Rc;

use gflows_fs::FileSystem;
use url::Url;

use crate::error::ContentError;
use crate::http::HttpClient;

/// Parse `reference` as a remote locator. Only absolute `http`/`https` URLs qualify.
pub fn parse_remote(reference: &str) -> Option<Url> {
  Url::parse(reference)
    .ok()
    .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Whether `reference` names remote content rather than a local path.
pub fn is_remote(reference: &str) -> bool {
  parse_remote(reference).is_some()
}

/// Reads content from a local path or a remote URL.
#[derive(Clone)]
pub struct ContentReader {
  fs: Rc<dyn FileSystem>,
  http: Rc<dyn HttpClient>,
}

impl ContentReader {
  pub fn new(fs: Rc<dyn FileSystem>, http: Rc<dyn HttpClient>) -> Self {
    Self { fs, http }
  }

  /// Read `reference`, fetching over HTTP when it is a URL and from the filesystem otherwise.
  pub fn read(&self, reference: &str) -> Result<String, ContentError> {
    match parse_remote(reference) {
      Some(url) => self.http.get(&url),
      None => Ok(self.fs.read_to_string(Path::new(reference))?),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use gflows_fs::MemFs;

  use crate::http::StaticHttpClient;

  #[test]
  fn test_is_remote() {
    assert!(is_remote("https://example.com/path/to/my-lib.gflowslib"));
    assert!(is_remote("http://example.com/lib.gflowslib"));
    assert!(!is_remote("/path/to/my-lib.gflowslib"));
    assert!(!is_remote("relative/my-lib.gflowslib"));
    assert!(!is_remote("file:///path/to/my-lib.gflowslib"));
  }

  #[test]
  fn test_read_local_and_remote() {
    let fs = Rc::new(MemFs::new());
    fs.write_str("/path/to/local.txt", "local");
    let http = Rc::new(StaticHttpClient::new());
    http.stub_body("https://example.com/remote.txt", "remote");
    let reader = ContentReader::new(fs, http);

    assert_eq!(reader.read("/path/to/local.txt").unwrap(), "local");
    assert_eq!(reader.read("https://example.com/remote.txt").unwrap(), "remote");
  }

  #[test]
  fn test_read_remote_failure() {
    let reader = ContentReader::new(Rc::new(MemFs::new()), Rc::new(StaticHttpClient::new()));

    let err = reader.read("https://example.com/missing.txt").unwrap_err();

    assert!(matches!(err, ContentError::HttpStatus { status: 404, .. }));
  }
}
