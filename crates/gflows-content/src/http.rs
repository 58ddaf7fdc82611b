use std::cell::RefCell;
use std::collections::BTreeMap;

use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use crate::error::ContentError;

/// GET-only HTTP boundary used to fetch remote manifests and library files.
///
/// Any transport error or non-success status is a hard failure; there is no retry.
pub trait HttpClient {
  fn get(&self, url: &Url) -> Result<String, ContentError>;
}

/// HTTP client backed by reqwest's blocking client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
  client: Client,
}

impl ReqwestClient {
  pub fn new() -> Self {
    Self::default()
  }
}

impl HttpClient for ReqwestClient {
  fn get(&self, url: &Url) -> Result<String, ContentError> {
    debug!(url = %url, "fetching");
    let transport = |source: reqwest::Error| ContentError::Transport {
      url: url.to_string(),
      source,
    };

    let response = self.client.get(url.clone()).send().map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
      return Err(ContentError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    response.text().map_err(transport)
  }
}

/// HTTP client answering from a fixed table of bodies. Unknown URLs get a 404.
#[derive(Debug, Default)]
pub struct StaticHttpClient {
  bodies: RefCell<BTreeMap<String, String>>,
}

impl StaticHttpClient {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn stub_body(&self, url: impl Into<String>, body: impl Into<String>) {
    self.bodies.borrow_mut().insert(url.into(), body.into());
  }
}

impl HttpClient for StaticHttpClient {
  fn get(&self, url: &Url) -> Result<String, ContentError> {
    self
      .bodies
      .borrow()
      .get(url.as_str())
      .cloned()
      .ok_or_else(|| ContentError::HttpStatus {
        url: url.to_string(),
        status: 404,
      })
  }
}
