use std::fmt;

use serde::{Deserialize, Serialize};

/// The template engine used to evaluate workflow sources.
///
/// Unknown engine names are rejected when the config is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
  /// Jsonnet expression templates (`*.jsonnet`, shared `*.libsonnet`).
  #[default]
  Jsonnet,
  /// ytt overlay templates (one directory of YAML per workflow).
  Ytt,
}

impl EngineKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      EngineKind::Jsonnet => "jsonnet",
      EngineKind::Ytt => "ytt",
    }
  }
}

impl fmt::Display for EngineKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
