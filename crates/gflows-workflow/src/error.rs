/// Errors building a [`Validator`](crate::Validator).
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
  #[error("failed to parse workflow schema: {0}")]
  SchemaJson(#[from] serde_json::Error),

  #[error("invalid workflow schema: {0}")]
  InvalidSchema(String),
}
