//! GFlows Workflow
//!
//! The per-run data model shared by template engines, the validator and the
//! workflow manager:
//! - [`Definition`]: one generated workflow, its provenance and its status
//! - [`ValidationResult`]: the outcome of evaluating or checking a definition
//! - [`GitHubWorkflow`]: a file found in the GitHub workflows directory
//!
//! [`Validator`] checks generated content against the GitHub workflow schema
//! and against what is already on disk.

mod definition;
mod error;
mod validator;
mod yaml;

pub use definition::{Definition, GENERATED_HEADER, GitHubWorkflow, ValidationResult};
pub use error::ValidatorError;
pub use validator::Validator;
pub use yaml::{normalize_workflow, yaml_to_json};
