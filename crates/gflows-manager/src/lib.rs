//! GFlows Manager
//!
//! [`WorkflowManager`] implements the commands of the `gflows` CLI on top of
//! a [`TemplateEngine`](gflows_engine::TemplateEngine) and a
//! [`Validator`](gflows_workflow::Validator):
//!
//! - `update` writes every generated workflow that passes schema validation
//! - `check` reports evaluation errors, schema violations and drift from disk
//! - `ls` lists the workflow files and where they come from
//! - `init` scaffolds a new context from the engine's starter templates
//! - `import` turns unmanaged workflows into templates
//!
//! Failures are isolated per workflow and reported together at the end.

mod diff;
mod error;
mod manager;

pub use diff::update_preview;
pub use error::ManagerError;
pub use manager::WorkflowManager;
