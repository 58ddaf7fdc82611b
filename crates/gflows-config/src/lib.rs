//! GFlows Config
//!
//! This crate contains the configuration model for gflows and the
//! [`GFlowsContext`], the per-invocation view of where things live:
//! the context dir holding `config.yml`, the template sources under
//! `<context>/workflows`, and the GitHub dir receiving generated workflows.
//!
//! A context is built once per command invocation and passed by reference
//! into every component that needs it.

mod config;
mod context;
mod engine;
mod error;

pub use config::{Check, CheckOptions, Checks, GFlowsConfig, TemplateOptions, TemplatesConfig, WorkflowOptions, WorkflowsConfig};
pub use context::{DEFAULT_CONFIG_PATH, GFlowsContext};
pub use engine::EngineKind;
pub use error::ConfigError;
