//! GFlows Engine
//!
//! Template engines turn the templates of the local context and of every
//! configured library into [`Definition`](gflows_workflow::Definition)s.
//!
//! Two engines are provided:
//! - [`JsonnetTemplateEngine`]: one `.jsonnet` file per workflow
//! - [`YttTemplateEngine`]: one directory of YAML overlays per workflow
//!
//! Rendering itself goes through the [`Evaluator`] trait. The default
//! evaluators run the `jsonnet` and `ytt` executables.

mod assets;
mod engine;
mod error;
mod evaluator;
mod jsonnet;
mod libs;
mod ytt;

pub use assets::STARTER_ASSETS;
pub use engine::{EngineCore, TemplateEngine};
pub use error::EngineError;
pub use evaluator::{
  EvaluationError, EvaluationRequest, Evaluator, JsonnetCommand, SourceFile, YttCommand,
};
pub use jsonnet::JsonnetTemplateEngine;
pub use ytt::YttTemplateEngine;

use gflows_config::EngineKind;

/// Create the engine selected by `kind`, evaluating with its default executable.
pub fn create_engine(kind: EngineKind, core: EngineCore) -> Box<dyn TemplateEngine> {
  match kind {
    EngineKind::Jsonnet => Box::new(JsonnetTemplateEngine::new(core)),
    EngineKind::Ytt => Box::new(YttTemplateEngine::new(core)),
  }
}

/// Create the engine selected by `kind` with a custom evaluator.
pub fn create_engine_with(
  kind: EngineKind,
  core: EngineCore,
  evaluator: Box<dyn Evaluator>,
) -> Box<dyn TemplateEngine> {
  match kind {
    EngineKind::Jsonnet => Box::new(JsonnetTemplateEngine::with_evaluator(core, evaluator)),
    EngineKind::Ytt => Box::new(YttTemplateEngine::with_evaluator(core, evaluator)),
  }
}
