//! GFlows Package
//!
//! A package is a source of workflow templates. The local gflows context is
//! one; every `.gflowslib` library referenced from the config is another.
//!
//! Libraries are described by a JSON manifest listing files under `libs/` or
//! `workflows/`. [`GFlowsLib::setup`] copies those files, local or remote,
//! into a private staging directory so template engines can read them like
//! any other directory, and [`GFlowsLib::path_info`] maps staged paths back to
//! where they came from.

mod env;
mod error;
mod library;
mod manifest;
mod package;

pub use env::LibraryEnv;
pub use error::PackageError;
pub use library::GFlowsLib;
pub use manifest::{MANIFEST_SUFFIX, Manifest, is_manifest_reference};
pub use package::{LocalPackage, Package, PathInfo};
