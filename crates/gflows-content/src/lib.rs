//! GFlows Content
//!
//! Everything that touches generated content on its way to disk:
//!
//! - [`ContentWriter`] applies content idempotently and classifies each write
//!   as `create`, `update` or `identical`.
//! - [`Logger`] is the single ordered output stream for progress lines.
//! - [`WorkflowGenerator`] describes a bundle of assets to scaffold.
//! - [`ContentReader`] reads a locator that is either a local path or an
//!   `http(s)` URL, fetching remote content through an [`HttpClient`].

mod error;
mod generator;
mod http;
mod logger;
mod reader;
mod styles;
mod writer;

pub use error::ContentError;
pub use generator::{AssetSource, FsAssets, StaticAssets, WorkflowGenerator, WorkflowSource, expand_vars};
pub use http::{HttpClient, ReqwestClient, StaticHttpClient};
pub use logger::{Logger, OutputBuffer};
pub use reader::{ContentReader, is_remote, parse_remote};
pub use styles::Styles;
pub use writer::{ContentWriter, FileAction};
