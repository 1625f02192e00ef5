//! Content rendering for docsync
//!
//! Provides the [`ContentRenderer`] seam the publishing core renders through,
//! the [`RenderParams`] bundle propagated down the tree, and
//! [`MarkdownRenderer`], which turns markdown into the remote store's XHTML
//! storage format.

pub mod error;
pub mod markdown;
pub mod params;
pub mod renderer;

pub use error::{Error, Result};
pub use markdown::MarkdownRenderer;
pub use params::RenderParams;
pub use renderer::{Attachment, AttachmentSource, ContentRenderer, RenderedContent};
