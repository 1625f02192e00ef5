//! Renderer seam and rendered output types

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use docsync_tree::Content;

use crate::{RenderParams, Result};

/// Where the bytes of an attachment come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// A file read at upload time
    File(PathBuf),
    /// Bytes already in memory
    Bytes(Vec<u8>),
}

impl AttachmentSource {
    /// Load the attachment bytes.
    pub fn read(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match self {
            AttachmentSource::File(path) => fs::read(path).map(Cow::Owned),
            AttachmentSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }
}

/// A file attached to a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Name the attachment is stored under on the page
    pub filename: String,
    pub source: AttachmentSource,
}

impl Attachment {
    pub fn file(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            source: AttachmentSource::File(path.into()),
        }
    }

    pub fn bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            source: AttachmentSource::Bytes(bytes.into()),
        }
    }
}

/// Output of rendering one content node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedContent {
    /// Unprefixed page title
    pub title: String,
    /// Body in the remote storage format
    pub body: String,
    /// Files the body references
    pub attachments: Vec<Attachment>,
}

/// Turns one content node into a rendered title and body.
///
/// Implementations must render eagerly and report malformed sources as
/// errors; the caller relies on this to validate the whole tree before it
/// talks to the remote store.
pub trait ContentRenderer {
    fn render(&self, content: &Content, params: &RenderParams) -> Result<RenderedContent>;
}

impl<T: ContentRenderer + ?Sized> ContentRenderer for &T {
    fn render(&self, content: &Content, params: &RenderParams) -> Result<RenderedContent> {
        (**self).render(content, params)
    }
}
