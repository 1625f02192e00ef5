//! Remote store abstraction
//!
//! The core talks to the remote content store only through [`RemoteStore`].
//! Implementations must report failures as the structured errors produced by
//! [`translate`].

mod reader;
mod translate;

pub use reader::RemoteHierarchyReader;
pub use translate::{TransportFailure, translate};

use crate::Result;
use crate::model::PageId;

/// One child page as listed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub id: PageId,
    pub title: String,
    pub version: u64,
    pub body: String,
}

/// An attachment as listed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSummary {
    pub id: String,
}

/// Operations the remote content store provides.
///
/// All calls block until the store answers. Every write that names a parent
/// requires that parent to exist already.
pub trait RemoteStore {
    /// List the direct children of a page with their current body and version.
    fn list_children(&self, page_id: &PageId) -> Result<Vec<PageSummary>>;

    /// Create a page under `parent_id` and return its new id.
    fn create_page(&self, parent_id: &PageId, title: &str, body: &str) -> Result<PageId>;

    /// Replace title and body of a page.
    ///
    /// Fails unless `version` is exactly the current remote version + 1.
    fn update_page(
        &self,
        parent_id: &PageId,
        page_id: &PageId,
        version: u64,
        title: &str,
        body: &str,
    ) -> Result<()>;

    /// Delete a page together with its descendants.
    fn delete_page(&self, page_id: &PageId) -> Result<()>;

    /// List attachments of a page with the given file name.
    fn list_attachments(&self, page_id: &PageId, filename: &str) -> Result<Vec<AttachmentSummary>>;

    /// Upload attachment content.
    ///
    /// With `existing_id` the content of that attachment is replaced,
    /// otherwise a new attachment is created.
    fn upload_attachment(
        &self,
        page_id: &PageId,
        filename: &str,
        bytes: &[u8],
        existing_id: Option<&str>,
    ) -> Result<()>;
}
