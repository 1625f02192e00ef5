//! In-memory remote store.
//!
//! Behaves like the real content store where the engine depends on it:
//! creates require an existing parent, updates must supply current version
//! + 1, deletes cascade, and attachment names are unique per page. Every call
//! is appended to a log so tests can assert on ordering.

use std::sync::{Mutex, MutexGuard};

use docsync_core::{
    AttachmentSummary, PageId, PageSummary, RemoteStore, Result, TransportFailure, translate,
};
use serde_json::json;

/// Id of the page every store starts with
pub const ROOT_ID: &str = "1";

/// One recorded call against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListChildren(PageId),
    CreatePage {
        parent_id: PageId,
        title: String,
    },
    UpdatePage {
        page_id: PageId,
        version: u64,
    },
    DeletePage(PageId),
    ListAttachments {
        page_id: PageId,
        filename: String,
    },
    UploadAttachment {
        page_id: PageId,
        filename: String,
        existing_id: Option<String>,
    },
}

impl Call {
    /// Whether the call mutates the store.
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::ListChildren(_) | Call::ListAttachments { .. })
    }
}

/// Snapshot of one stored page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub id: PageId,
    pub parent: Option<PageId>,
    pub title: String,
    pub version: u64,
    pub body: String,
}

/// Snapshot of one stored attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttachment {
    pub id: String,
    pub page_id: PageId,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct State {
    pages: Vec<StoredPage>,
    attachments: Vec<StoredAttachment>,
    calls: Vec<Call>,
    next_id: u64,
    failing_titles: Vec<String>,
}

impl State {
    fn page(&self, id: &PageId) -> Option<&StoredPage> {
        self.pages.iter().find(|p| &p.id == id)
    }

    fn page_mut(&mut self, id: &PageId) -> Option<&mut StoredPage> {
        self.pages.iter_mut().find(|p| &p.id == id)
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_page(&mut self, parent: Option<PageId>, title: &str, body: &str) -> PageId {
        let id = PageId::new(self.allocate().to_string());
        self.pages.push(StoredPage {
            id: id.clone(),
            parent,
            title: title.to_string(),
            version: 1,
            body: body.to_string(),
        });
        id
    }

    fn descendants(&self, id: &PageId) -> Vec<PageId> {
        let mut found = vec![id.clone()];
        let mut idx = 0;
        while idx < found.len() {
            let current = found[idx].clone();
            found.extend(
                self.pages
                    .iter()
                    .filter(|p| p.parent.as_ref() == Some(&current))
                    .map(|p| p.id.clone()),
            );
            idx += 1;
        }
        found
    }
}

fn failure(path: &str, status: u16, message: &str) -> docsync_core::Error {
    translate(
        TransportFailure::new(format!("memory://rest/api/{}", path))
            .with_status(status)
            .with_body(json!({ "statusCode": status, "message": message }).to_string()),
    )
}

/// Remote store kept in memory.
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a store holding only the root page [`ROOT_ID`].
    pub fn new() -> Self {
        let mut state = State::default();
        state.insert_page(None, "Ancestor", "");
        Self {
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Id of the root page.
    pub fn root_id(&self) -> PageId {
        PageId::new(ROOT_ID)
    }

    /// Add a page directly, without logging a call.
    ///
    /// # Panics
    /// Panics if `parent` does not exist.
    pub fn seed_page(&self, parent: &PageId, title: &str, body: &str) -> PageId {
        let mut state = self.state();
        assert!(state.page(parent).is_some(), "seed_page: unknown parent {parent}");
        state.insert_page(Some(parent.clone()), title, body)
    }

    /// Add an attachment directly, without logging a call.
    pub fn seed_attachment(&self, page_id: &PageId, filename: &str, bytes: &[u8]) -> String {
        let mut state = self.state();
        let id = format!("att{}", state.allocate());
        state.attachments.push(StoredAttachment {
            id: id.clone(),
            page_id: page_id.clone(),
            filename: filename.to_string(),
            bytes: bytes.to_vec(),
        });
        id
    }

    /// Simulate an edit made by someone else: the version advances.
    pub fn bump_version(&self, page_id: &PageId) {
        let mut state = self.state();
        if let Some(page) = state.page_mut(page_id) {
            page.version += 1;
        }
    }

    /// Make every create of a page with this title fail with a server error.
    pub fn fail_create_of(&self, title: &str) {
        self.state().failing_titles.push(title.to_string());
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Only the mutating calls made so far.
    pub fn write_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Snapshot of a page.
    pub fn page(&self, id: &PageId) -> Option<StoredPage> {
        self.state().page(id).cloned()
    }

    /// Titles of the direct children of a page, in creation order.
    pub fn child_titles(&self, id: &PageId) -> Vec<String> {
        self.state()
            .pages
            .iter()
            .filter(|p| p.parent.as_ref() == Some(id))
            .map(|p| p.title.clone())
            .collect()
    }

    /// Resolve a title path starting below the root page.
    pub fn find(&self, path: &[&str]) -> Option<PageId> {
        let state = self.state();
        let mut current = PageId::new(ROOT_ID);
        for title in path {
            current = state
                .pages
                .iter()
                .find(|p| p.parent.as_ref() == Some(&current) && p.title == *title)?
                .id
                .clone();
        }
        Some(current)
    }

    /// Attachments stored on a page.
    pub fn attachments(&self, page_id: &PageId) -> Vec<StoredAttachment> {
        self.state()
            .attachments
            .iter()
            .filter(|a| &a.page_id == page_id)
            .cloned()
            .collect()
    }

    /// Indented title outline below a page, children sorted by title.
    pub fn outline(&self, id: &PageId) -> Vec<String> {
        fn walk(store: &InMemoryStore, id: &PageId, depth: usize, lines: &mut Vec<String>) {
            let state = store.state();
            let mut children: Vec<StoredPage> = state
                .pages
                .iter()
                .filter(|p| p.parent.as_ref() == Some(id))
                .cloned()
                .collect();
            drop(state);
            children.sort_by(|a, b| a.title.cmp(&b.title));
            for child in children {
                lines.push(format!("{}{}", "  ".repeat(depth), child.title));
                walk(store, &child.id, depth + 1, lines);
            }
        }

        let mut lines = Vec::new();
        walk(self, id, 0, &mut lines);
        lines
    }

    /// Number of pages, root included.
    pub fn page_count(&self) -> usize {
        self.state().pages.len()
    }
}

impl RemoteStore for InMemoryStore {
    fn list_children(&self, page_id: &PageId) -> Result<Vec<PageSummary>> {
        let mut state = self.state();
        state.calls.push(Call::ListChildren(page_id.clone()));
        if state.page(page_id).is_none() {
            return Err(failure(
                &format!("content/{page_id}/child/page"),
                404,
                "No content found with id",
            ));
        }
        Ok(state
            .pages
            .iter()
            .filter(|p| p.parent.as_ref() == Some(page_id))
            .map(|p| PageSummary {
                id: p.id.clone(),
                title: p.title.clone(),
                version: p.version,
                body: p.body.clone(),
            })
            .collect())
    }

    fn create_page(&self, parent_id: &PageId, title: &str, body: &str) -> Result<PageId> {
        let mut state = self.state();
        state.calls.push(Call::CreatePage {
            parent_id: parent_id.clone(),
            title: title.to_string(),
        });
        if state.failing_titles.iter().any(|t| t == title) {
            return Err(failure("content", 500, "java.lang.NullPointerException"));
        }
        if state.page(parent_id).is_none() {
            return Err(failure("content", 400, "Ancestor page does not exist"));
        }
        Ok(state.insert_page(Some(parent_id.clone()), title, body))
    }

    fn update_page(
        &self,
        parent_id: &PageId,
        page_id: &PageId,
        version: u64,
        title: &str,
        body: &str,
    ) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::UpdatePage {
            page_id: page_id.clone(),
            version,
        });
        let path = format!("content/{page_id}");
        if state.page(parent_id).is_none() {
            return Err(failure(&path, 400, "Ancestor page does not exist"));
        }
        let Some(page) = state.page_mut(page_id) else {
            return Err(failure(&path, 404, "No content found with id"));
        };
        if version != page.version + 1 {
            return Err(failure(
                &path,
                409,
                &format!(
                    "Version must be incremented on update. Current version is: {}",
                    page.version
                ),
            ));
        }
        page.version = version;
        page.parent = Some(parent_id.clone());
        page.title = title.to_string();
        page.body = body.to_string();
        Ok(())
    }

    fn delete_page(&self, page_id: &PageId) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::DeletePage(page_id.clone()));
        if state.page(page_id).is_none() {
            return Err(failure(&format!("content/{page_id}"), 404, "No content found with id"));
        }
        let doomed = state.descendants(page_id);
        state.pages.retain(|p| !doomed.contains(&p.id));
        state.attachments.retain(|a| !doomed.contains(&a.page_id));
        Ok(())
    }

    fn list_attachments(&self, page_id: &PageId, filename: &str) -> Result<Vec<AttachmentSummary>> {
        let mut state = self.state();
        state.calls.push(Call::ListAttachments {
            page_id: page_id.clone(),
            filename: filename.to_string(),
        });
        Ok(state
            .attachments
            .iter()
            .filter(|a| &a.page_id == page_id && a.filename == filename)
            .map(|a| AttachmentSummary { id: a.id.clone() })
            .collect())
    }

    fn upload_attachment(
        &self,
        page_id: &PageId,
        filename: &str,
        bytes: &[u8],
        existing_id: Option<&str>,
    ) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::UploadAttachment {
            page_id: page_id.clone(),
            filename: filename.to_string(),
            existing_id: existing_id.map(str::to_string),
        });
        let path = format!("content/{page_id}/child/attachment");
        if state.page(page_id).is_none() {
            return Err(failure(&path, 404, "No content found with id"));
        }

        match existing_id {
            Some(id) => {
                let Some(attachment) = state
                    .attachments
                    .iter_mut()
                    .find(|a| a.id == id && &a.page_id == page_id)
                else {
                    return Err(failure(&format!("{path}/{id}/data"), 404, "No attachment found"));
                };
                attachment.bytes = bytes.to_vec();
            }
            None => {
                if state
                    .attachments
                    .iter()
                    .any(|a| &a.page_id == page_id && a.filename == filename)
                {
                    return Err(failure(
                        &path,
                        400,
                        "Cannot add a new attachment with same file name as an existing attachment",
                    ));
                }
                let id = format!("att{}", state.allocate());
                state.attachments.push(StoredAttachment {
                    id,
                    page_id: page_id.clone(),
                    filename: filename.to_string(),
                    bytes: bytes.to_vec(),
                });
            }
        }
        Ok(())
    }
}
