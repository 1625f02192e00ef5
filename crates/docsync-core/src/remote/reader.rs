//! Recursive read of the remote page hierarchy

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::RemoteStore;
use crate::Result;
use crate::model::{PageId, RemotePage};

/// Fetches the remote page tree below a given page.
pub struct RemoteHierarchyReader<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RemoteStore + ?Sized> RemoteHierarchyReader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch every descendant of `root_id`.
    ///
    /// The returned root only carries the id; its title, body, and version
    /// are not read. Recursion has no depth limit and stops at pages without
    /// children.
    pub fn fetch_tree(&self, root_id: &PageId) -> Result<RemotePage> {
        let mut root = RemotePage::root(root_id.clone());
        root.children = self.fetch_children(root_id)?;
        debug!(
            "Fetched {} remote pages below {}",
            root.descendant_count(),
            root_id
        );
        Ok(root)
    }

    fn fetch_children(&self, page_id: &PageId) -> Result<BTreeMap<String, RemotePage>> {
        let mut children = BTreeMap::new();

        for summary in self.store.list_children(page_id)? {
            let grandchildren = self.fetch_children(&summary.id)?;
            let page = RemotePage {
                id: summary.id,
                title: summary.title,
                version: summary.version,
                body: summary.body,
                children: grandchildren,
            };
            if let Some(previous) = children.insert(page.title.clone(), page) {
                warn!(
                    "Remote pages share the title \"{}\" under {}, ignoring {}",
                    previous.title, page_id, previous.id
                );
            }
        }

        Ok(children)
    }
}
