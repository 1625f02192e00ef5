//! Page tree types shared by the walker, reader, and reconciler

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use docsync_render::Attachment;

/// Opaque identifier the remote store assigns to a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Canonical, already rendered form of one tree position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    /// Final (prefixed) title
    pub title: String,
    /// Body in the remote storage format
    pub body: String,
    /// Attachments in the order the body references them
    pub attachments: Vec<Attachment>,
    children: Vec<RenderedPage>,
}

impl RenderedPage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            attachments: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style child insertion, see [`RenderedPage::insert_child`].
    pub fn with_child(mut self, child: RenderedPage) -> Self {
        self.insert_child(child);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Insert a child keyed by its title.
    ///
    /// Two children with the same final title cannot both exist remotely, so
    /// the later one replaces the earlier one in place and the replaced page
    /// is returned.
    pub fn insert_child(&mut self, child: RenderedPage) -> Option<RenderedPage> {
        match self.children.iter().position(|c| c.title == child.title) {
            Some(idx) => {
                warn!(
                    "Duplicate page title \"{}\" under \"{}\", keeping the last one",
                    child.title, self.title
                );
                Some(std::mem::replace(&mut self.children[idx], child))
            }
            None => {
                self.children.push(child);
                None
            }
        }
    }

    /// Children in order.
    pub fn children(&self) -> &[RenderedPage] {
        &self.children
    }

    /// Look up a direct child by title.
    pub fn child(&self, title: &str) -> Option<&RenderedPage> {
        self.children.iter().find(|c| c.title == title)
    }

    /// Number of pages in this subtree, including this one.
    pub fn page_count(&self) -> usize {
        1 + self.children.iter().map(RenderedPage::page_count).sum::<usize>()
    }
}

/// Server-held representation of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    pub id: PageId,
    pub title: String,
    /// Starts at 1 and advances by exactly 1 per accepted update
    pub version: u64,
    pub body: String,
    /// Children keyed by their remote title
    pub children: BTreeMap<String, RemotePage>,
}

impl RemotePage {
    /// A page known only by id, as returned for the root of a fetch.
    ///
    /// Title and body are empty and the version is 0, since the reader only
    /// fetches descendants.
    pub fn root(id: PageId) -> Self {
        Self {
            id,
            title: String::new(),
            version: 0,
            body: String::new(),
            children: BTreeMap::new(),
        }
    }

    /// Look up a page by its title path below this one.
    pub fn find(&self, path: &[&str]) -> Option<&RemotePage> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.children.get(*first)?.find(rest),
        }
    }

    /// Number of pages below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}
