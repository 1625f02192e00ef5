//! Local tree node types
//!
//! A documentation source is a tree of [`Directory`] and [`Content`] nodes.
//! Directories keep their children in insertion order, which the loader
//! makes equal to on-disk file name order.

use std::path::PathBuf;

/// One element of the local documentation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalNode {
    /// A directory holding further nodes
    Directory(Directory),
    /// A renderable content file
    Content(Content),
}

impl LocalNode {
    /// Name used as the key inside the parent directory.
    pub fn name(&self) -> &str {
        match self {
            LocalNode::Directory(dir) => &dir.name,
            LocalNode::Content(content) => &content.name,
        }
    }

    /// Human readable title, before any prefixing.
    pub fn title(&self) -> &str {
        match self {
            LocalNode::Directory(dir) => &dir.title,
            LocalNode::Content(content) => &content.title,
        }
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            LocalNode::Directory(dir) => Some(dir),
            LocalNode::Content(_) => None,
        }
    }

    pub fn as_content(&self) -> Option<&Content> {
        match self {
            LocalNode::Content(content) => Some(content),
            LocalNode::Directory(_) => None,
        }
    }
}

impl From<Directory> for LocalNode {
    fn from(dir: Directory) -> Self {
        LocalNode::Directory(dir)
    }
}

impl From<Content> for LocalNode {
    fn from(content: Content) -> Self {
        LocalNode::Content(content)
    }
}

/// A directory node with ordered, name-keyed children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// Key inside the parent directory
    pub name: String,
    /// Title derived from the directory name
    pub title: String,
    /// Location on disk
    pub path: PathBuf,
    children: Vec<LocalNode>,
}

impl Directory {
    /// Create an empty directory node.
    pub fn new(name: impl Into<String>, title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Insert a child, replacing any existing child with the same name.
    ///
    /// Returns the replaced child, if any. The replacement keeps the position
    /// of the original entry.
    pub fn insert(&mut self, child: impl Into<LocalNode>) -> Option<LocalNode> {
        let child = child.into();
        match self.children.iter().position(|c| c.name() == child.name()) {
            Some(idx) => Some(std::mem::replace(&mut self.children[idx], child)),
            None => {
                self.children.push(child);
                None
            }
        }
    }

    /// Builder-style variant of [`Directory::insert`].
    pub fn with_child(mut self, child: impl Into<LocalNode>) -> Self {
        self.insert(child);
        self
    }

    /// Children in order.
    pub fn children(&self) -> &[LocalNode] {
        &self.children
    }

    /// Look up a direct child by name.
    pub fn get(&self, name: &str) -> Option<&LocalNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// URL of the first content page below this directory, depth-first.
    pub fn first_page(&self) -> Option<&str> {
        self.children.iter().find_map(|child| match child {
            LocalNode::Content(content) => Some(content.url.as_str()),
            LocalNode::Directory(dir) => dir.first_page(),
        })
    }

    /// Number of content nodes in this subtree.
    pub fn content_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                LocalNode::Content(_) => 1,
                LocalNode::Directory(dir) => dir.content_count(),
            })
            .sum()
    }
}

/// A renderable content node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// Key inside the parent directory, e.g. `install.html`
    pub name: String,
    /// Title derived from the file name
    pub title: String,
    /// Logical URL relative to the documentation root
    pub url: String,
    /// Source file on disk
    pub path: PathBuf,
}

impl Content {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            url: url.into(),
            path: path.into(),
        }
    }
}
