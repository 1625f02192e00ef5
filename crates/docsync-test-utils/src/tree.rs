//! Local tree builders and a scripted renderer.
//!
//! The builders produce nodes with fake paths; they never touch the disk.

use std::collections::HashMap;
use std::sync::Mutex;

use docsync_render::{Attachment, ContentRenderer, Error, RenderParams, RenderedContent, Result};
use docsync_tree::{Content, Directory, LocalNode, slug_from_name};

/// Build a directory node titled `title` holding `children`.
///
/// Content urls are rewritten to include the directory slug.
pub fn dir(title: &str, children: Vec<LocalNode>) -> LocalNode {
    let slug = slug_from_name(title);
    let mut directory = Directory::new(slug.clone(), title, format!("/docs/{slug}"));
    for child in children {
        directory.insert(nest(child, &slug));
    }
    LocalNode::Directory(directory)
}

/// Build a content node titled `title`, named `<slug>.html`.
pub fn content(title: &str) -> LocalNode {
    let name = format!("{}.html", slug_from_name(title));
    let path = format!("/docs/{}.md", slug_from_name(title));
    LocalNode::Content(Content::new(name.clone(), title, name, path))
}

fn nest(node: LocalNode, slug: &str) -> LocalNode {
    match node {
        LocalNode::Content(mut content) => {
            content.url = format!("{slug}/{}", content.url);
            LocalNode::Content(content)
        }
        LocalNode::Directory(sub) => {
            let mut nested = Directory::new(sub.name.clone(), sub.title.clone(), sub.path.clone());
            for child in sub.children() {
                nested.insert(nest(child.clone(), slug));
            }
            LocalNode::Directory(nested)
        }
    }
}

/// A renderer whose output is fixed per content title.
///
/// Bodies default to `<p>{title}</p>`. Every call is recorded together with
/// the parameters it received.
#[derive(Default)]
pub struct ScriptedRenderer {
    bodies: HashMap<String, String>,
    attachments: HashMap<String, Vec<Attachment>>,
    failing: Vec<String>,
    calls: Mutex<Vec<(String, RenderParams)>>,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render content titled `title` with `body`.
    pub fn with_body(mut self, title: &str, body: &str) -> Self {
        self.bodies.insert(title.to_string(), body.to_string());
        self
    }

    /// Attach in-memory bytes to content titled `title`.
    pub fn with_attachment(mut self, title: &str, filename: &str, bytes: &[u8]) -> Self {
        self.attachments
            .entry(title.to_string())
            .or_default()
            .push(Attachment::bytes(filename, bytes.to_vec()));
        self
    }

    /// Fail to render content titled `title`.
    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing.push(title.to_string());
        self
    }

    /// Titles rendered so far, in order.
    pub fn rendered(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }

    /// Parameters the content titled `title` was rendered with.
    pub fn params_for(&self, title: &str) -> Option<RenderParams> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, params)| params.clone())
    }
}

impl ContentRenderer for ScriptedRenderer {
    fn render(&self, content: &Content, params: &RenderParams) -> Result<RenderedContent> {
        self.calls
            .lock()
            .unwrap()
            .push((content.title.clone(), params.clone()));

        if self.failing.contains(&content.title) {
            return Err(Error::Malformed {
                path: content.path.clone(),
                line: 1,
                message: "scripted failure".to_string(),
            });
        }

        Ok(RenderedContent {
            title: content.title.clone(),
            body: self
                .bodies
                .get(&content.title)
                .cloned()
                .unwrap_or_else(|| format!("<p>{}</p>", content.title)),
            attachments: self
                .attachments
                .get(&content.title)
                .cloned()
                .unwrap_or_default(),
        })
    }
}
