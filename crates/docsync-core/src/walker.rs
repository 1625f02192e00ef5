//! Local tree to rendered page tree
//!
//! The walker renders every content node up front. A single render failure
//! aborts the walk, so no remote call is ever made for a tree that cannot be
//! rendered completely.

use tracing::debug;

use docsync_render::{ContentRenderer, RenderParams};
use docsync_render::params::BASE_URL_PLACEHOLDER;
use docsync_tree::{Content, Directory, LocalNode};

use crate::model::RenderedPage;
use crate::{Error, Result};

/// Name of the content node promoted to represent its directory
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Renders a [`LocalNode`] tree into a [`RenderedPage`] tree.
pub struct TreeWalker<'a, R: ?Sized> {
    renderer: &'a R,
    prefix: String,
    index_file: String,
}

impl<'a, R: ContentRenderer + ?Sized> TreeWalker<'a, R> {
    /// Create a walker that prefixes every title with `prefix`.
    ///
    /// The prefix is trimmed and followed by a single space; an empty prefix
    /// leaves titles untouched.
    pub fn new(renderer: &'a R, prefix: &str) -> Self {
        let prefix = prefix.trim();
        Self {
            renderer,
            prefix: if prefix.is_empty() {
                String::new()
            } else {
                format!("{prefix} ")
            },
            index_file: DEFAULT_INDEX_FILE.to_string(),
        }
    }

    /// Use a different index file name.
    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = index_file.into();
        self
    }

    /// Apply the title prefix.
    pub fn prefixed(&self, title: &str) -> String {
        format!("{}{}", self.prefix, title)
    }

    /// Render the whole tree below `root`.
    pub fn render(&self, root: &LocalNode, params: &RenderParams) -> Result<RenderedPage> {
        match root {
            LocalNode::Directory(dir) => self.render_directory(dir, params.clone(), "", &params.image),
            LocalNode::Content(content) => {
                let mut params = params.clone();
                params.image = params.image.replace(BASE_URL_PLACEHOLDER, "");
                self.render_content(content, &mut params)
            }
        }
    }

    fn render_directory(
        &self,
        dir: &Directory,
        mut params: RenderParams,
        base_url: &str,
        image_template: &str,
    ) -> Result<RenderedPage> {
        let mut page = RenderedPage::new(self.prefixed(&dir.title), "");

        params.base_url = base_url.to_string();
        params.base_page = base_url.to_string();
        params.image = image_template.replace(BASE_URL_PLACEHOLDER, base_url);
        if !base_url.is_empty() {
            params.entry_page = dir.first_page().map(str::to_string);
        }

        for child in dir.children() {
            match child {
                LocalNode::Directory(sub) => {
                    let rendered = self.render_directory(
                        sub,
                        params.clone(),
                        &format!("../{base_url}"),
                        image_template,
                    )?;
                    page.insert_child(rendered);
                }
                LocalNode::Content(content) => {
                    let rendered = self.render_content(content, &mut params)?;
                    if content.name == self.index_file {
                        page.title = self.prefixed(&dir.title);
                        page.body = rendered.body;
                        page.attachments = rendered.attachments;
                    } else {
                        page.insert_child(rendered);
                    }
                }
            }
        }

        Ok(page)
    }

    fn render_content(&self, content: &Content, params: &mut RenderParams) -> Result<RenderedPage> {
        params.request = content.url.clone();
        params.file_uri = content.name.clone();

        let rendered = self
            .renderer
            .render(content, params)
            .map_err(|source| Error::Render {
                path: content.path.clone(),
                source,
            })?;
        debug!("Rendered {} as \"{}\"", content.url, rendered.title);

        let mut page = RenderedPage::new(self.prefixed(&rendered.title), rendered.body);
        page.attachments = rendered.attachments;
        Ok(page)
    }
}
