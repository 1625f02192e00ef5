//! Parameter bundle passed to the renderer

/// Placeholder replaced by the current relative base path
pub const BASE_URL_PLACEHOLDER: &str = "<base_url>";

/// Parameters visible to the renderer for one content node.
///
/// The tree walker adjusts the path related fields on every descent, so each
/// node sees paths relative to its own location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderParams {
    /// Site title
    pub title: String,
    /// Relative path from the current node back to the documentation root
    pub base_url: String,
    /// Same as `base_url`; kept separate for templates linking to pages
    pub base_page: String,
    /// Image path, possibly containing [`BASE_URL_PLACEHOLDER`]
    pub image: String,
    /// First page of the enclosing directory, unset at the root
    pub entry_page: Option<String>,
    /// URL of the node being rendered
    pub request: String,
    /// Name of the node being rendered
    pub file_uri: String,
}

impl RenderParams {
    /// Create the root parameter bundle for a site.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the image parameter.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Replace [`BASE_URL_PLACEHOLDER`] in `text` with the current base path.
    pub fn resolve_base_url(&self, text: &str) -> String {
        text.replace(BASE_URL_PLACEHOLDER, &self.base_url)
    }
}
