//! Publishing configuration parsed from `docsync.toml`

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::model::PageId;
use crate::walker::DEFAULT_INDEX_FILE;
use crate::{Error, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "docsync.toml";

fn default_index_file() -> String {
    DEFAULT_INDEX_FILE.to_string()
}

/// Top level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
    /// Site title, used as the title of the root page
    #[serde(default)]
    pub title: String,

    /// Image parameter handed to the renderer; may contain `<base_url>`
    #[serde(default)]
    pub image: String,

    /// Content node name promoted to represent its directory
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Documentation source directory, relative to the config file
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Remote store settings
    pub confluence: ConfluenceSection,
}

/// Remote store section
#[derive(Clone, Deserialize)]
pub struct ConfluenceSection {
    /// Base URL of the wiki, e.g. `https://example.atlassian.net/wiki/`
    pub base_url: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub pass: String,

    /// Space key pages are created in
    pub space_id: String,

    /// Page the documentation root is published under
    #[serde(deserialize_with = "page_id_from_string_or_number")]
    pub ancestor_id: PageId,

    /// Prefix prepended to every page title
    #[serde(default)]
    pub prefix: String,

    /// Request timeout; the transport default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ConfluenceSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfluenceSection")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("space_id", &self.space_id)
            .field("ancestor_id", &self.ancestor_id)
            .field("prefix", &self.prefix)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn page_id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<PageId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(id) => PageId::new(id),
        Raw::Number(id) => PageId::new(id.to_string()),
    })
}

impl PublishConfig {
    /// Parse and validate configuration from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use docsync_core::config::PublishConfig;
    ///
    /// let config = PublishConfig::parse(r#"
    /// title = "Handbook"
    ///
    /// [confluence]
    /// base_url = "https://wiki.example.com/"
    /// space_id = "DOC"
    /// ancestor_id = 1234
    /// prefix = "HB"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.confluence.ancestor_id.as_str(), "1234");
    /// assert_eq!(config.index_file, "index.html");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let config: PublishConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Check that every value the remote store needs is present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("confluence.base_url", self.confluence.base_url.trim()),
            ("confluence.space_id", self.confluence.space_id.trim()),
            ("confluence.ancestor_id", self.confluence.ancestor_id.as_str().trim()),
        ];
        for (key, value) in required {
            if value.is_empty() {
                return Err(Error::InvalidConfig {
                    message: format!("{key} must not be empty"),
                });
            }
        }
        if self.index_file.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "index_file must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the documentation source directory.
    ///
    /// A relative `source` is taken relative to `config_dir`; without a
    /// `source` the config directory itself is used.
    pub fn source_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.source {
            Some(source) if source.is_absolute() => source.clone(),
            Some(source) => config_dir.join(source),
            None => config_dir.to_path_buf(),
        }
    }
}
