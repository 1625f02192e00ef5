//! Filesystem loader for the local tree

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::node::{Content, Directory, LocalNode};
use crate::{Error, Result};

/// Leading ordering prefix such as `01_` or `2-`
static ORDER_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[_\-.\s]+").unwrap());

/// Extensions recognised as content files
const CONTENT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Load the documentation tree rooted at `root`.
///
/// Directories become [`Directory`] nodes and markdown files become
/// [`Content`] nodes. Hidden entries are skipped, other files are left out of
/// the tree (content may still reference them as attachments), and
/// directories without any content below them are dropped.
pub fn load_tree(root: &Path) -> Result<LocalNode> {
    if !root.exists() {
        return Err(Error::SourceNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(Error::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let dir = load_directory(root, &slug_from_name(&name), &title_from_name(&name), "")?;
    debug!(
        "Loaded {} content files from {}",
        dir.content_count(),
        root.display()
    );
    Ok(LocalNode::Directory(dir))
}

fn load_directory(path: &Path, name: &str, title: &str, url_prefix: &str) -> Result<Directory> {
    let mut dir = Directory::new(name, title, path);

    let mut entries = fs::read_dir(path)
        .map_err(|e| Error::io(path, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(path, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') {
            trace!("Skipping hidden entry {}", file_name);
            continue;
        }

        let entry_path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&entry_path, e))?;

        if file_type.is_dir() {
            let slug = slug_from_name(&file_name);
            let child = load_directory(
                &entry_path,
                &slug,
                &title_from_name(&file_name),
                &format!("{}{}/", url_prefix, slug),
            )?;
            if child.content_count() == 0 {
                debug!("Skipping directory without content: {}", entry_path.display());
                continue;
            }
            dir.insert(child);
        } else if is_content_file(&entry_path) {
            let stem = entry_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let name = format!("{}.html", slug_from_name(&stem));
            let content = Content::new(
                name.clone(),
                title_from_name(&stem),
                format!("{}{}", url_prefix, name),
                &entry_path,
            );
            dir.insert(content);
        } else {
            trace!("Not a content file: {}", entry_path.display());
        }
    }

    Ok(dir)
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            CONTENT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn strip_order_prefix(name: &str) -> &str {
    match ORDER_PREFIX.find(name) {
        Some(m) if m.end() < name.len() => &name[m.end()..],
        _ => name,
    }
}

/// URL-safe name for a file or directory stem: the ordering prefix is dropped.
pub fn slug_from_name(name: &str) -> String {
    strip_order_prefix(name).replace(' ', "_")
}

/// Display title for a file or directory stem.
///
/// The ordering prefix is dropped and underscores become spaces, so
/// `01_Getting_Started` reads as `Getting Started`.
pub fn title_from_name(name: &str) -> String {
    strip_order_prefix(name).replace('_', " ").trim().to_string()
}
