//! [`DocsDir`] builder for on-disk documentation sources.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary documentation source directory.
///
/// # Example
///
/// ```rust,no_run
/// use docsync_test_utils::DocsDir;
///
/// let docs = DocsDir::new()
///     .file("01_intro.md", "# Intro\n\nHello")
///     .file("02_guide/01_setup.md", "# Setup");
/// docs.assert_file_exists("02_guide/01_setup.md");
/// ```
pub struct DocsDir {
    temp_dir: TempDir,
}

impl Default for DocsDir {
    fn default() -> Self {
        Self::new()
    }
}

impl DocsDir {
    /// Create an empty source directory named `docs` inside a temp dir.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("docs")).unwrap();
        Self { temp_dir }
    }

    /// Root of the documentation source.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("docs")
    }

    /// Directory holding the source directory, where a config file may live.
    pub fn project_root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a text file relative to the source root, creating parents.
    pub fn file(self, rel: &str, content: &str) -> Self {
        self.bytes(rel, content.as_bytes())
    }

    /// Write a binary file relative to the source root, creating parents.
    pub fn bytes(self, rel: &str, content: &[u8]) -> Self {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("DocsDir: failed to create {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("DocsDir: failed to write {}: {e}", path.display()));
        self
    }

    /// Overwrite a file in place, for tests that edit between runs.
    pub fn rewrite(&self, rel: &str, content: &str) {
        fs::write(self.path().join(rel), content).unwrap();
    }

    /// Remove a file or directory below the source root.
    pub fn remove(&self, rel: &str) {
        let path = self.path().join(rel);
        if path.is_dir() {
            fs::remove_dir_all(&path).unwrap();
        } else {
            fs::remove_file(&path).unwrap();
        }
    }

    /// Write `docsync.toml` next to the source directory and return its path.
    pub fn config(&self, content: &str) -> PathBuf {
        let path = self.project_root().join("docsync.toml");
        fs::write(&path, content).unwrap();
        path
    }

    /// Assert that `rel` exists below the source root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path().join(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
