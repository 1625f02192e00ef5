//! Local documentation tree for docsync
//!
//! Loads a directory of markdown files into a [`LocalNode`] tree that the
//! publishing core walks. The tree is built once per run and never mutated
//! afterwards.

pub mod error;
pub mod loader;
pub mod node;

pub use error::{Error, Result};
pub use loader::{load_tree, slug_from_name, title_from_name};
pub use node::{Content, Directory, LocalNode};
