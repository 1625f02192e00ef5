//! Shared test utilities for the docsync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`store`]: [`InMemoryStore`], a remote store with a call log
//! - [`tree`]: builders for local trees and a scripted renderer
//! - [`docs`]: [`DocsDir`] builder for on-disk documentation sources

pub mod docs;
pub mod store;
pub mod tree;

pub use docs::DocsDir;
pub use store::{Call, InMemoryStore};
pub use tree::{ScriptedRenderer, content, dir};
