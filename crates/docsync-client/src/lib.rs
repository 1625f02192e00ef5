//! HTTP remote store for docsync
//!
//! [`ConfluenceClient`] implements [`docsync_core::RemoteStore`] on top of the
//! content REST API. One client is built per run and reused for every call.

pub mod client;
pub mod error;
mod wire;

pub use client::{ConfluenceClient, PAGE_LIMIT};
pub use error::{Error, Result};
