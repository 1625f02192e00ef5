//! Synchronization engine for docsync
//!
//! Publishes a local documentation tree to a hierarchical remote content
//! store. A run goes through four phases:
//!
//! - **Walk**: render every local node into a [`RenderedPage`] tree
//! - **Read**: fetch the existing remote hierarchy as a [`RemotePage`] tree
//! - **Reconcile**: diff both trees by title into an ordered [`Plan`]
//! - **Mutate**: execute the plan, parents before children
//!
//! ```text
//!            docsync-cli
//!                 |
//!           docsync-core  <---  docsync-client (RemoteStore over HTTP)
//!             /       \
//!   docsync-tree   docsync-render
//! ```
//!
//! # Example
//!
//! ```ignore
//! use docsync_core::{Publisher, PublishOptions};
//!
//! let publisher = Publisher::new(&client, &renderer, &config);
//! let report = publisher.publish(&tree, &PublishOptions::default())?;
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod remote;
pub mod sync;
pub mod walker;

pub use config::PublishConfig;
pub use error::{BoxError, Error, Result};
pub use model::{PageId, RemotePage, RenderedPage};
pub use remote::{
    AttachmentSummary, PageSummary, RemoteHierarchyReader, RemoteStore, TransportFailure,
    translate,
};
pub use sync::{
    ApplyReport, Operation, OperationKind, Plan, PlanSummary, PublishOptions, PublishReport,
    Publisher, Reconciler, RemoteMutator, Step, render_tree,
};
pub use walker::TreeWalker;
