//! Reconciliation of the rendered tree with the remote store
//!
//! This module provides:
//! - **plan**: Operation and two-phase plan types
//! - **reconcile**: Title-keyed diff producing a plan
//! - **mutator**: Ordered plan execution
//! - **publisher**: A full run from local tree to remote store

mod mutator;
mod plan;
mod publisher;
mod reconcile;

pub use mutator::{ApplyReport, RemoteMutator};
pub use plan::{Operation, OperationKind, Plan, PlanSummary, Step};
pub use publisher::{PublishOptions, PublishReport, Publisher, render_tree};
pub use reconcile::{Reconciler, expand_created};
