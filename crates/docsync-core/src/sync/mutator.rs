//! Plan execution against the remote store

use serde::Serialize;
use tracing::{debug, info};

use crate::model::PageId;
use crate::remote::RemoteStore;
use crate::{Error, Result};

use super::plan::{Operation, Plan, Step};
use super::reconcile::expand_created;

/// Report from applying a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Executed operations, in order
    pub actions: Vec<String>,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub uploaded: usize,
    /// Ids of the pages created, in creation order
    pub created_ids: Vec<PageId>,
}

impl ApplyReport {
    fn record(&mut self, operation: &Operation) {
        match operation {
            Operation::Create { .. } => self.created += 1,
            Operation::Update { .. } => self.updated += 1,
            Operation::Delete { .. } => self.deleted += 1,
            Operation::UploadAttachment { .. } => self.uploaded += 1,
        }
        self.actions.push(operation.to_string());
    }

    /// Whether nothing was executed.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Executes plans step by step.
///
/// Steps run strictly in order and the first failure aborts the rest.
/// Nothing is retried and nothing already applied is rolled back.
pub struct RemoteMutator<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RemoteStore + ?Sized> RemoteMutator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Execute `plan`, expanding deferred subtrees as their pages are created.
    pub fn apply(&self, plan: &Plan) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        self.apply_plan(plan, &mut report)?;
        info!(
            "Applied plan: {} created, {} updated, {} deleted, {} attachments",
            report.created, report.updated, report.deleted, report.uploaded
        );
        Ok(report)
    }

    fn apply_plan(&self, plan: &Plan, report: &mut ApplyReport) -> Result<()> {
        for step in plan.steps() {
            match step {
                Step::Run(operation) => {
                    if let Some(page_id) = self.execute(operation)? {
                        report.created_ids.push(page_id);
                    }
                    report.record(operation);
                }
                Step::Expand { parent_id, page } => {
                    let page_id = self.create(parent_id, &page.title, &page.body)?;
                    report.created_ids.push(page_id.clone());
                    report.record(&step.operation());
                    self.apply_plan(&expand_created(page, &page_id), report)?;
                }
            }
        }
        Ok(())
    }

    fn create(&self, parent_id: &PageId, title: &str, body: &str) -> Result<PageId> {
        let page_id = self.store.create_page(parent_id, title, body)?;
        debug!("Created \"{}\" as {} under {}", title, page_id, parent_id);
        Ok(page_id)
    }

    /// Run one operation, returning the id of the page it created, if any.
    fn execute(&self, operation: &Operation) -> Result<Option<PageId>> {
        debug!("Executing: {}", operation);
        match operation {
            Operation::Create {
                parent_id,
                title,
                body,
            } => return self.create(parent_id, title, body).map(Some),
            Operation::Update {
                page_id,
                parent_id,
                version,
                title,
                body,
            } => {
                self.store
                    .update_page(parent_id, page_id, *version, title, body)?;
            }
            Operation::Delete { page_id, .. } => {
                self.store.delete_page(page_id)?;
            }
            Operation::UploadAttachment {
                page_id,
                filename,
                source,
                existing,
            } => {
                let bytes = source.read().map_err(|e| Error::Attachment {
                    filename: filename.clone(),
                    source: e,
                })?;
                self.store
                    .upload_attachment(page_id, filename, &bytes, existing.as_deref())?;
            }
        }
        Ok(None)
    }
}
