//! Diff of the rendered tree against the remote tree
//!
//! Pages are matched by title at every level, since the local tree has no
//! durable identifiers.

use tracing::debug;

use crate::Result;
use crate::model::{PageId, RemotePage, RenderedPage};
use crate::remote::RemoteStore;

use super::plan::{Operation, Plan, Step};

/// Produces mutation plans.
///
/// The store is only read, to find out which attachments already exist on
/// pages that exist remotely.
pub struct Reconciler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RemoteStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Plan publishing `root` as a child of `ancestor`.
    ///
    /// `root` is matched by title among the ancestor's children and created
    /// or updated. Other children of the ancestor are left alone.
    pub fn plan_publish(&self, root: &RenderedPage, ancestor: &RemotePage) -> Result<Plan> {
        let mut plan = Plan::new();
        self.plan_page(root, ancestor.children.get(&root.title), &ancestor.id, &mut plan)?;
        debug!("Planned {} steps for \"{}\"", plan.len(), root.title);
        Ok(plan)
    }

    /// Diff the children of `local` against the children of `remote`.
    ///
    /// `remote.id` is the parent context for every operation at this level.
    /// Matched pages are updated when title or body differ, unmatched local
    /// pages are created with their subtree deferred, and remote pages
    /// without a local counterpart are deleted.
    pub fn diff(&self, local: &RenderedPage, remote: &RemotePage) -> Result<Plan> {
        let mut plan = Plan::new();
        self.diff_level(local, remote, &mut plan)?;
        Ok(plan)
    }

    fn diff_level(&self, local: &RenderedPage, remote: &RemotePage, plan: &mut Plan) -> Result<()> {
        for child in local.children() {
            self.plan_page(child, remote.children.get(&child.title), &remote.id, plan)?;
        }

        for (title, orphan) in &remote.children {
            if local.child(title).is_none() {
                plan.push(Operation::Delete {
                    page_id: orphan.id.clone(),
                    title: title.clone(),
                });
            }
        }

        Ok(())
    }

    fn plan_page(
        &self,
        local: &RenderedPage,
        matched: Option<&RemotePage>,
        parent_id: &PageId,
        plan: &mut Plan,
    ) -> Result<()> {
        let Some(remote) = matched else {
            plan.push_step(Step::Expand {
                parent_id: parent_id.clone(),
                page: local.clone(),
            });
            return Ok(());
        };

        if remote.body != local.body || remote.title != local.title {
            plan.push(Operation::Update {
                page_id: remote.id.clone(),
                parent_id: parent_id.clone(),
                version: remote.version + 1,
                title: local.title.clone(),
                body: local.body.clone(),
            });
        }

        for attachment in &local.attachments {
            let existing = self
                .store
                .list_attachments(&remote.id, &attachment.filename)?
                .into_iter()
                .next()
                .map(|found| found.id);
            plan.push(Operation::UploadAttachment {
                page_id: remote.id.clone(),
                filename: attachment.filename.clone(),
                source: attachment.source.clone(),
                existing,
            });
        }

        self.diff_level(local, remote, plan)
    }
}

/// Materialize the plan for a page that was just created as `page_id`.
///
/// A fresh page has no attachments and no children remotely, so every
/// attachment is a new upload and every child a deferred create.
pub fn expand_created(page: &RenderedPage, page_id: &PageId) -> Plan {
    let mut plan = Plan::new();
    for attachment in &page.attachments {
        plan.push(Operation::UploadAttachment {
            page_id: page_id.clone(),
            filename: attachment.filename.clone(),
            source: attachment.source.clone(),
            existing: None,
        });
    }
    for child in page.children() {
        plan.push_step(Step::Expand {
            parent_id: page_id.clone(),
            page: child.clone(),
        });
    }
    plan
}
