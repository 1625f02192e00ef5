//! Mutation plan types
//!
//! A [`Plan`] is a two-phase structure. Operations whose targets already
//! exist remotely are listed directly; a page that must be created carries
//! its whole rendered subtree in a [`Step::Expand`], which is turned into
//! concrete operations only after the create call returns the new page id.

use std::fmt;

use serde::Serialize;

use docsync_render::AttachmentSource;

use crate::model::{PageId, RenderedPage};

/// A single remote mutation, carrying everything needed to execute it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a single page. Its subtree is planned only through
    /// [`Step::Expand`], which knows the new id once the create returns.
    Create {
        parent_id: PageId,
        title: String,
        body: String,
    },
    Update {
        page_id: PageId,
        parent_id: PageId,
        /// Remote version + 1, computed when the plan was made
        version: u64,
        title: String,
        body: String,
    },
    Delete {
        page_id: PageId,
        /// Remote title, for reporting only
        title: String,
    },
    UploadAttachment {
        page_id: PageId,
        filename: String,
        source: AttachmentSource,
        /// Id of the attachment already stored under this file name
        existing: Option<String>,
    },
}

impl Operation {
    /// Whether an `UploadAttachment` replaces an existing attachment.
    pub fn exists(&self) -> bool {
        matches!(
            self,
            Operation::UploadAttachment {
                existing: Some(_),
                ..
            }
        )
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Create { .. } => OperationKind::Create,
            Operation::Update { .. } => OperationKind::Update,
            Operation::Delete { .. } => OperationKind::Delete,
            Operation::UploadAttachment { .. } => OperationKind::UploadAttachment,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create {
                parent_id, title, ..
            } => write!(f, "create \"{}\" under {}", title, parent_id),
            Operation::Update {
                page_id,
                version,
                title,
                ..
            } => write!(f, "update \"{}\" ({}) to version {}", title, page_id, version),
            Operation::Delete { page_id, title } => {
                write!(f, "delete \"{}\" ({})", title, page_id)
            }
            Operation::UploadAttachment {
                page_id,
                filename,
                existing,
                ..
            } => match existing {
                Some(id) => write!(f, "replace attachment {} ({}) on {}", filename, id, page_id),
                None => write!(f, "upload attachment {} to {}", filename, page_id),
            },
        }
    }
}

/// Operation discriminant, used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    Create,
    Update,
    Delete,
    UploadAttachment,
}

/// One entry of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Execute an operation whose targets all exist
    Run(Operation),
    /// Create `page` under `parent_id`, then plan its subtree under the
    /// returned id
    Expand { parent_id: PageId, page: RenderedPage },
}

impl Step {
    /// The operation executed first for this step.
    pub fn operation(&self) -> Operation {
        match self {
            Step::Run(operation) => operation.clone(),
            Step::Expand { parent_id, page } => Operation::Create {
                parent_id: parent_id.clone(),
                title: page.title.clone(),
                body: page.body.clone(),
            },
        }
    }
}

/// Ordered mutation plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: Operation) {
        self.steps.push(Step::Run(operation));
    }

    pub fn push_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Operations executed first by each step, in order.
    ///
    /// Deferred subtrees contribute only their create operation.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.steps.iter().map(Step::operation)
    }

    /// Count what executing the plan will do, deferred subtrees included.
    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for step in &self.steps {
            match step {
                Step::Run(operation) => summary.count(operation.kind(), 1),
                Step::Expand { page, .. } => summary.count_new_subtree(page),
            }
        }
        summary
    }

    /// Human readable plan, one line per operation.
    ///
    /// Deferred subtrees are listed with indentation under their create.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for step in &self.steps {
            match step {
                Step::Run(operation) => lines.push(operation.to_string()),
                Step::Expand { page, .. } => {
                    lines.push(step.operation().to_string());
                    describe_new_subtree(page, 1, &mut lines);
                }
            }
        }
        lines
    }
}

fn describe_new_subtree(page: &RenderedPage, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for attachment in &page.attachments {
        lines.push(format!(
            "{}upload attachment {} to \"{}\"",
            indent, attachment.filename, page.title
        ));
    }
    for child in page.children() {
        lines.push(format!("{}create \"{}\" under \"{}\"", indent, child.title, page.title));
        describe_new_subtree(child, depth + 1, lines);
    }
}

/// Operation counts of a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub creates: usize,
    pub updates: usize,
    pub deletes: usize,
    pub uploads: usize,
}

impl PlanSummary {
    fn count(&mut self, kind: OperationKind, n: usize) {
        match kind {
            OperationKind::Create => self.creates += n,
            OperationKind::Update => self.updates += n,
            OperationKind::Delete => self.deletes += n,
            OperationKind::UploadAttachment => self.uploads += n,
        }
    }

    fn count_new_subtree(&mut self, page: &RenderedPage) {
        self.creates += 1;
        self.uploads += page.attachments.len();
        for child in page.children() {
            self.count_new_subtree(child);
        }
    }

    /// Number of page level mutations (create, update, delete).
    pub fn page_mutations(&self) -> usize {
        self.creates + self.updates + self.deletes
    }
}
