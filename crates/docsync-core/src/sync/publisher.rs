//! One publishing run: render, read, diff, apply

use serde::Serialize;
use tracing::info;

use docsync_render::{ContentRenderer, RenderParams};
use docsync_tree::LocalNode;

use crate::Result;
use crate::config::PublishConfig;
use crate::model::RenderedPage;
use crate::remote::{RemoteHierarchyReader, RemoteStore};
use crate::walker::TreeWalker;

use super::mutator::{ApplyReport, RemoteMutator};
use super::plan::{Plan, PlanSummary};
use super::reconcile::Reconciler;

/// Options for a publishing run
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// If true, compute and describe the plan without executing it
    pub dry_run: bool,
}

/// Report from a publishing run
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    /// Number of rendered pages
    pub pages: usize,
    /// Plan, one line per operation
    pub plan: Vec<String>,
    pub summary: PlanSummary,
    /// Execution result, absent on a dry run
    pub applied: Option<ApplyReport>,
}

impl PublishReport {
    /// Whether the remote store already matched the local tree.
    pub fn is_up_to_date(&self) -> bool {
        self.summary.page_mutations() == 0
    }
}

/// Render the whole local tree.
///
/// This is the validation pass: it never touches the remote store. The root
/// page takes the configured site title when one is set.
pub fn render_tree<R>(renderer: &R, config: &PublishConfig, tree: &LocalNode) -> Result<RenderedPage>
where
    R: ContentRenderer + ?Sized,
{
    let walker =
        TreeWalker::new(renderer, &config.confluence.prefix).with_index_file(config.index_file.clone());
    let params = RenderParams::new(config.title.clone()).with_image(config.image.clone());

    let mut root = walker.render(tree, &params)?;
    if !config.title.is_empty() {
        root.title = walker.prefixed(&config.title);
    }
    Ok(root)
}

/// Drives one publishing run.
///
/// The store is constructed once by the caller and shared by every phase.
pub struct Publisher<'a, S: ?Sized, R: ?Sized> {
    store: &'a S,
    renderer: &'a R,
    config: &'a PublishConfig,
}

impl<'a, S, R> Publisher<'a, S, R>
where
    S: RemoteStore + ?Sized,
    R: ContentRenderer + ?Sized,
{
    pub fn new(store: &'a S, renderer: &'a R, config: &'a PublishConfig) -> Self {
        Self {
            store,
            renderer,
            config,
        }
    }

    /// Render the whole local tree, see [`render_tree`].
    pub fn render(&self, tree: &LocalNode) -> Result<RenderedPage> {
        render_tree(self.renderer, self.config, tree)
    }

    /// Read the remote hierarchy and diff `rendered` against it.
    pub fn plan(&self, rendered: &RenderedPage) -> Result<Plan> {
        let ancestor_id = &self.config.confluence.ancestor_id;
        let remote = RemoteHierarchyReader::new(self.store).fetch_tree(ancestor_id)?;
        Reconciler::new(self.store).plan_publish(rendered, &remote)
    }

    /// Publish `tree`.
    ///
    /// Rendering completes before the first remote call, so a render error
    /// leaves the remote store untouched.
    pub fn publish(&self, tree: &LocalNode, options: &PublishOptions) -> Result<PublishReport> {
        info!("Generating tree");
        let rendered = self.render(tree)?;

        info!("Reading remote hierarchy below {}", self.config.confluence.ancestor_id);
        let plan = self.plan(&rendered)?;

        let mut report = PublishReport {
            pages: rendered.page_count(),
            plan: plan.describe(),
            summary: plan.summary(),
            applied: None,
        };

        if options.dry_run {
            info!("Dry run, {} steps not applied", plan.len());
            return Ok(report);
        }

        info!("Start publishing");
        report.applied = Some(RemoteMutator::new(self.store).apply(&plan)?);
        Ok(report)
    }
}
