//! Publish command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;

use docsync_client::ConfluenceClient;
use docsync_core::{PublishOptions, PublishReport, Publisher};
use docsync_render::MarkdownRenderer;

use super::Session;
use crate::error::Result;

/// Arguments of the publish command
#[derive(Debug, Clone, Default)]
pub struct PublishArgs {
    pub source: Option<PathBuf>,
    pub dry_run: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
}

/// Run the publish command
///
/// Renders the tree, reads the remote hierarchy below the configured
/// ancestor, and applies the resulting plan unless `dry_run` is set.
pub fn run_publish(config_path: &Path, args: &PublishArgs) -> Result<()> {
    let mut session = Session::open(config_path, args.source.as_deref())?;

    let settings = &mut session.config.confluence;
    if let Some(user) = &args.user {
        settings.user = user.clone();
    }
    if let Some(password) = &args.password {
        settings.pass = password.clone();
    }
    if settings.user.is_empty() {
        tracing::warn!("No user configured, requests are sent without credentials");
    }

    if !args.json {
        println!(
            "{} Publishing {} under page {}...",
            "=>".blue().bold(),
            session.source.display(),
            session.config.confluence.ancestor_id.to_string().cyan()
        );
    }

    let client = ConfluenceClient::new(&session.config.confluence)?;
    let renderer = MarkdownRenderer::new();
    let publisher = Publisher::new(&client, &renderer, &session.config);
    let options = PublishOptions {
        dry_run: args.dry_run,
    };
    let report = publisher.publish(&session.tree, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_report(&report, args.dry_run);
    Ok(())
}

fn print_report(report: &PublishReport, dry_run: bool) {
    for line in report_lines(report, dry_run) {
        println!("{}", line);
    }
}

fn report_lines(report: &PublishReport, dry_run: bool) -> Vec<String> {
    let summary = report.summary;
    if report.is_up_to_date() {
        let mut line = format!("{} Remote pages are up to date.", "OK".green().bold());
        if summary.uploads > 0 {
            let verb = if dry_run { "to refresh" } else { "refreshed" };
            line.push_str(&format!(" ({} attachments {})", summary.uploads, verb));
        }
        return vec![line];
    }

    let header = if dry_run { "Planned changes:" } else { "Applied changes:" };
    let mut lines = vec![format!("{} {}", "PLAN".yellow().bold(), header)];
    for line in &report.plan {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];
        let marker = match trimmed.split_whitespace().next() {
            Some("create") => "+".green(),
            Some("update") => "~".yellow(),
            Some("delete") => "-".red(),
            _ => "*".cyan(),
        };
        lines.push(format!("   {}{} {}", indent, marker, trimmed));
    }
    lines.push(String::new());
    lines.push(format!(
        "{} created, {} updated, {} deleted, {} attachments ({} pages in tree)",
        summary.creates, summary.updates, summary.deletes, summary.uploads, report.pages
    ));

    if dry_run {
        lines.push(format!("Run {} to apply.", "docsync publish".cyan()));
    } else if report.applied.is_some() {
        lines.push(format!("{} Publishing complete.", "OK".green().bold()));
    }
    lines
}
