//! Render command: the validation pass on its own

use std::path::Path;

use colored::Colorize;

use docsync_core::{RenderedPage, render_tree};
use docsync_render::MarkdownRenderer;

use super::Session;
use crate::error::Result;

/// Run the render command
///
/// Renders the whole tree and prints the resulting page hierarchy. The
/// remote store is never contacted.
pub fn run_render(config_path: &Path, source: Option<&Path>) -> Result<()> {
    let session = Session::open(config_path, source)?;
    println!(
        "{} Rendering {}...",
        "=>".blue().bold(),
        session.source.display()
    );

    let root = render_tree(&MarkdownRenderer::new(), &session.config, &session.tree)?;

    print_page(&root, 0);
    println!();
    println!(
        "{} {} pages rendered.",
        "OK".green().bold(),
        root.page_count()
    );
    Ok(())
}

fn print_page(page: &RenderedPage, depth: usize) {
    let indent = "   ".repeat(depth);
    if page.attachments.is_empty() {
        println!("{}{} {}", indent, "-".cyan(), page.title);
    } else {
        println!(
            "{}{} {} {}",
            indent,
            "-".cyan(),
            page.title,
            format!("({} attachments)", page.attachments.len()).dimmed()
        );
    }
    for child in page.children() {
        print_page(child, depth + 1);
    }
}
