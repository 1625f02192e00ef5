//! Full publish cycles: markdown on disk, through the real renderer, into the
//! in-memory remote store.
//!
//! Each scenario publishes, changes something on one side, and publishes
//! again, checking what the store ends up holding and which calls it saw.

use docsync_core::{Error, PublishConfig, PublishOptions, PublishReport, Publisher};
use docsync_render::MarkdownRenderer;
use docsync_test_utils::{Call, DocsDir, InMemoryStore};
use docsync_tree::load_tree;
use pretty_assertions::assert_eq;

const CONFIG: &str = r#"
title = "Handbook"
image = "<base_url>img/logo.png"

[confluence]
base_url = "https://wiki.example.com/"
space_id = "DOC"
ancestor_id = "1"
prefix = "HB"
"#;

fn handbook() -> DocsDir {
    DocsDir::new()
        .file("index.md", "# Welcome\n\n[Setup](<base_url>Guide/Setup.html)")
        .file("01_Intro.md", "Intro text.\n\n![Logo](img/logo.png)")
        .bytes("img/logo.png", b"\x89PNG-logo")
        .file("02_Guide/index.md", "Guide overview.")
        .file("02_Guide/01_Setup.md", "Install it.\n\n![Logo](<base_url>img/logo.png)")
        .file("02_Guide/02_Usage.md", "- one\n- two")
}

fn publish(docs: &DocsDir, store: &InMemoryStore) -> docsync_core::Result<PublishReport> {
    publish_with(docs, store, &PublishOptions::default())
}

fn publish_with(
    docs: &DocsDir,
    store: &InMemoryStore,
    options: &PublishOptions,
) -> docsync_core::Result<PublishReport> {
    let config = PublishConfig::parse(CONFIG)?;
    let tree = load_tree(&docs.path())?;
    let renderer = MarkdownRenderer::new();
    Publisher::new(store, &renderer, &config).publish(&tree, options)
}

// ============================================================================
// First publish
// ============================================================================

#[test]
fn test_first_publish_builds_hierarchy() {
    let docs = handbook();
    let store = InMemoryStore::new();

    let report = publish(&docs, &store).unwrap();

    assert_eq!(report.pages, 5);
    assert_eq!(
        store.outline(&store.root_id()),
        vec![
            "HB Handbook",
            "  HB Guide",
            "    HB Setup",
            "    HB Usage",
            "  HB Intro",
        ]
    );
    let root = store.page(&store.find(&["HB Handbook"]).unwrap()).unwrap();
    assert_eq!(
        root.body,
        "<h1>Welcome</h1>\n<p><a href=\"Guide/Setup.html\">Setup</a></p>"
    );
    let guide = store.page(&store.find(&["HB Handbook", "HB Guide"]).unwrap()).unwrap();
    assert_eq!(guide.body, "<p>Guide overview.</p>");
}

#[test]
fn test_first_publish_uploads_images_to_their_pages() {
    let docs = handbook();
    let store = InMemoryStore::new();

    publish(&docs, &store).unwrap();

    let intro = store.find(&["HB Handbook", "HB Intro"]).unwrap();
    let setup = store.find(&["HB Handbook", "HB Guide", "HB Setup"]).unwrap();
    for page in [&intro, &setup] {
        let attachments = store.attachments(page);
        assert_eq!(attachments.len(), 1, "page {page}");
        assert_eq!(attachments[0].filename, "logo.png");
        assert_eq!(attachments[0].bytes, b"\x89PNG-logo".to_vec());
    }
    assert!(store.page(&setup).unwrap().body.contains("ri:filename=\"logo.png\""));
}

#[test]
fn test_first_publish_creates_parents_first() {
    let docs = handbook();
    let store = InMemoryStore::new();

    publish(&docs, &store).unwrap();

    let created: Vec<_> = store
        .write_calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::CreatePage { parent_id, title } => Some((parent_id, title)),
            _ => None,
        })
        .collect();
    let titles: Vec<_> = created.iter().map(|(_, title)| title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["HB Handbook", "HB Intro", "HB Guide", "HB Setup", "HB Usage"]
    );

    let root = store.find(&["HB Handbook"]).unwrap();
    let guide = store.find(&["HB Handbook", "HB Guide"]).unwrap();
    assert_eq!(created[0].0, store.root_id());
    assert_eq!(created[2].0, root);
    assert_eq!(created[3].0, guide);
}

// ============================================================================
// Republish
// ============================================================================

#[test]
fn test_republish_without_changes_touches_no_pages() {
    let docs = handbook();
    let store = InMemoryStore::new();
    publish(&docs, &store).unwrap();
    store.clear_calls();

    let report = publish(&docs, &store).unwrap();

    assert!(report.is_up_to_date(), "plan: {:?}", report.plan);
    let page_writes: Vec<_> = store
        .write_calls()
        .into_iter()
        .filter(|c| !matches!(c, Call::UploadAttachment { .. }))
        .collect();
    assert!(page_writes.is_empty(), "unexpected writes: {page_writes:?}");
}

#[test]
fn test_republish_replaces_existing_attachments() {
    let docs = handbook();
    let store = InMemoryStore::new();
    publish(&docs, &store).unwrap();
    let intro = store.find(&["HB Handbook", "HB Intro"]).unwrap();
    let attachment_id = store.attachments(&intro)[0].id.clone();
    docs.rewrite("img/logo.png", "new-logo");
    store.clear_calls();

    publish(&docs, &store).unwrap();

    assert!(store.write_calls().contains(&Call::UploadAttachment {
        page_id: intro.clone(),
        filename: "logo.png".to_string(),
        existing_id: Some(attachment_id),
    }));
    let attachments = store.attachments(&intro);
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].bytes, b"new-logo".to_vec());
}

#[test]
fn test_edit_updates_only_that_page() {
    let docs = handbook();
    let store = InMemoryStore::new();
    publish(&docs, &store).unwrap();
    let usage = store.find(&["HB Handbook", "HB Guide", "HB Usage"]).unwrap();
    docs.rewrite("02_Guide/02_Usage.md", "1. first\n2. second");
    store.clear_calls();

    let report = publish(&docs, &store).unwrap();

    assert_eq!(
        (report.summary.creates, report.summary.updates, report.summary.deletes),
        (0, 1, 0)
    );
    let page = store.page(&usage).unwrap();
    assert_eq!(page.version, 2);
    assert_eq!(page.body, "<ol><li>first</li><li>second</li></ol>");
    assert!(store.write_calls().contains(&Call::UpdatePage {
        page_id: usage,
        version: 2,
    }));
}

#[test]
fn test_versions_advance_by_one_per_publish() {
    let docs = handbook();
    let store = InMemoryStore::new();
    publish(&docs, &store).unwrap();
    let intro = store.find(&["HB Handbook", "HB Intro"]).unwrap();

    for round in 2..=4u64 {
        docs.rewrite("01_Intro.md", &format!("Round {round}."));
        publish(&docs, &store).unwrap();
        assert_eq!(store.page(&intro).unwrap().version, round);
    }
}

#[test]
fn test_removed_file_deletes_remote_page() {
    let docs = handbook();
    let store = InMemoryStore::new();
    publish(&docs, &store).unwrap();
    docs.remove("02_Guide");

    let report = publish(&docs, &store).unwrap();

    assert_eq!(report.summary.deletes, 1);
    assert_eq!(
        store.outline(&store.root_id()),
        vec!["HB Handbook", "  HB Intro"]
    );
}

#[test]
fn test_pages_edited_remotely_are_overwritten() {
    let docs = handbook();
    let store = InMemoryStore::new();
    publish(&docs, &store).unwrap();
    let guide = store.find(&["HB Handbook", "HB Guide"]).unwrap();
    store.seed_page(&guide, "Added by hand", "<p>manual</p>");
    let intro = store.find(&["HB Handbook", "HB Intro"]).unwrap();
    store.bump_version(&intro);

    publish(&docs, &store).unwrap();

    assert_eq!(store.child_titles(&guide), vec!["HB Setup", "HB Usage"]);
    // version moved but the body still matches, so nothing to update
    assert_eq!(store.page(&intro).unwrap().version, 2);
}

#[test]
fn test_other_ancestor_children_survive() {
    let docs = handbook();
    let store = InMemoryStore::new();
    let other = store.seed_page(&store.root_id(), "Team notes", "");

    publish(&docs, &store).unwrap();

    assert!(store.page(&other).is_some());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_broken_page_aborts_before_any_call() {
    let docs = handbook().file("02_Guide/03_Broken.md", "```\nunterminated");
    let store = InMemoryStore::new();

    let err = publish(&docs, &store).unwrap_err();

    assert!(matches!(err, Error::Render { .. }), "got {err:?}");
    assert!(store.calls().is_empty());
}

#[test]
fn test_annotated_code_fences_publish() {
    let docs = handbook().file(
        "03_Examples.md",
        "```rust,ignore\nfn main() {}\n```\n\n```js title=\"a.js\"\nlet x;\n````",
    );
    let store = InMemoryStore::new();

    publish(&docs, &store).unwrap();

    let examples = store.find(&["HB Handbook", "HB Examples"]).unwrap();
    let body = store.page(&examples).unwrap().body;
    assert!(body.contains("<ac:parameter ac:name=\"language\">rust</ac:parameter>"));
    assert!(body.contains("<![CDATA[let x;]]>"));
}

#[test]
fn test_missing_image_aborts_before_any_call() {
    let docs = handbook().file("04_Gallery.md", "![gone](img/missing.png)");
    let store = InMemoryStore::new();

    let err = publish(&docs, &store).unwrap_err();

    assert!(err.to_string().contains("image not found"), "got: {err}");
    assert!(store.calls().is_empty());
}

#[test]
fn test_server_failure_leaves_partial_tree() {
    let docs = handbook();
    let store = InMemoryStore::new();
    store.fail_create_of("HB Guide");

    let err = publish(&docs, &store).unwrap_err();

    assert!(matches!(err, Error::Server { status: 500, .. }));
    assert!(err.to_string().starts_with("Server error response [url] memory://"));
    let root = store.find(&["HB Handbook"]).unwrap();
    assert_eq!(store.child_titles(&root), vec!["HB Intro"]);
}

#[test]
fn test_dry_run_then_publish() {
    let docs = handbook();
    let store = InMemoryStore::new();

    let dry = publish_with(&docs, &store, &PublishOptions { dry_run: true }).unwrap();
    assert_eq!(store.page_count(), 1);

    let real = publish(&docs, &store).unwrap();
    assert_eq!(dry.plan, real.plan);
    assert_eq!(store.page_count(), 6);
}
