//! Tests for executing plans against a store

use docsync_core::{
    Error, Operation, Plan, Reconciler, RemoteHierarchyReader, RemoteMutator, RenderedPage,
    Step,
};
use docsync_render::{Attachment, AttachmentSource};
use docsync_test_utils::{Call, InMemoryStore};
use pretty_assertions::assert_eq;

fn plan_for(store: &InMemoryStore, local: &RenderedPage) -> Plan {
    let remote = RemoteHierarchyReader::new(store)
        .fetch_tree(&store.root_id())
        .unwrap();
    Reconciler::new(store).diff(local, &remote).unwrap()
}

#[test]
fn test_apply_creates_parent_before_child() {
    let store = InMemoryStore::new();
    let mut plan = Plan::new();
    plan.push_step(Step::Expand {
        parent_id: store.root_id(),
        page: RenderedPage::new("X", "<p>x</p>").with_child(RenderedPage::new("Y", "<p>y</p>")),
    });

    let report = RemoteMutator::new(&store).apply(&plan).unwrap();

    let x = store.find(&["X"]).unwrap();
    assert_eq!(
        store.write_calls(),
        vec![
            Call::CreatePage {
                parent_id: store.root_id(),
                title: "X".to_string(),
            },
            Call::CreatePage {
                parent_id: x.clone(),
                title: "Y".to_string(),
            },
        ]
    );
    assert_eq!(report.created, 2);
    assert_eq!(store.page(&store.find(&["X", "Y"]).unwrap()).unwrap().parent, Some(x));
}

#[test]
fn test_apply_uploads_to_new_page_before_children() {
    let store = InMemoryStore::new();
    let mut plan = Plan::new();
    plan.push_step(Step::Expand {
        parent_id: store.root_id(),
        page: RenderedPage::new("X", "")
            .with_attachment(Attachment::bytes("a.png", b"a".to_vec()))
            .with_child(RenderedPage::new("Y", "")),
    });

    let report = RemoteMutator::new(&store).apply(&plan).unwrap();

    let x = store.find(&["X"]).unwrap();
    let writes = store.write_calls();
    assert_eq!(writes.len(), 3);
    assert_eq!(
        writes[1],
        Call::UploadAttachment {
            page_id: x.clone(),
            filename: "a.png".to_string(),
            existing_id: None,
        }
    );
    assert_eq!(store.attachments(&x)[0].bytes, b"a".to_vec());
    assert_eq!(report.uploaded, 1);
    assert_eq!(report.actions.len(), 3);
}

#[test]
fn test_apply_stops_at_first_failure() {
    let store = InMemoryStore::new();
    store.fail_create_of("B");
    let mut plan = Plan::new();
    for title in ["A", "B", "C"] {
        plan.push(Operation::Create {
            parent_id: store.root_id(),
            title: title.to_string(),
            body: String::new(),
        });
    }

    let err = RemoteMutator::new(&store).apply(&plan).unwrap_err();

    assert!(matches!(err, Error::Server { status: 500, .. }));
    assert_eq!(store.child_titles(&store.root_id()), vec!["A"]);
    assert_eq!(store.write_calls().len(), 2);
}

#[test]
fn test_apply_failure_inside_new_subtree_keeps_earlier_creates() {
    let store = InMemoryStore::new();
    store.fail_create_of("Y");
    let mut plan = Plan::new();
    plan.push_step(Step::Expand {
        parent_id: store.root_id(),
        page: RenderedPage::new("X", "")
            .with_child(RenderedPage::new("Y", ""))
            .with_child(RenderedPage::new("Z", "")),
    });

    assert!(RemoteMutator::new(&store).apply(&plan).is_err());

    let x = store.find(&["X"]).unwrap();
    assert!(store.child_titles(&x).is_empty());
}

#[test]
fn test_apply_stale_version_is_rejected() {
    let store = InMemoryStore::new();
    let a = store.seed_page(&store.root_id(), "A", "<p>v1</p>");
    let plan = plan_for(
        &store,
        &RenderedPage::new("", "").with_child(RenderedPage::new("A", "<p>v2</p>")),
    );
    // someone else edits between planning and applying
    store.bump_version(&a);

    let err = RemoteMutator::new(&store).apply(&plan).unwrap_err();

    assert!(matches!(err, Error::Client { status: 409, .. }));
    assert!(err.to_string().contains("Version must be incremented"), "got: {err}");
    assert_eq!(store.page(&a).unwrap().body, "<p>v1</p>");
}

#[test]
fn test_apply_update_delete_and_replace() {
    let store = InMemoryStore::new();
    let root = store.root_id();
    let a = store.seed_page(&root, "A", "<p>v1</p>");
    let b = store.seed_page(&root, "B", "");
    store.seed_attachment(&a, "pic.png", b"old");
    let local = RenderedPage::new("", "").with_child(
        RenderedPage::new("A", "<p>v2</p>")
            .with_attachment(Attachment::bytes("pic.png", b"new".to_vec())),
    );
    let plan = plan_for(&store, &local);

    let report = RemoteMutator::new(&store).apply(&plan).unwrap();

    let page = store.page(&a).unwrap();
    assert_eq!(page.version, 2);
    assert_eq!(page.body, "<p>v2</p>");
    assert!(store.page(&b).is_none());
    let attachments = store.attachments(&a);
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].bytes, b"new".to_vec());
    assert_eq!((report.updated, report.deleted, report.uploaded), (1, 1, 1));
}

#[test]
fn test_apply_unreadable_attachment() {
    let store = InMemoryStore::new();
    let a = store.seed_page(&store.root_id(), "A", "");
    let mut plan = Plan::new();
    plan.push(Operation::UploadAttachment {
        page_id: a,
        filename: "gone.png".to_string(),
        source: AttachmentSource::File("/definitely/not/here.png".into()),
        existing: None,
    });

    let err = RemoteMutator::new(&store).apply(&plan).unwrap_err();

    assert!(matches!(err, Error::Attachment { ref filename, .. } if filename == "gone.png"));
    assert!(store.write_calls().is_empty());
}

#[test]
fn test_apply_empty_plan() {
    let store = InMemoryStore::new();

    let report = RemoteMutator::new(&store).apply(&Plan::new()).unwrap();

    assert!(report.is_empty());
    assert!(store.calls().is_empty());
}

#[test]
fn test_apply_reports_created_page_ids() {
    let store = InMemoryStore::new();
    let mut plan = Plan::new();
    plan.push(Operation::Create {
        parent_id: store.root_id(),
        title: "Single".to_string(),
        body: "<p>s</p>".to_string(),
    });
    plan.push_step(Step::Expand {
        parent_id: store.root_id(),
        page: RenderedPage::new("X", "").with_child(RenderedPage::new("Y", "")),
    });

    let report = RemoteMutator::new(&store).apply(&plan).unwrap();

    assert_eq!(
        report.created_ids,
        vec![
            store.find(&["Single"]).unwrap(),
            store.find(&["X"]).unwrap(),
            store.find(&["X", "Y"]).unwrap(),
        ]
    );
    assert_eq!(report.created, 3);
}
