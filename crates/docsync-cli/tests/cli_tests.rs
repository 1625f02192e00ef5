//! Integration tests for the docsync CLI binary.
//!
//! These tests exercise the compiled binary using assert_cmd. None of them
//! needs a reachable wiki.

use assert_cmd::Command;
use docsync_test_utils::DocsDir;
use predicates::prelude::*;

/// Get a Command for the docsync binary
fn docsync_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docsync"));
    cmd.env_remove("RUST_LOG")
        .env_remove("DOCSYNC_USER")
        .env_remove("DOCSYNC_PASSWORD");
    cmd
}

fn config(base_url: &str) -> String {
    format!(
        r#"title = "Handbook"
source = "docs"

[confluence]
base_url = "{base_url}"
space_id = "DOC"
ancestor_id = 1
timeout_secs = 2
"#
    )
}

fn sample_docs() -> DocsDir {
    DocsDir::new()
        .file("01_Intro.md", "# Intro\n\nWelcome.")
        .file("02_Guide/01_Setup.md", "Run `make`.")
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    docsync_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn test_missing_command_fails() {
    docsync_cmd().assert().failure();
}

// ============================================================================
// Render
// ============================================================================

#[test]
fn test_render_prints_page_tree() {
    let docs = sample_docs();
    docs.config(&config("https://wiki.example.com/"));

    docsync_cmd()
        .current_dir(docs.project_root())
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains("Handbook"))
        .stdout(predicate::str::contains("Intro"))
        .stdout(predicate::str::contains("Guide"))
        .stdout(predicate::str::contains("Setup"))
        .stdout(predicate::str::contains("4 pages rendered"));
}

#[test]
fn test_render_with_explicit_config_and_source() {
    let docs = sample_docs();
    let config_path = docs.config(&config("https://wiki.example.com/"));
    let elsewhere = tempfile::tempdir().unwrap();

    docsync_cmd()
        .current_dir(elsewhere.path())
        .arg("--config")
        .arg(&config_path)
        .arg("render")
        .arg("--source")
        .arg(docs.path().join("02_Guide"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Setup"))
        .stdout(predicate::str::contains("Intro").not());
}

#[test]
fn test_render_missing_config() {
    let docs = sample_docs();

    docsync_cmd()
        .current_dir(docs.project_root())
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
}

#[test]
fn test_render_reports_malformed_page() {
    let docs = sample_docs().file("03_Broken.md", "text\n\n```rust\nfn main() {}\n");
    docs.config(&config("https://wiki.example.com/"));

    docsync_cmd()
        .current_dir(docs.project_root())
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unterminated code fence"))
        .stderr(predicate::str::contains("03_Broken.md"));
}

#[test]
fn test_render_empty_source() {
    let docs = DocsDir::new().file("notes.txt", "not markdown");
    docs.config(&config("https://wiki.example.com/"));

    docsync_cmd()
        .current_dir(docs.project_root())
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No markdown files found"));
}

// ============================================================================
// Publish
// ============================================================================

#[test]
fn test_publish_rejects_bad_base_url() {
    let docs = sample_docs();
    docs.config(&config("ftp://wiki.example.com/"));

    docsync_cmd()
        .current_dir(docs.project_root())
        .arg("publish")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid base URL"));
}

#[test]
fn test_publish_render_error_precedes_network() {
    let docs = sample_docs().file("03_Broken.md", "```\nopen");
    // unreachable host: a render failure must be reported before any request
    docs.config(&config("http://127.0.0.1:9/"));

    docsync_cmd()
        .current_dir(docs.project_root())
        .args(["publish", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unterminated code fence"));
}

#[test]
fn test_publish_unreachable_store() {
    let docs = sample_docs();
    docs.config(&config("http://127.0.0.1:9/"));

    docsync_cmd()
        .current_dir(docs.project_root())
        .args(["publish", "--dry-run", "--user", "bot", "--password", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsuccessful response [url] http://127.0.0.1:9/rest/api/content/1/child/page"))
        .stderr(predicate::str::contains("secret").not());
}
