//! JSON shapes of the content REST API

use serde::{Deserialize, Serialize};

use docsync_core::{AttachmentSummary, PageId, PageSummary};

/// One page of `content/{id}/child/page` results
#[derive(Debug, Deserialize)]
pub struct ContentList {
    #[serde(default)]
    pub results: Vec<ContentResult>,
}

#[derive(Debug, Deserialize)]
pub struct ContentResult {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub version: Option<VersionInfo>,
    #[serde(default)]
    pub body: Option<BodyInfo>,
}

#[derive(Debug, Deserialize)]
pub struct VersionInfo {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub struct BodyInfo {
    pub storage: StorageInfo,
}

#[derive(Debug, Deserialize)]
pub struct StorageInfo {
    #[serde(default)]
    pub value: String,
}

impl From<ContentResult> for PageSummary {
    fn from(result: ContentResult) -> Self {
        PageSummary {
            id: PageId::new(result.id),
            title: result.title,
            version: result.version.map_or(1, |v| v.number),
            body: result.body.map(|b| b.storage.value).unwrap_or_default(),
        }
    }
}

/// Response of `POST content`
#[derive(Debug, Deserialize)]
pub struct Created {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentList {
    #[serde(default)]
    pub results: Vec<AttachmentResult>,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentResult {
    pub id: String,
}

impl From<AttachmentResult> for AttachmentSummary {
    fn from(result: AttachmentResult) -> Self {
        AttachmentSummary { id: result.id }
    }
}

/// Request body of `POST content` and `PUT content/{id}`
#[derive(Debug, Serialize)]
pub struct PageWrite<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub space: SpaceRef<'a>,
    pub ancestors: [AncestorRef<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionWrite>,
    pub title: &'a str,
    pub body: BodyWrite<'a>,
}

impl<'a> PageWrite<'a> {
    pub fn new(space: &'a str, parent_id: &'a PageId, title: &'a str, body: &'a str) -> Self {
        Self {
            kind: "page",
            space: SpaceRef { key: space },
            ancestors: [AncestorRef {
                kind: "page",
                id: parent_id.as_str(),
            }],
            version: None,
            title,
            body: BodyWrite {
                storage: StorageWrite {
                    value: body,
                    representation: "storage",
                },
            },
        }
    }

    pub fn with_version(mut self, number: u64) -> Self {
        self.version = Some(VersionWrite {
            number,
            minor_edit: false,
        });
        self
    }
}

#[derive(Debug, Serialize)]
pub struct SpaceRef<'a> {
    pub key: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AncestorRef<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VersionWrite {
    pub number: u64,
    #[serde(rename = "minorEdit")]
    pub minor_edit: bool,
}

#[derive(Debug, Serialize)]
pub struct BodyWrite<'a> {
    pub storage: StorageWrite<'a>,
}

#[derive(Debug, Serialize)]
pub struct StorageWrite<'a> {
    pub value: &'a str,
    pub representation: &'static str,
}
