//! Blocking REST client

use std::time::Duration;

use reqwest::Method;
use reqwest::Url;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use docsync_core::config::ConfluenceSection;
use docsync_core::{
    AttachmentSummary, PageId, PageSummary, RemoteStore, TransportFailure, translate,
};

use crate::wire::{AttachmentList, ContentList, Created, PageWrite};
use crate::{Error, Result};

/// Page size requested when listing children
pub const PAGE_LIMIT: usize = 25;

const USER_AGENT: &str = concat!("docsync/", env!("CARGO_PKG_VERSION"));

/// Remote store backed by the content REST API.
pub struct ConfluenceClient {
    http: Client,
    api_url: Url,
    user: String,
    pass: String,
    space: String,
}

impl ConfluenceClient {
    /// Build a client from the `[confluence]` configuration section.
    pub fn new(settings: &ConfluenceSection) -> Result<Self> {
        let api_url = api_url(&settings.base_url)?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            api_url,
            user: settings.user.clone(),
            pass: settings.pass.clone(),
            space: settings.space_id.clone(),
        })
    }

    /// Root of the REST API, always ending in `rest/api/`.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.endpoint(path));
        if self.user.is_empty() {
            request
        } else {
            request.basic_auth(&self.user, Some(&self.pass))
        }
    }

    /// Send `request` and turn every failure into a structured error.
    fn send(&self, request: RequestBuilder, path: &str) -> docsync_core::Result<Response> {
        let response = request.send().map_err(|e| {
            let url = e
                .url()
                .map(Url::to_string)
                .unwrap_or_else(|| self.endpoint(path));
            translate(TransportFailure::new(url).with_source(e))
        })?;

        let status = response.status();
        debug!("{} -> {}", response.url(), status);
        if status.is_success() {
            return Ok(response);
        }

        let failure = TransportFailure::new(response.url().to_string()).with_status(status.as_u16());
        let failure = match response.text() {
            Ok(body) => failure.with_body(body),
            Err(e) => failure.with_source(e),
        };
        Err(translate(failure))
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> docsync_core::Result<T> {
        let response = self.send(request, path)?;
        let url = response.url().to_string();
        response
            .json()
            .map_err(|e| translate(TransportFailure::new(url).with_source(e)))
    }
}

/// Normalize a wiki base URL into the REST API root.
fn api_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash).map_err(|e| Error::InvalidBaseUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidBaseUrl {
            url: base_url.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    url.join("rest/api/").map_err(|e| Error::InvalidBaseUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })
}

impl RemoteStore for ConfluenceClient {
    fn list_children(&self, page_id: &PageId) -> docsync_core::Result<Vec<PageSummary>> {
        let path = format!("content/{page_id}/child/page");
        let mut children = Vec::new();
        let mut start = 0;

        loop {
            let request = self.request(Method::GET, &path).query(&[
                ("expand", "version,body.storage".to_string()),
                ("start", start.to_string()),
                ("limit", PAGE_LIMIT.to_string()),
            ]);
            let list: ContentList = self.send_json(request, &path)?;
            let received = list.results.len();
            children.extend(list.results.into_iter().map(PageSummary::from));

            if received < PAGE_LIMIT {
                break;
            }
            start += received;
        }

        Ok(children)
    }

    fn create_page(
        &self,
        parent_id: &PageId,
        title: &str,
        body: &str,
    ) -> docsync_core::Result<PageId> {
        let request = self
            .request(Method::POST, "content")
            .json(&PageWrite::new(&self.space, parent_id, title, body));
        let created: Created = self.send_json(request, "content")?;
        Ok(PageId::new(created.id))
    }

    fn update_page(
        &self,
        parent_id: &PageId,
        page_id: &PageId,
        version: u64,
        title: &str,
        body: &str,
    ) -> docsync_core::Result<()> {
        let path = format!("content/{page_id}");
        let request = self
            .request(Method::PUT, &path)
            .json(&PageWrite::new(&self.space, parent_id, title, body).with_version(version));
        self.send(request, &path)?;
        Ok(())
    }

    fn delete_page(&self, page_id: &PageId) -> docsync_core::Result<()> {
        let path = format!("content/{page_id}");
        self.send(self.request(Method::DELETE, &path), &path)?;
        Ok(())
    }

    fn list_attachments(
        &self,
        page_id: &PageId,
        filename: &str,
    ) -> docsync_core::Result<Vec<AttachmentSummary>> {
        let path = format!("content/{page_id}/child/attachment");
        let request = self
            .request(Method::GET, &path)
            .query(&[("filename", filename)]);
        let list: AttachmentList = self.send_json(request, &path)?;
        Ok(list.results.into_iter().map(AttachmentSummary::from).collect())
    }

    fn upload_attachment(
        &self,
        page_id: &PageId,
        filename: &str,
        bytes: &[u8],
        existing_id: Option<&str>,
    ) -> docsync_core::Result<()> {
        let path = attachment_path(page_id, existing_id);
        let form = Form::new().part(
            "file",
            Part::bytes(bytes.to_vec()).file_name(filename.to_string()),
        );
        let request = self
            .request(Method::POST, &path)
            .header("X-Atlassian-Token", "nocheck")
            .multipart(form);
        self.send(request, &path)?;
        Ok(())
    }
}

fn attachment_path(page_id: &PageId, existing_id: Option<&str>) -> String {
    match existing_id {
        Some(id) => format!("content/{page_id}/child/attachment/{id}/data"),
        None => format!("content/{page_id}/child/attachment"),
    }
}
