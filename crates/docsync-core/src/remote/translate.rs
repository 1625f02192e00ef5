//! Translation of transport failures into structured errors

use serde_json::Value;

use crate::error::{BoxError, Error};

/// Raw description of a failed remote call.
#[derive(Debug)]
pub struct TransportFailure {
    /// Request URL
    pub url: String,
    /// Response status, `None` when no response was received
    pub status: Option<u16>,
    /// Raw response body
    pub body: String,
    /// Underlying transport error
    pub source: Option<BoxError>,
}

impl TransportFailure {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            body: String::new(),
            source: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Classify a transport failure by status and build its diagnostic message.
///
/// The message reads
/// `<label> [url] <url> [status] <code> [message] <detail>`, where detail is
/// the `message` field of a JSON body, or the raw body otherwise. A failure
/// without a body, either because no response arrived or because reading it
/// failed, uses the transport error text as detail.
pub fn translate(failure: TransportFailure) -> Error {
    let TransportFailure {
        url,
        status,
        body,
        source,
    } = failure;

    let label = match status.map(|s| s / 100) {
        Some(4) => "Client error response",
        Some(5) => "Server error response",
        _ => "Unsuccessful response",
    };
    let code = status.map_or_else(|| "none".to_string(), |s| s.to_string());
    let detail = match &source {
        Some(source) if body.is_empty() => source.to_string(),
        _ => body_message(&body),
    };
    let message = format!("{label} [url] {url} [status] {code} [message] {detail}");

    match status {
        Some(status @ 400..=499) => Error::Client {
            message,
            url,
            status,
            source,
        },
        Some(status @ 500..=599) => Error::Server {
            message,
            url,
            status,
            source,
        },
        _ => Error::Unclassified {
            message,
            url,
            status,
            source,
        },
    }
}

fn body_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Null) | None => body.to_string(),
            Some(other) => other.to_string(),
        },
        _ => body.to_string(),
    }
}
