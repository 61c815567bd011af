//! HTTP transport port for outbound service calls.

use std::collections::BTreeMap;

use crate::error::TransportError;

/// An outbound HTTP request issued by a CLI command.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method, uppercase (`GET`, `PUT`, ...).
    pub method: String,
    /// Absolute request URL.
    pub url: String,
    /// Request headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Request body text, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Starts a request with the given method and URL.
    #[must_use]
    pub fn new(method: &str, url: impl Into<String>) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The path-and-query portion of the URL.
    ///
    /// This is what recordings key interactions on; the host is deliberately
    /// excluded so fixtures recorded against one endpoint replay against any
    /// other.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        let rest = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);
        match rest.find('/') {
            Some(index) => rest[index..].to_string(),
            None => "/".to_string(),
        }
    }
}

/// The response to an [`HttpRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, keyed case-sensitively as received.
    pub headers: BTreeMap<String, String>,
    /// Response body text.
    pub body: String,
}

impl HttpResponse {
    /// Whether the status code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends HTTP requests on behalf of CLI commands.
///
/// Abstracting the transport is what makes record/replay possible: the
/// live adapter talks to the real network, the recording adapter wraps it
/// and captures traffic, and the playback adapter serves recorded
/// responses without any network at all.
pub trait HttpTransport: Send + Sync {
    /// Sends one request and returns its response.
    ///
    /// Non-2xx statuses are returned as responses, not errors; an `Err`
    /// means the request produced no response at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent or, during
    /// playback, could not be served from the fixture.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
