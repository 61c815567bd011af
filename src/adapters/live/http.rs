//! Live HTTP transport backed by a blocking reqwest client.

use std::collections::BTreeMap;

use crate::error::TransportError;
use crate::harness::env::STRICT_SSL_VAR;
use crate::ports::http::{HttpRequest, HttpResponse, HttpTransport};

/// Sends requests over the real network.
pub struct LiveTransport {
    client: reqwest::blocking::Client,
}

impl LiveTransport {
    /// Builds the transport. Certificate verification is disabled only
    /// while the harness has set the strict-SSL override to `false`,
    /// which mocked suites do for their own lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new() -> Result<Self, TransportError> {
        let relaxed = std::env::var(STRICT_SSL_VAR)
            .is_ok_and(|value| value.eq_ignore_ascii_case("false"));
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(relaxed)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for LiveTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes()).map_err(|_| {
            TransportError::InvalidRequest(format!("bad method {:?}", request.method))
        })?;
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let response = builder.send()?;
        let status = response.status().as_u16();
        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            if let Ok(text) = value.to_str() {
                headers.insert(name.as_str().to_string(), text.to_string());
            }
        }
        let body = response.text()?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
