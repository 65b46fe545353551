//! Blocking HTTP transport backed by `reqwest`.
//!
//! # Invariants
//! - No timeout unless one is configured; a hung request blocks the caller.
//! - Request bodies are serialized by `reqwest` as JSON.

use super::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use std::time::{Duration, Instant};

/// Production `Transport` over a blocking `reqwest` client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with an optional overall request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn builder(&self, request: &ApiRequest) -> RequestBuilder {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let started_at = Instant::now();
        let response = self.builder(request).send().map_err(|err| {
            warn!(
                "event=http_send module=api status=error method={} duration_ms={} error={}",
                request.method,
                started_at.elapsed().as_millis(),
                err
            );
            TransportError::from(err)
        })?;
        let status = response.status().as_u16();
        let body = response.text()?;

        debug!(
            "event=http_send module=api status=ok method={} http_status={} body_bytes={} duration_ms={}",
            request.method,
            status,
            body.len(),
            started_at.elapsed().as_millis()
        );
        Ok(ApiResponse { status, body })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[cfg(test)]
mod tests {
    use super::{to_reqwest_method, ReqwestTransport};
    use crate::api::transport::{ApiRequest, Method};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn builds_with_and_without_timeout() {
        assert!(ReqwestTransport::new(None).is_ok());
        assert!(ReqwestTransport::new(Some(Duration::from_secs(5))).is_ok());
    }

    #[test]
    fn maps_every_method() {
        assert_eq!(to_reqwest_method(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(to_reqwest_method(Method::Delete), reqwest::Method::DELETE);
    }

    #[test]
    fn json_body_and_headers_reach_the_request() {
        let transport = ReqwestTransport::new(None).unwrap();
        let request = ApiRequest::new(Method::Post, "http://backend.test/persona")
            .with_json(json!({"id": 3}))
            .with_header("X-HTTP-Method-Override", "DELETE");
        let built = transport.builder(&request).build().unwrap();

        assert_eq!(built.method(), reqwest::Method::POST);
        assert_eq!(built.headers()["x-http-method-override"], "DELETE");
        assert_eq!(built.headers()["content-type"], "application/json");
        let bytes = built.body().and_then(|body| body.as_bytes()).unwrap();
        let sent: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(sent, json!({"id": 3}));
    }

    #[test]
    fn bodiless_request_has_no_payload() {
        let transport = ReqwestTransport::new(None).unwrap();
        let request = ApiRequest::new(Method::Get, "http://backend.test/persona");
        let built = transport.builder(&request).build().unwrap();
        assert!(built.body().is_none());
    }
}
