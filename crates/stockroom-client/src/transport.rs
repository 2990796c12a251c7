//! # HTTP Transport
//!
//! The raw request/response seam between the gateway and the network.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ApiGateway ── HttpRequest ──► HttpTransport ──► network               │
//! │       ▲                              │                                  │
//! │       └──────── HttpResponse ◄───────┘                                  │
//! │                 (status, Location, body text)                           │
//! │                                                                         │
//! │   The transport does NOT interpret statuses. Redirects are returned    │
//! │   as-is (never followed) so the gateway can see them.                  │
//! │                                                                         │
//! │   ReqwestTransport   production, cookie store keeps the session        │
//! │   (test fakes)       scripted responses, no network                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use serde_json::Value;
use std::fmt;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Request / Response
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// An API call as the gateway builds it.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute API path, e.g. `/api/products/3`.
    pub path: String,
    pub body: Option<Value>,
}

/// What came back, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// `Location` header, if any.
    pub location: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends one request and returns the raw response.
///
/// Errors are reserved for requests that produced no response at all.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse>;
}

// =============================================================================
// Reqwest Transport
// =============================================================================

/// Production transport over `reqwest`.
///
/// Keeps cookies between calls, so the session established by `/api/login`
/// rides along on every later request.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Builds the client from configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::none())
            .cookie_store(true);

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;
        let base_url = config.base_url()?;
        debug!(base_url = %base_url, "HTTP transport ready");

        Ok(ReqwestTransport { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The reqwest request for `request`: URL joined onto the base, JSON
    /// content type on every call, body encoded by reqwest.
    fn build(&self, request: &HttpRequest) -> ClientResult<reqwest::Request> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| ClientError::Transport(format!("bad request path: {e}")))?;

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let response = self.client.execute(self.build(&request)?).await?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            location,
            body,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
