//! # API Gateway
//!
//! The single funnel every remote call goes through.
//!
//! ## Outcome Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   transport error ──────────────────► Transport        ─┐               │
//! │   3xx ──────────────────────────────► SessionExpired   ─┤               │
//! │   401 (except /api/login) ──────────► SessionExpired   ─┤  published    │
//! │   other 4xx / 5xx ──────────────────► Api{status,msg}  ─┤  once to the  │
//! │   2xx + unreadable body ────────────► Transport        ─┘  notifier     │
//! │   2xx + JSON ───────────────────────► Ok(T)                             │
//! │                                                                         │
//! │   Api message: body.message, else "Something went wrong"               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers get the same error back and decide what else to do; they must
//! not announce it again.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::LOGIN_PATH;
use crate::error::{ClientError, ClientResult, FALLBACK_MESSAGE};
use crate::notify::{Notice, Notifier};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

const UNAUTHORIZED: u16 = 401;

/// Shape of error bodies.
#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

/// A response that was not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Exchange {
    /// 2xx with its parsed JSON body (`Null` when empty).
    Body(Value),
    /// 3xx, not followed.
    Redirect { location: Option<String> },
}

// =============================================================================
// Gateway
// =============================================================================

/// Sends API requests and normalizes their outcomes.
#[derive(Clone)]
pub struct ApiGateway {
    transport: Arc<dyn HttpTransport>,
    notifier: Arc<dyn Notifier>,
}

impl ApiGateway {
    pub fn new(transport: Arc<dyn HttpTransport>, notifier: Arc<dyn Notifier>) -> Self {
        ApiGateway {
            transport,
            notifier,
        }
    }

    /// Sends a request and returns the parsed success body.
    ///
    /// A redirect is a [`ClientError::SessionExpired`], as is a 401 from
    /// any endpoint but login.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        match self.exchange(method, path, body).await? {
            Exchange::Body(value) => serde_json::from_value(value).map_err(|e| {
                self.fail(
                    method,
                    path,
                    ClientError::Transport(format!("unexpected response body: {e}")),
                )
            }),
            Exchange::Redirect { location } => {
                Err(self.fail(method, path, ClientError::SessionExpired { location }))
            }
        }
    }

    /// Sends a request, passing redirects back instead of failing on them.
    ///
    /// Used by the login/logout flow, where a redirect means success.
    pub async fn exchange(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<Exchange> {
        debug!(%method, path, has_body = body.is_some(), "API request");

        let request = HttpRequest {
            method,
            path: path.to_string(),
            body,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                let err = match err {
                    ClientError::Transport(_) => err,
                    other => ClientError::Transport(other.to_string()),
                };
                return Err(self.fail(method, path, err));
            }
        };

        debug!(%method, path, status = response.status, "API response");

        if response.is_redirect() {
            return Ok(Exchange::Redirect {
                location: response.location,
            });
        }

        if response.status == UNAUTHORIZED && path != LOGIN_PATH {
            return Err(self.fail(
                method,
                path,
                ClientError::SessionExpired { location: None },
            ));
        }

        if !response.is_success() {
            let message = serde_json::from_str::<MessageBody>(&response.body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            return Err(self.fail(
                method,
                path,
                ClientError::Api {
                    status: response.status,
                    message,
                },
            ));
        }

        if response.body.trim().is_empty() {
            return Ok(Exchange::Body(Value::Null));
        }

        serde_json::from_str(&response.body)
            .map(Exchange::Body)
            .map_err(|e| {
                self.fail(
                    method,
                    path,
                    ClientError::Transport(format!("malformed response body: {e}")),
                )
            })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(HttpMethod::Get, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.encode(HttpMethod::Post, path, body)?;
        self.request(HttpMethod::Post, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.encode(HttpMethod::Put, path, body)?;
        self.request(HttpMethod::Put, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(HttpMethod::Delete, path, None).await
    }

    /// The notifier failures are published to.
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    fn encode<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> ClientResult<Value> {
        serde_json::to_value(body).map_err(|e| {
            self.fail(
                method,
                path,
                ClientError::Transport(format!("could not encode request: {e}")),
            )
        })
    }

    /// Logs and publishes a failure, then hands it back.
    fn fail(&self, method: HttpMethod, path: &str, err: ClientError) -> ClientError {
        match &err {
            ClientError::Api { status, message } => {
                warn!(%method, path, status, message = %message, "API call rejected")
            }
            other => warn!(%method, path, error = %other, "API call failed"),
        }
        self.notifier.notify(Notice::error(err.user_message()));
        err
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
