//! Scripted in-memory transport shared by the unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{ClientError, ClientResult};
use crate::notify::{Notice, Notifier};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

struct Scripted {
    result: ClientResult<HttpResponse>,
    delay: Option<Duration>,
}

/// Answers each (method, path) from a queue of scripted responses and
/// records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
    log: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: HttpMethod, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    /// Queues a JSON response.
    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.respond_after(method, path, status, body, None);
    }

    /// Queues a JSON response that arrives after `delay`.
    pub fn respond_after(
        &self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: Value,
        delay: Option<Duration>,
    ) {
        self.push(
            method,
            path,
            Scripted {
                result: Ok(HttpResponse {
                    status,
                    location: None,
                    body: body.to_string(),
                }),
                delay,
            },
        );
    }

    /// Queues a raw body (for malformed responses).
    pub fn respond_raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.push(
            method,
            path,
            Scripted {
                result: Ok(HttpResponse {
                    status,
                    location: None,
                    body: body.to_string(),
                }),
                delay: None,
            },
        );
    }

    /// Queues a redirect.
    pub fn redirect(&self, method: HttpMethod, path: &str, location: &str) {
        self.push(
            method,
            path,
            Scripted {
                result: Ok(HttpResponse {
                    status: 302,
                    location: Some(location.to_string()),
                    body: String::new(),
                }),
                delay: None,
            },
        );
    }

    /// Queues a connection failure.
    pub fn fail(&self, method: HttpMethod, path: &str) {
        self.push(
            method,
            path,
            Scripted {
                result: Err(ClientError::Transport("connection refused".to_string())),
                delay: None,
            },
        );
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Every request as `"METHOD path"`.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        self.log.lock().unwrap().push(request.clone());
        let scripted = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&(request.method, request.path.clone()))
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(Scripted { result, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(ClientError::Transport(format!(
                "no scripted response for {} {}",
                request.method, request.path
            ))),
        }
    }
}

/// Notifier that keeps every notice.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
