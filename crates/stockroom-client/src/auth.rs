//! # Authentication
//!
//! Login, registration and logout against the inventory API.
//!
//! The session itself is a cookie kept by the transport; nothing here
//! stores credentials. For login and logout the server may answer with a
//! redirect to the next page, which counts as success.

use serde::Serialize;
use std::fmt;
use stockroom_core::Ack;
use tracing::info;

use crate::error::{ClientError, ClientResult};
use crate::gateway::{ApiGateway, Exchange};
use crate::transport::HttpMethod;

/// A 401 here is a bad password, not an expired session.
pub(crate) const LOGIN_PATH: &str = "/api/login";
const REGISTER_PATH: &str = "/api/register";
const LOGOUT_PATH: &str = "/api/logout";

/// Login body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub employee_id: String,
    pub password: String,
}

impl Credentials {
    pub fn new(employee_id: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            employee_id: employee_id.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("employee_id", &self.employee_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration body. The server checks that both passwords match.
#[derive(Clone, Serialize)]
pub struct Signup {
    pub employee_id: String,
    pub password: String,
    pub confirm_password: String,
}

impl Signup {
    pub fn new(
        employee_id: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Signup {
            employee_id: employee_id.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }
}

impl fmt::Debug for Signup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signup")
            .field("employee_id", &self.employee_id)
            .finish_non_exhaustive()
    }
}

/// Result of a login or logout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthAck {
    /// Server message, when it answered with a body.
    pub message: Option<String>,
    /// Redirect target, when it answered with a redirect.
    pub location: Option<String>,
}

impl AuthAck {
    fn from_exchange(exchange: Exchange) -> Self {
        match exchange {
            Exchange::Body(body) => AuthAck {
                message: serde_json::from_value::<Ack>(body)
                    .ok()
                    .map(|ack| ack.message)
                    .filter(|m| !m.is_empty()),
                location: None,
            },
            Exchange::Redirect { location } => AuthAck {
                message: None,
                location,
            },
        }
    }
}

// =============================================================================
// Auth Client
// =============================================================================

#[derive(Clone)]
pub struct AuthClient {
    gateway: ApiGateway,
}

impl AuthClient {
    pub fn new(gateway: ApiGateway) -> Self {
        AuthClient { gateway }
    }

    /// Starts a session. Bad credentials come back as an `Api` error.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<AuthAck> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ClientError::Transport(format!("could not encode request: {e}")))?;
        let exchange = self
            .gateway
            .exchange(HttpMethod::Post, LOGIN_PATH, Some(body))
            .await?;
        info!(employee_id = %credentials.employee_id, "Logged in");
        Ok(AuthAck::from_exchange(exchange))
    }

    /// Creates an employee account.
    pub async fn register(&self, signup: &Signup) -> ClientResult<Ack> {
        let ack: Ack = self.gateway.post(REGISTER_PATH, signup).await?;
        info!(employee_id = %signup.employee_id, "Registered");
        Ok(ack)
    }

    /// Ends the session.
    pub async fn logout(&self) -> ClientResult<AuthAck> {
        let exchange = self
            .gateway
            .exchange(HttpMethod::Post, LOGOUT_PATH, None)
            .await?;
        info!("Logged out");
        Ok(AuthAck::from_exchange(exchange))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingNotifier, ScriptedTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> (AuthClient, Arc<ScriptedTransport>, Arc<RecordingNotifier>) {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::new();
        let gateway = ApiGateway::new(transport.clone(), notifier.clone());
        (AuthClient::new(gateway), transport, notifier)
    }

    #[tokio::test]
    async fn test_login_with_message() {
        let (auth, transport, _) = client();
        transport.respond(
            HttpMethod::Post,
            LOGIN_PATH,
            200,
            json!({"message": "Login successful"}),
        );

        let ack = auth
            .login(&Credentials::new("E100", "secret"))
            .await
            .unwrap();

        assert_eq!(ack.message.as_deref(), Some("Login successful"));
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"employee_id": "E100", "password": "secret"}))
        );
    }

    #[tokio::test]
    async fn test_login_redirect_is_success() {
        let (auth, transport, notifier) = client();
        transport.redirect(HttpMethod::Post, LOGIN_PATH, "/dashboard.html");

        let ack = auth.login(&Credentials::new("E100", "secret")).await.unwrap();

        assert_eq!(ack.location.as_deref(), Some("/dashboard.html"));
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let (auth, transport, notifier) = client();
        transport.respond(
            HttpMethod::Post,
            LOGIN_PATH,
            401,
            json!({"message": "Invalid credentials"}),
        );

        let err = auth.login(&Credentials::new("E100", "nope")).await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 401, .. }));
        assert_eq!(notifier.messages(), vec!["Invalid credentials"]);
    }

    #[tokio::test]
    async fn test_register_and_logout() {
        let (auth, transport, _) = client();
        transport.respond(
            HttpMethod::Post,
            REGISTER_PATH,
            201,
            json!({"message": "User registered successfully"}),
        );
        transport.redirect(HttpMethod::Post, LOGOUT_PATH, "/login.html");

        let signup = Signup {
            employee_id: "E200".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
        };
        assert_eq!(
            auth.register(&signup).await.unwrap().message,
            "User registered successfully"
        );
        assert_eq!(
            auth.logout().await.unwrap().location.as_deref(),
            Some("/login.html")
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("E100", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
