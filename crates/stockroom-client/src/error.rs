//! # Client Error Types
//!
//! Error types for everything that talks to the inventory API.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Remote        │  │     Local               │ │
//! │  │                 │  │   (gateway      │  │     (Application        │ │
//! │  │  InvalidConfig  │  │    notifies)    │  │      notifies)          │ │
//! │  │  InvalidUrl     │  │                 │  │                         │ │
//! │  │  ConfigLoad...  │  │  Transport      │  │  InvalidReference       │ │
//! │  │  ConfigSave...  │  │  Api            │  │  Validation             │ │
//! │  │                 │  │  SessionExpired │  │  SubmissionInFlight     │ │
//! │  │                 │  │                 │  │  UnknownField           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure is announced to the user exactly once: remote failures by the
//! gateway that saw them, local ones by the `Application` that raised them.

use stockroom_core::{CoreError, EntityId, EntityKind, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Shown when the API gives no message of its own.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Client error type covering every failure the admin client can report.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid server URL.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The server could not be reached, or answered with an unreadable body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// The server redirected, which means the session is gone.
    #[error("Session expired (redirect to {})", .location.as_deref().unwrap_or("?"))]
    SessionExpired { location: Option<String> },

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// An id that is not in the current snapshot.
    #[error("{kind} {id} is not in the current list")]
    InvalidReference { kind: EntityKind, id: EntityId },

    /// Form text that could not be coerced.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A second submit while the first is pending.
    #[error("A {kind} submission is already in progress")]
    SubmissionInFlight { kind: EntityKind },

    /// A form field that does not exist.
    #[error("{kind} form has no field '{field}'")]
    UnknownField { kind: EntityKind, field: String },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidReference { kind, id } => ClientError::InvalidReference { kind, id },
            CoreError::SubmissionInFlight { kind } => ClientError::SubmissionInFlight { kind },
            CoreError::UnknownField { kind, field } => ClientError::UnknownField { kind, field },
            CoreError::Validation(inner) => ClientError::Validation(inner),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// The text shown to the user in a notice.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => "Network error, please try again.".to_string(),
            ClientError::SessionExpired { .. } => {
                "Session expired, please log in again.".to_string()
            }
            ClientError::Api { message, .. } if message.trim().is_empty() => {
                FALLBACK_MESSAGE.to_string()
            }
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Returns true if the error was raised on this side without a gateway
    /// call reporting it.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidReference { .. }
                | ClientError::Validation(_)
                | ClientError::SubmissionInFlight { .. }
                | ClientError::UnknownField { .. }
        )
    }

    /// Returns true if this error means the user must log in again.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired { .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
