//! # stockroom-client: REST Client for the Stockroom Admin Tool
//!
//! This crate talks to the inventory API and keeps the client-side state
//! that is rebuilt from its responses: per-collection snapshots, the forms,
//! the current section, and the user notices.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   Application (app.rs)                           │  │
//! │  │                                                                  │  │
//! │  │  Navigator + three EntityPanes (store + form) + session state   │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ EntityStore<T> │  │  AuthClient    │  │  MessageBox            │    │
//! │  │                │  │                │  │                        │    │
//! │  │ Snapshot per   │  │ login, logout, │  │ Latest notice, shown   │    │
//! │  │ collection,    │  │ register       │  │ for a fixed duration   │    │
//! │  │ ticket order   │  │                │  │                        │    │
//! │  └───────┬────────┘  └───────┬────────┘  └────────────────────────┘    │
//! │          └──────────┬────────┘                      ▲                   │
//! │                     ▼                               │ failures          │
//! │  ┌──────────────────────────────────────────────────┴───────────────┐  │
//! │  │                     ApiGateway (gateway.rs)                      │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │        HttpTransport: ReqwestTransport (cookie session)          │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`app`] - `Application` controller
//! - [`auth`] - Login, registration, logout
//! - [`config`] - Server URL and notice settings (TOML + env)
//! - [`error`] - Client error type and user-facing messages
//! - [`gateway`] - Request funnel and outcome normalization
//! - [`notify`] - Notices and the message box
//! - [`store`] - Snapshot cache and CRUD per collection
//! - [`transport`] - HTTP seam and the `reqwest` implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockroom_client::{Application, ClientConfig, Credentials, MessageBox};
//! use stockroom_core::{EntityKind, Section};
//!
//! let config = ClientConfig::load_or_default(None);
//! let notices = Arc::new(MessageBox::new(config.notice_duration()));
//! let app = Application::from_config(&config, notices.clone())?;
//!
//! app.login(&Credentials::new("E100", "secret")).await?;
//! app.select_section(Section::Suppliers).await?;
//! app.begin_edit(EntityKind::Supplier, 7)?;
//! app.set_field(EntityKind::Supplier, "phone", "555-0100")?;
//! app.submit_form(EntityKind::Supplier).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod store;
pub mod transport;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use app::{Application, FormView, SessionState, Submitted};
pub use auth::{AuthAck, AuthClient, Credentials, Signup};
pub use config::{ClientConfig, NoticeSettings, ServerSettings};
pub use error::{ClientError, ClientResult};
pub use gateway::{ApiGateway, Exchange};
pub use notify::{MessageBox, NoOpNotifier, Notice, NoticeKind, Notifier};
pub use store::{EntityStore, Saved};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
