//! # Console Commands
//!
//! One input line is one command. Lines are split into words, parsed by
//! clap, and forwarded to the [`Application`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (grammar + dispatch)
//! └── words.rs    ◄─── Quote-aware line splitting
//! ```
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  "set supplier phone '555 0100'"                                        │
//! │         │ split_words                                                   │
//! │         ▼                                                               │
//! │  [set, supplier, phone, 555 0100]                                       │
//! │         │ ReplLine::try_parse_from                                      │
//! │         ▼                                                               │
//! │  ReplCommand::Set { kind: Supplier, field: "phone", value: ... }        │
//! │         │ execute                                                       │
//! │         ▼                                                               │
//! │  Application::set_field ──► Outcome::Continue { detail: form view }     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures reported by the application are already in the notice box, so
//! `execute` never prints them itself.

mod words;

pub use words::split_words;

use clap::{CommandFactory, Parser, Subcommand};
use stockroom_client::{Application, ClientResult, Credentials, SessionState, Signup};
use stockroom_core::{EntityId, EntityKind, Section};
use tracing::debug;

use crate::render;

/// Errors in the typed line itself.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unterminated {quote} quote")]
    UnterminatedQuote { quote: char },

    #[error("{0}")]
    Usage(#[from] clap::Error),
}

// =============================================================================
// Grammar
// =============================================================================

/// One REPL line.
#[derive(Debug, Parser)]
#[command(
    name = "stockroom",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ReplCommand {
    /// Log in; after an expired session this restores it
    Login {
        employee_id: String,
        password: String,
    },

    /// Create an employee account
    Register {
        employee_id: String,
        password: String,
        confirm_password: String,
    },

    /// End the session
    Logout,

    /// Switch section: dashboard, suppliers, categories or products
    Show { section: Section },

    /// Reload the current section
    Refresh,

    /// Load an entity into its form
    Edit { kind: EntityKind, id: EntityId },

    /// Set one form field; omit the value to blank it
    Set {
        kind: EntityKind,
        field: String,
        #[arg(default_value = "", allow_hyphen_values = true)]
        value: String,
    },

    /// Send the form: add in create mode, update in edit mode
    Submit { kind: EntityKind },

    /// Reset the form to an empty add form
    Clear { kind: EntityKind },

    /// Delete an entity
    Delete { kind: EntityKind, id: EntityId },

    /// Show a form
    Form { kind: EntityKind },

    /// List the currencies a price can use
    Currencies,

    /// Show this help
    Help,

    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

impl ReplCommand {
    /// Command word, for logs. Arguments may hold passwords.
    pub fn name(&self) -> &'static str {
        match self {
            ReplCommand::Login { .. } => "login",
            ReplCommand::Register { .. } => "register",
            ReplCommand::Logout => "logout",
            ReplCommand::Show { .. } => "show",
            ReplCommand::Refresh => "refresh",
            ReplCommand::Edit { .. } => "edit",
            ReplCommand::Set { .. } => "set",
            ReplCommand::Submit { .. } => "submit",
            ReplCommand::Clear { .. } => "clear",
            ReplCommand::Delete { .. } => "delete",
            ReplCommand::Form { .. } => "form",
            ReplCommand::Currencies => "currencies",
            ReplCommand::Help => "help",
            ReplCommand::Quit => "quit",
        }
    }
}

/// Parses one input line. A blank line is `None`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, ParseError> {
    let words = split_words(line)?;
    if words.is_empty() {
        return Ok(None);
    }
    let parsed = ReplLine::try_parse_from(words)?;
    Ok(Some(parsed.command))
}

/// Help text for every command.
pub fn help_text() -> String {
    ReplLine::command().render_help().to_string()
}

// =============================================================================
// Dispatch
// =============================================================================

/// What the REPL does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Re-render the section, then show `detail` if any.
    Continue { detail: Option<String> },
    Quit,
}

impl Outcome {
    fn render() -> Self {
        Outcome::Continue { detail: None }
    }

    fn detail(text: String) -> Self {
        Outcome::Continue { detail: Some(text) }
    }
}

/// Runs one command against the application.
pub async fn execute(app: &Application, command: ReplCommand) -> Outcome {
    let name = command.name();
    debug!(command = name, "Console command");
    match run(app, command).await {
        Ok(outcome) => outcome,
        Err(err) => {
            debug!(command = name, error = %err, "Command failed");
            Outcome::render()
        }
    }
}

async fn run(app: &Application, command: ReplCommand) -> ClientResult<Outcome> {
    let outcome = match command {
        ReplCommand::Login {
            employee_id,
            password,
        } => {
            let credentials = Credentials::new(employee_id, password);
            match app.session() {
                SessionState::Expired { .. } => app.reauthenticate(&credentials).await?,
                _ => app.login(&credentials).await?,
            };
            Outcome::render()
        }
        ReplCommand::Register {
            employee_id,
            password,
            confirm_password,
        } => {
            app.register(&Signup::new(employee_id, password, confirm_password))
                .await?;
            Outcome::render()
        }
        ReplCommand::Logout => {
            app.logout().await?;
            Outcome::render()
        }
        ReplCommand::Show { section } => {
            app.select_section(section).await?;
            Outcome::render()
        }
        ReplCommand::Refresh => {
            app.refresh().await?;
            Outcome::render()
        }
        ReplCommand::Edit { kind, id } => {
            app.begin_edit(kind, id)?;
            Outcome::detail(render::form(&app.form_view(kind)))
        }
        ReplCommand::Set { kind, field, value } => {
            app.set_field(kind, &field, &value)?;
            Outcome::detail(render::form(&app.form_view(kind)))
        }
        ReplCommand::Submit { kind } => {
            app.submit_form(kind).await?;
            Outcome::render()
        }
        ReplCommand::Clear { kind } => {
            app.clear_form(kind);
            Outcome::detail(render::form(&app.form_view(kind)))
        }
        ReplCommand::Delete { kind, id } => {
            app.delete(kind, id).await?;
            Outcome::render()
        }
        ReplCommand::Form { kind } => Outcome::detail(render::form(&app.form_view(kind))),
        ReplCommand::Currencies => Outcome::detail(render::currencies(app.currencies())),
        ReplCommand::Help => Outcome::detail(help_text()),
        ReplCommand::Quit => Outcome::Quit,
    };
    Ok(outcome)
}
