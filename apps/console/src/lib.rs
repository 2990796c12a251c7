//! # Stockroom Console Library
//!
//! Interactive terminal front end for the inventory admin client.
//!
//! ## Module Organization
//! ```text
//! stockroom_console/
//! ├── lib.rs          ◄─── You are here (startup + command loop)
//! ├── commands/
//! │   ├── mod.rs      ◄─── REPL grammar and dispatch
//! │   └── words.rs    ◄─── Quote-aware word splitting
//! └── render.rs       ◄─── Text tables, forms, notices
//! ```
//!
//! ## Screen Layout
//! Every command is answered with the same three parts:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  == Supplier Management ==          ◄── section header                 │
//! │  ID  Name  Contact ...              ◄── section table                  │
//! │                                                                         │
//! │  Update Supplier (editing #7)       ◄── command detail, if any         │
//! │                                                                         │
//! │  [ok] Supplier updated successfully ◄── notice, if one is visible      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod render;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use stockroom_client::{Application, ClientConfig, MessageBox};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::{execute, parse_line, Outcome};

const PROMPT: &str = "stockroom> ";

/// Process arguments.
#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about = "Inventory admin console")]
pub struct Cli {
    /// Config file (default: the platform config dir's stockroom/client.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Server base URL, overriding config and environment
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Runs the console until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Parse flags, initialize logging                                     │
/// │  2. Config: defaults < client.toml < STOCKROOM_* env < --base-url       │
/// │  3. Application over reqwest, notices into a MessageBox                 │
/// │  4. Dashboard load (may fail until logged in)                           │
/// │  5. Read, execute, render, repeat                                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ClientConfig::load_or_default(cli.config);
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }
    config.validate().context("invalid client configuration")?;

    info!(base_url = %config.server.base_url, "Starting Stockroom console");

    let notices = Arc::new(MessageBox::new(config.notice_duration()));
    let app = Application::from_config(&config, notices.clone())
        .context("could not build HTTP client")?;

    if let Err(err) = app.start().await {
        debug!(error = %err, "Initial dashboard load failed");
    }

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(screen(&app, &notices, Some(commands::help_text())).as_bytes())
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => match execute(&app, command).await {
                Outcome::Quit => break,
                Outcome::Continue { detail } => screen(&app, &notices, detail),
            },
            Err(err) => format!("{err}\n"),
        };
        stdout.write_all(output.as_bytes()).await?;
    }

    info!("Console closed");
    Ok(())
}

/// Section, then the command's detail, then the visible notice.
fn screen(app: &Application, notices: &MessageBox, detail: Option<String>) -> String {
    let mut out = render::section(app);
    if let Some(detail) = detail {
        out.push('\n');
        out.push_str(&detail);
    }
    if let Some(notice) = notices.current() {
        out.push('\n');
        out.push_str(&render::notice(&notice));
        out.push('\n');
    }
    out
}

/// Initializes the tracing subscriber. Logs go to stderr so they never mix
/// with the rendered tables.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show request/response detail
/// - `RUST_LOG=stockroom=trace` - Trace for the stockroom crates only
/// - Default: `warn,stockroom=info`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,stockroom=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
