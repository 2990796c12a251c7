//! # Stockroom Console Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr)
//! 2. Load client config (file, then environment, then flags)
//! 3. Build the `Application` over `reqwest`
//! 4. Load the dashboard and enter the command loop

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The actual setup is in lib.rs so it can be tested
    stockroom_console::run().await
}
