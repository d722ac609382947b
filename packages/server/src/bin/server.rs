//! Chitchat relay server binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chitchat-server
//! cargo run --bin chitchat-server -- --host 0.0.0.0 --port 3001
//! ```

use std::sync::Arc;

use clap::Parser;

use chitchat_server::{runner::run_server, state::AppState};
use chitchat_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "chitchat-server")]
#[command(about = "Real-time chat relay with presence, rooms, and reactions", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Origin allowed to open cross-origin connections (repeatable)
    #[arg(long = "allowed-origin", default_value = "http://localhost:3000")]
    allowed_origins: Vec<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let state = Arc::new(AppState::new(Arc::new(SystemClock)));
    if let Err(e) = run_server(args.host, args.port, args.allowed_origins, state).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
