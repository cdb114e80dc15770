//! Two-player tic-tac-toe room server.
//!
//! Players join rooms over WebSocket (`/ws`), play matches and chat.
//! Room state and recent results are also readable through the HTTP API.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sanmoku-server
//! cargo run --bin sanmoku-server -- --host 0.0.0.0 --port 3000 --start-delay-ms 500
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use sanmoku_server::{config::GameConfig, ui::Server};
use sanmoku_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "sanmoku-server")]
#[command(about = "Two-player tic-tac-toe room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Delay between both players being ready and the match start, in milliseconds
    #[arg(long, default_value = "1000")]
    start_delay_ms: u64,

    /// Number of match results kept per room
    #[arg(long, default_value = "10")]
    history_limit: usize,

    /// Number of chat messages kept per room
    #[arg(long, default_value = "100")]
    chat_log_limit: usize,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            start_delay: Duration::from_millis(self.start_delay_ms),
            history_limit: self.history_limit,
            chat_log_limit: self.chat_log_limit,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = args.game_config();
    tracing::info!("Starting with {:?}", config);

    let server = Server::in_memory(&config, Arc::new(SystemClock));
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
