use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Parser;
use server::config::AuctionConfig;
use server::coordinator::AuctionCoordinator;
use server::ledger::{BidLedger, FileLedger, MemoryLedger};
use server::network::AuctionServer;

/// Main-method of the application.
/// Parses command-line arguments, then runs the auction server until
/// it fails or Ctrl+C is received.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "8080")]
        port: u16,
        /// Auction close time (RFC 3339)
        #[clap(long, default_value = "2025-12-31T23:59:59Z")]
        close_time: String,
        /// Minimum amount a bid must clear above the current highest
        #[clap(long, default_value = "0.1")]
        min_increment: f64,
        /// Number of historical bids replayed to each new connection
        #[clap(long, default_value = "50")]
        history_limit: usize,
        /// Append-only ledger file; bids stay in memory when omitted
        #[clap(long)]
        ledger: Option<PathBuf>,
    }

    env_logger::init();

    let args = Args::parse();

    let close_time: DateTime<Utc> = args.close_time.parse()?;
    if args.min_increment <= 0.0 {
        return Err("minimum increment must be positive".into());
    }
    let config = AuctionConfig::new(close_time, args.min_increment, args.history_limit);

    let ledger: Arc<dyn BidLedger> = match args.ledger {
        Some(path) => Arc::new(FileLedger::new(path)),
        None => Arc::new(MemoryLedger::new()),
    };

    let coordinator = Arc::new(AuctionCoordinator::new(&config, ledger));
    let address = format!("{}:{}", args.host, args.port);
    let server = AuctionServer::bind(&address, coordinator).await?;

    // Spawn server task
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            eprintln!("Failed to run auction server: {}", e);
        }
    });

    // Handle shutdown gracefully
    tokio::select! {
        result = server_handle => {
            if let Err(e) = result {
                eprintln!("Server task panicked: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
