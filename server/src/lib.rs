//! # Auction Server Library
//!
//! This library provides the authoritative server implementation for a
//! single running real-time auction. It holds the canonical auction
//! state, validates bid submissions from concurrently connected
//! clients, and broadcasts accepted bids to keep every client in sync.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! The server owns the definitive highest bid and bidder. All
//! accept/reject decisions are made here; clients only render what the
//! server broadcasts.
//!
//! ### Serialized Bid Processing
//! Every bid from every connection funnels through a single
//! serialization point: the validation of a bid and the state mutation
//! it causes form one atomic unit, so no two bids are ever evaluated
//! against the same stale highest amount.
//!
//! ### Connection Management
//! Handles the complete lifecycle of client connections: registration
//! with an immediate state snapshot, per-connection rejection
//! messages, broadcast fan-out with per-recipient failure isolation,
//! and cleanup on disconnect.
//!
//! ### Durable History
//! Accepted bids are appended to a pluggable ledger and replayed
//! (newest first, bounded) to each new connection. Persistence is
//! best-effort: in-memory state stays authoritative when the durable
//! write fails.
//!
//! ## Module Organization
//!
//! - [`auction`] — the mutable auction state and its snapshot view
//! - [`validator`] — pure, ordered validation rules and reject reasons
//! - [`registry`] — membership set of open connections and broadcast
//! - [`ledger`] — persistence port plus memory and flat-file adapters
//! - [`coordinator`] — the orchestrator tying all of the above together
//! - [`network`] — WebSocket transport adapter
//! - [`config`] — startup-time auction parameters
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chrono::{Duration, Utc};
//! use server::config::AuctionConfig;
//! use server::coordinator::AuctionCoordinator;
//! use server::ledger::MemoryLedger;
//! use server::network::AuctionServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuctionConfig::new(Utc::now() + Duration::hours(24), 0.1, 50);
//!     let coordinator = Arc::new(AuctionCoordinator::new(&config, Arc::new(MemoryLedger::new())));
//!
//!     let server = AuctionServer::bind("127.0.0.1:8080", coordinator).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod auction;
pub mod config;
pub mod coordinator;
pub mod ledger;
pub mod network;
pub mod registry;
pub mod validator;
