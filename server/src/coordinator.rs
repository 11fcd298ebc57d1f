//! Auction coordinator serializing all state transitions
//!
//! Every bid from every connection funnels through one state lock:
//! validation, mutation, and the broadcast enqueue for a single bid
//! run as one atomic unit, so no two bids are ever judged against the
//! same prior highest amount. The ledger is never touched under that
//! lock; durable writes run on their own task and cannot stall
//! bidding for other clients.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use log::{error, warn};
use shared::{BidMessage, BidRecord, BidSubmission, ErrorMessage, InitMessage};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::{Mutex, RwLock};

use crate::auction::{AuctionSnapshot, AuctionState};
use crate::config::AuctionConfig;
use crate::ledger::BidLedger;
use crate::registry::ConnectionRegistry;
use crate::validator::{validate, RejectReason};

/// Orchestrates the auction: connection lifecycle, bid processing,
/// persistence, and fan-out of accepted bids.
pub struct AuctionCoordinator {
    state: Mutex<AuctionState>,
    registry: RwLock<ConnectionRegistry>,
    ledger: Arc<dyn BidLedger>,
    history_limit: usize,
}

impl AuctionCoordinator {
    pub fn new(config: &AuctionConfig, ledger: Arc<dyn BidLedger>) -> Self {
        Self {
            state: Mutex::new(AuctionState::new(config)),
            registry: RwLock::new(ConnectionRegistry::new()),
            ledger,
            history_limit: config.history_limit,
        }
    }

    /// Registers a new client stream and unicasts its `init` snapshot.
    ///
    /// The history fetch happens outside every lock and its failure is
    /// non-fatal: the client still gets the snapshot, with the error
    /// embedded and the history empty.
    pub async fn handle_connect(&self, sender: UnboundedSender<String>) -> u32 {
        let id = self.registry.write().await.add(sender);

        let (bids, history_error) = match self.ledger.recent(self.history_limit).await {
            Ok(bids) => (bids, None),
            Err(e) => {
                error!("Failed to fetch bid history for connection {}: {}", id, e);
                (Vec::new(), Some("Could not load bid history.".to_string()))
            }
        };

        let snapshot = self.state.lock().await.snapshot();
        let init = InitMessage::new(snapshot.highest, snapshot.user, bids, history_error);
        match serde_json::to_string(&init) {
            Ok(frame) => {
                self.registry.write().await.send_to(id, &frame);
            }
            Err(e) => error!("Failed to serialize init frame for connection {}: {}", id, e),
        }

        id
    }

    /// Deregisters a closed connection. No other side effects.
    pub async fn handle_disconnect(&self, id: u32) {
        self.registry.write().await.remove(id);
    }

    /// Runs one inbound frame through parse, validate, apply, and
    /// broadcast.
    ///
    /// Rejections are unicast to the offending connection only and
    /// leave the state untouched. On acceptance the state mutation and
    /// the broadcast enqueue happen under the same state lock, which
    /// pins broadcast order to acceptance order; the ledger append is
    /// then fired on a separate task and its failure only logged.
    pub async fn handle_bid(&self, id: u32, raw: &str) {
        let submission: BidSubmission = match serde_json::from_str(raw) {
            Ok(submission) => submission,
            Err(e) => {
                warn!("Connection {}: malformed bid frame: {}", id, e);
                self.send_error(id, &RejectReason::InvalidFormat).await;
                return;
            }
        };

        let record = {
            let mut state = self.state.lock().await;
            match validate(&submission, &state, Utc::now()) {
                Ok(accepted) => {
                    state.apply(&accepted.bidder, accepted.amount);

                    let record = BidRecord {
                        user: accepted.bidder,
                        amount: accepted.amount,
                        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    };

                    match serde_json::to_string(&BidMessage::from_record(&record)) {
                        Ok(frame) => {
                            self.registry.write().await.broadcast(&frame);
                        }
                        Err(e) => error!("Failed to serialize bid broadcast: {}", e),
                    }

                    record
                }
                Err(reason) => {
                    drop(state);
                    warn!("Connection {}: rejected bid: {}", id, reason);
                    self.send_error(id, &reason).await;
                    return;
                }
            }
        };

        // Fire-and-forget: in-memory state stays authoritative even
        // when the durable write fails.
        let ledger = Arc::clone(&self.ledger);
        tokio::spawn(async move {
            if let Err(e) = ledger.append(&record).await {
                error!("Failed to persist bid by {}: {}", record.user, e);
            }
        });
    }

    async fn send_error(&self, id: u32, reason: &RejectReason) {
        match serde_json::to_string(&ErrorMessage::new(reason.to_string())) {
            Ok(frame) => {
                self.registry.write().await.send_to(id, &frame);
            }
            Err(e) => error!("Failed to serialize error frame: {}", e),
        }
    }

    /// Current auction snapshot, for monitoring and tests.
    pub async fn snapshot(&self) -> AuctionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Number of currently open connections.
    pub async fn connection_count(&self) -> usize {
        self.registry.read().await.len()
    }
}
