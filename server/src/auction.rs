//! Authoritative in-memory state of the single running auction

use chrono::{DateTime, Utc};
use log::info;

use crate::config::AuctionConfig;

/// The one mutable record the whole system revolves around.
///
/// Owned exclusively by the coordinator, which serializes every read
/// and mutation behind a single lock; this struct does no locking and
/// no I/O of its own. The highest amount is monotonically
/// non-decreasing and only ever changes through [`AuctionState::apply`]
/// with a bid that already passed validation.
#[derive(Debug, Clone)]
pub struct AuctionState {
    highest_amount: f64,
    highest_bidder: String,
    close_time: DateTime<Utc>,
    min_increment: f64,
}

/// Read-only view of the auction, used to initialize new connections.
#[derive(Debug, Clone, PartialEq)]
pub struct AuctionSnapshot {
    pub highest: f64,
    pub user: String,
}

impl AuctionState {
    /// Fresh auction: no bids yet, no bidder.
    pub fn new(config: &AuctionConfig) -> Self {
        Self {
            highest_amount: 0.0,
            highest_bidder: String::new(),
            close_time: config.close_time,
            min_increment: config.min_increment,
        }
    }

    pub fn highest_amount(&self) -> f64 {
        self.highest_amount
    }

    pub fn highest_bidder(&self) -> &str {
        &self.highest_bidder
    }

    pub fn close_time(&self) -> DateTime<Utc> {
        self.close_time
    }

    pub fn min_increment(&self) -> f64 {
        self.min_increment
    }

    /// Records a validated bid as the new highest. The caller must hold
    /// the same lock it held while validating.
    pub fn apply(&mut self, bidder: &str, amount: f64) {
        self.highest_amount = amount;
        self.highest_bidder = bidder.to_string();
        info!("New highest bid: {} by {}", amount, bidder);
    }

    pub fn snapshot(&self) -> AuctionSnapshot {
        AuctionSnapshot {
            highest: self.highest_amount,
            user: self.highest_bidder.clone(),
        }
    }
}
