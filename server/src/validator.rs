//! Stateless bid validation rules
//!
//! Pure functions only: the coordinator calls [`validate`] while
//! holding the state lock, so the decision and the mutation it leads
//! to form one atomic unit.

use std::fmt;

use chrono::{DateTime, Utc};
use shared::BidSubmission;

use crate::auction::AuctionState;

/// Slack on the increment comparison so floating-point noise cannot
/// reject a bid that is exactly one increment above the highest.
pub const INCREMENT_EPSILON: f64 = 1e-6;

/// Why a bid was turned away. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Wall clock is past the configured close time.
    AuctionClosed,
    /// Amount missing, unparseable, non-finite, or negative.
    InvalidFormat,
    /// Amount does not clear current-highest-plus-increment.
    IncrementTooSmall { min_increment: f64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::AuctionClosed => {
                write!(f, "Auction has ended. No more bids allowed.")
            }
            RejectReason::InvalidFormat => write!(f, "Invalid bid format."),
            RejectReason::IncrementTooSmall { min_increment } => {
                write!(
                    f,
                    "Bid must be at least {} higher than the current bid.",
                    min_increment
                )
            }
        }
    }
}

/// A bid that cleared every rule, with the bidder name normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedBid {
    pub bidder: String,
    pub amount: f64,
}

/// Checks a submission against the current state and wall clock.
///
/// Rules run in order and the first failing rule decides the reason:
/// 1. auction already closed,
/// 2. amount missing/unparseable/non-finite/negative,
/// 3. amount below highest + increment (within [`INCREMENT_EPSILON`]).
///
/// The bidder name cannot fail validation: a missing or blank name is
/// defaulted to `"Anonymous"` before the rules are evaluated.
pub fn validate(
    submission: &BidSubmission,
    state: &AuctionState,
    now: DateTime<Utc>,
) -> Result<AcceptedBid, RejectReason> {
    if now > state.close_time() {
        return Err(RejectReason::AuctionClosed);
    }

    let bidder = submission.bidder();
    let amount = match submission.amount() {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => return Err(RejectReason::InvalidFormat),
    };

    if amount < state.highest_amount() + state.min_increment() - INCREMENT_EPSILON {
        return Err(RejectReason::IncrementTooSmall {
            min_increment: state.min_increment(),
        });
    }

    Ok(AcceptedBid { bidder, amount })
}
