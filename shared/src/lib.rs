use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name assigned to bids that arrive without a usable `user` field.
pub const DEFAULT_BIDDER: &str = "Anonymous";

/// Inbound bid frame as it arrives on the wire.
///
/// Both fields are optional at parse time: `amount` may be a JSON
/// number or a numeric string, and a missing or blank `user` falls
/// back to [`DEFAULT_BIDDER`]. Whether the amount is actually usable
/// is decided by the server-side validator, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct BidSubmission {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub user: Option<String>,
}

impl BidSubmission {
    /// Trimmed bidder name, defaulted to `"Anonymous"` when missing or
    /// blank. Never returns an empty string.
    pub fn bidder(&self) -> String {
        match &self.user {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => DEFAULT_BIDDER.to_string(),
        }
    }

    /// Bid amount parsed to a float, from either a JSON number or a
    /// numeric string. `None` when absent or unparseable.
    pub fn amount(&self) -> Option<f64> {
        match &self.amount {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// One accepted bid. Appended to the ledger and replayed to new
/// connections; the timestamp is server-assigned, RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRecord {
    pub user: String,
    pub amount: f64,
    pub timestamp: String,
}

/// Snapshot frame unicast once per connection, immediately after
/// connect. `bids` is newest first; `error` is set only when history
/// retrieval failed (the snapshot fields are still authoritative).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub highest: f64,
    pub user: String,
    pub bids: Vec<BidRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InitMessage {
    pub fn new(highest: f64, user: String, bids: Vec<BidRecord>, error: Option<String>) -> Self {
        Self {
            kind: "init".to_string(),
            highest,
            user,
            bids,
            error,
        }
    }
}

/// Broadcast frame announcing an accepted bid to every connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: String,
    pub amount: f64,
    pub timestamp: String,
}

impl BidMessage {
    pub fn from_record(record: &BidRecord) -> Self {
        Self {
            kind: "bid".to_string(),
            user: record.user.clone(),
            amount: record.amount,
            timestamp: record.timestamp.clone(),
        }
    }
}

/// Unicast rejection frame. Deliberately carries no `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error: String,
}

impl ErrorMessage {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
