//! Durable bid ledger port and its storage adapters
//!
//! The coordinator depends on persistence only through [`BidLedger`]:
//! append one accepted bid, read back the most recent ones. Adapters
//! are interchangeable behind `Arc<dyn BidLedger>` without touching
//! the core. Both operations are best-effort from the coordinator's
//! perspective: in-memory auction state stays authoritative even when
//! the durable write fails.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;
use shared::BidRecord;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only store of accepted bids.
#[async_trait]
pub trait BidLedger: Send + Sync {
    /// Durably records one accepted bid.
    async fn append(&self, bid: &BidRecord) -> Result<(), LedgerError>;

    /// Up to `limit` most recent bids, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<BidRecord>, LedgerError>;
}

/// In-process ledger, used in tests and when no file path is
/// configured. Bids are gone when the process exits.
#[derive(Default)]
pub struct MemoryLedger {
    bids: Mutex<Vec<BidRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BidLedger for MemoryLedger {
    async fn append(&self, bid: &BidRecord) -> Result<(), LedgerError> {
        self.bids.lock().await.push(bid.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<BidRecord>, LedgerError> {
        let bids = self.bids.lock().await;
        Ok(bids.iter().rev().take(limit).cloned().collect())
    }
}

/// Flat-file ledger: one JSON object per line, appended in acceptance
/// order. A missing file reads back as an empty history.
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BidLedger for FileLedger {
    async fn append(&self, bid: &BidRecord) -> Result<(), LedgerError> {
        let mut line = serde_json::to_string(bid)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!("Appended bid by {} to {}", bid.user, self.path.display());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<BidRecord>, LedgerError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut bids = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            bids.push(serde_json::from_str::<BidRecord>(line)?);
        }

        // File order is oldest first; callers want newest first
        bids.reverse();
        bids.truncate(limit);
        Ok(bids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, amount: f64) -> BidRecord {
        BidRecord {
            user: user.to_string(),
            amount,
            timestamp: format!("2025-06-01T12:00:{:02}.000Z", (amount as u32) % 60),
        }
    }

    #[tokio::test]
    async fn test_memory_ledger_newest_first() {
        let ledger = MemoryLedger::new();
        ledger.append(&record("Alice", 1.0)).await.unwrap();
        ledger.append(&record("Bob", 2.0)).await.unwrap();
        ledger.append(&record("Carol", 3.0)).await.unwrap();

        let recent = ledger.recent(10).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].user, "Carol");
        assert_eq!(recent[2].user, "Alice");
    }

    #[tokio::test]
    async fn test_memory_ledger_respects_limit() {
        let ledger = MemoryLedger::new();
        for i in 0..10 {
            ledger.append(&record("Bidder", i as f64)).await.unwrap();
        }

        let recent = ledger.recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].amount, 9.0);
    }

    #[tokio::test]
    async fn test_memory_ledger_empty() {
        let ledger = MemoryLedger::new();
        assert!(ledger.recent(50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_ledger_roundtrip() {
        let path = std::env::temp_dir().join(format!("bid-ledger-roundtrip-{}.jsonl", std::process::id()));
        let _ = fs::remove_file(&path).await;

        let ledger = FileLedger::new(&path);
        ledger.append(&record("Alice", 1.0)).await.unwrap();
        ledger.append(&record("Bob", 2.0)).await.unwrap();

        let recent = ledger.recent(50).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user, "Bob");
        assert_eq!(recent[1].user, "Alice");

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_file_ledger_missing_file_is_empty_history() {
        let path = std::env::temp_dir().join(format!("bid-ledger-missing-{}.jsonl", std::process::id()));
        let _ = fs::remove_file(&path).await;

        let ledger = FileLedger::new(&path);
        assert!(ledger.recent(50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_ledger_limit() {
        let path = std::env::temp_dir().join(format!("bid-ledger-limit-{}.jsonl", std::process::id()));
        let _ = fs::remove_file(&path).await;

        let ledger = FileLedger::new(&path);
        for i in 0..5 {
            ledger.append(&record("Bidder", i as f64)).await.unwrap();
        }

        let recent = ledger.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].amount, 4.0);
        assert_eq!(recent[1].amount, 3.0);

        let _ = fs::remove_file(&path).await;
    }
}
