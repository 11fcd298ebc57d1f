use chrono::{DateTime, Utc};

/// Auction parameters, fixed at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct AuctionConfig {
    /// Wall-clock instant after which every bid is rejected.
    pub close_time: DateTime<Utc>,
    /// Amount a new bid must clear above the current highest. Always positive.
    pub min_increment: f64,
    /// Upper bound on the bid history replayed to a new connection.
    pub history_limit: usize,
}

impl AuctionConfig {
    pub fn new(close_time: DateTime<Utc>, min_increment: f64, history_limit: usize) -> Self {
        Self {
            close_time,
            min_increment,
            history_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_config_fields() {
        let close = Utc::now() + Duration::hours(1);
        let config = AuctionConfig::new(close, 0.1, 50);

        assert_eq!(config.close_time, close);
        assert_eq!(config.min_increment, 0.1);
        assert_eq!(config.history_limit, 50);
    }
}
