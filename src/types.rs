use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One delivery interval of day-ahead price, as stored and served.
///
/// The wire format uses compact keys to keep multi-day responses small:
/// `p` = price, `s` = delivery start, `e` = delivery end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PriceEntry {
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "s")]
    pub delivery_start: DateTime<Utc>,
    #[serde(rename = "e")]
    pub delivery_end: DateTime<Utc>,
}

/// Raw day-ahead auction payload from the upstream data portal.
///
/// Discarded after normalization; only entries priced for the configured
/// delivery area survive into `PriceEntry`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDataResponse {
    pub market: String,
    pub currency: String,
    #[serde(default)]
    pub multi_area_entries: Vec<MultiAreaEntry>,
    #[serde(default)]
    pub area_states: Vec<AreaState>,
}

/// One delivery interval with prices keyed by bidding area.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiAreaEntry {
    pub delivery_start: DateTime<Utc>,
    pub delivery_end: DateTime<Utc>,
    #[serde(default)]
    pub entry_per_area: HashMap<String, f64>,
}

/// Auction state ("Final", "Preliminary", ...) for a group of areas.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaState {
    pub state: String,
    #[serde(default)]
    pub areas: Vec<String>,
}

/// Error types for the price service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("feed request failed: {0}")]
    FeedRequest(String),

    #[error("feed returned unexpected status: {0}")]
    FeedStatus(u16),

    #[error("invalid feed response: {0}")]
    InvalidResponse(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Trait for the upstream day-ahead auction feed.
///
/// `Ok(None)` means the portal has no results for the date yet; it is a
/// normal outcome, not an error.
#[async_trait::async_trait]
pub trait DayAheadFeed: Send + Sync {
    async fn day_ahead_prices(
        &self,
        date: NaiveDate,
        market: &str,
        delivery_area: &str,
        currency: &str,
    ) -> Result<Option<PriceDataResponse>>;
}

/// Trait for the durable price store.
#[async_trait::async_trait]
pub trait PriceStore: Send + Sync {
    /// Batch-insert entries, skipping any whose delivery_start already
    /// exists. Returns the count actually written.
    async fn insert_prices(&self, entries: &[PriceEntry]) -> Result<u64>;

    /// All entries with `from <= delivery_start < to`, ascending.
    async fn get_prices(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PriceEntry>>;

    /// Liveness probe against the underlying storage.
    async fn health_check(&self) -> Result<()>;
}

/// Current-time source, injectable so tests can pin the clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
