use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::types::{DayAheadFeed, PriceDataResponse, Result, ServiceError};

/// Client for the Nord Pool data portal day-ahead price endpoint.
pub struct NordPoolClient {
    client: Client,
    base_url: String,
}

impl NordPoolClient {
    /// Upstream calls are bounded so a stalled feed cannot hold a refresh
    /// open indefinitely.
    const REQUEST_TIMEOUT_SECS: u64 = 10;

    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(Self::REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch the raw auction payload for one delivery date.
    ///
    /// The portal answers 204 No Content until the date's auction results
    /// exist; that maps to `Ok(None)`.
    pub async fn day_ahead_prices(
        &self,
        date: NaiveDate,
        market: &str,
        delivery_area: &str,
        currency: &str,
    ) -> Result<Option<PriceDataResponse>> {
        let url = format!(
            "{}/api/DayAheadPrices?date={}&market={}&deliveryArea={}&currency={}",
            self.base_url,
            date.format("%Y-%m-%d"),
            market,
            delivery_area,
            currency
        );
        debug!("Fetching day-ahead prices from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::FeedRequest(e.to_string()))?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ServiceError::FeedStatus(response.status().as_u16()));
        }

        let payload = response
            .json::<PriceDataResponse>()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        Ok(Some(payload))
    }
}

#[async_trait::async_trait]
impl DayAheadFeed for NordPoolClient {
    async fn day_ahead_prices(
        &self,
        date: NaiveDate,
        market: &str,
        delivery_area: &str,
        currency: &str,
    ) -> Result<Option<PriceDataResponse>> {
        NordPoolClient::day_ahead_prices(self, date, market, delivery_area, currency).await
    }
}
