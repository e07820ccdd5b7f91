use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use chrono::{Duration, NaiveDate};
use tracing::{error, info};

use crate::cache::{self, MARKET_TZ};
use crate::normalize;
use crate::types::PriceEntry;
use crate::AppState;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// GET / - service banner
pub async fn root() -> &'static str {
    "spot-price-api"
}

/// GET /prices/{date} - stored prices around a date, with cache headers
/// tuned to the auction publication schedule.
pub async fn get_prices(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<(HeaderMap, Json<Vec<PriceEntry>>), (StatusCode, String)> {
    let date = parse_date(&date)?;
    info!("Fetching prices for {}", date);

    let (from, to) = cache::query_window(date);
    let prices = state.store.get_prices(from, to).await.map_err(|e| {
        error!("Error fetching prices from store: {}", e);
        internal_error()
    })?;

    let directive = cache::cache_directive(state.clock.now(), date, &prices);

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&directive.control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    if let Some(expires) = directive.expires {
        if let Ok(value) = HeaderValue::from_str(&cache::gmt_string_for_cache(expires)) {
            headers.insert(header::EXPIRES, value);
        }
    }

    Ok((headers, Json(prices)))
}

#[derive(Debug, serde::Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    p: String,
}

#[derive(Debug, serde::Serialize)]
pub struct RefreshResponse {
    pub done: bool,
}

/// GET /refresh - fetch, validate and persist tomorrow's prices.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<RefreshResponse>, (StatusCode, String)> {
    check_secret(&state, &query)?;

    let tomorrow =
        state.clock.now().with_timezone(&MARKET_TZ).date_naive() + Duration::days(1);
    info!("Updating prices for {}", tomorrow);

    run_refresh(&state, tomorrow).await
}

/// GET /refresh/{date} - same as /refresh for an explicit date.
pub async fn refresh_for_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<RefreshResponse>, (StatusCode, String)> {
    check_secret(&state, &query)?;

    let date = parse_date(&date)?;
    info!("Updating prices for {}", date);

    run_refresh(&state, date).await
}

/// A bad or missing secret answers 404 so the endpoint is
/// indistinguishable from a missing route.
fn check_secret(state: &AppState, query: &RefreshQuery) -> Result<(), (StatusCode, String)> {
    if state.config.refresh_secret.is_empty() || state.config.refresh_secret != query.p {
        return Err((StatusCode::NOT_FOUND, "Not Found".to_string()));
    }
    Ok(())
}

async fn run_refresh(
    state: &AppState,
    date: NaiveDate,
) -> Result<Json<RefreshResponse>, (StatusCode, String)> {
    let cfg = &state.config;

    let payload = state
        .feed
        .day_ahead_prices(date, &cfg.market, &cfg.delivery_area, &cfg.currency)
        .await
        .map_err(|e| {
            error!("Error fetching prices for {}: {}", date, e);
            internal_error()
        })?;

    let entries = match normalize::validate_and_extract(
        payload.as_ref(),
        &cfg.delivery_area,
        &cfg.market,
        &cfg.currency,
    ) {
        Some(entries) => entries,
        None => return Ok(Json(RefreshResponse { done: false })),
    };

    let inserted = state.store.insert_prices(&entries).await.map_err(|e| {
        error!("Error inserting prices: {}", e);
        internal_error()
    })?;
    info!(
        "Inserted {} of {} price entries for {}",
        inserted,
        entries.len(),
        date
    );

    Ok(Json(RefreshResponse { done: true }))
}

fn parse_date(raw: &str) -> Result<NaiveDate, (StatusCode, String)> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Invalid date format. Use YYYY-MM-DD".to_string(),
        )
    })
}

fn internal_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}
