pub mod cache;
pub mod config;
pub mod db;
pub mod handlers;
pub mod health;
pub mod normalize;
pub mod sources;
pub mod types;

pub use config::Config;
pub use sources::nordpool::NordPoolClient;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<dyn PriceStore>,
    pub feed: Arc<dyn DayAheadFeed>,
    pub clock: Arc<dyn Clock>,
    pub config: Config,
}

/// Build the complete router
pub fn build_router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Read-only API: browsers only ever GET, and caching headers must be
    // visible cross-origin.
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .expose_headers([header::CACHE_CONTROL, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route("/", get(handlers::root))
        .route("/prices/{date}", get(handlers::get_prices))
        .route("/refresh", get(handlers::refresh))
        .route("/refresh/{date}", get(handlers::refresh_for_date))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
