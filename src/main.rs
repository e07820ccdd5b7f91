use std::sync::Arc;

use tracing::{info, Level};

use spot_price_api::{build_router, db, AppState, Config, NordPoolClient, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = Config::from_env();
    info!("Starting spot price API...");

    let pool = db::init_db(&config.database_url).await?;
    info!("✓ Database connected");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("✓ Migrations applied");

    let state = Arc::new(AppState {
        store: Arc::new(db::PgPriceStore::new(pool)),
        feed: Arc::new(NordPoolClient::new(config.feed_base_url.clone())),
        clock: Arc::new(SystemClock),
        config: config.clone(),
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("🚀 Spot price API listening on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
