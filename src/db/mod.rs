use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::types::{PriceEntry, PriceStore, Result};

pub async fn init_db(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed price store over the append-only `price_history` table.
pub struct PgPriceStore {
    pool: PgPool,
}

impl PgPriceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceStore for PgPriceStore {
    async fn insert_prices(&self, entries: &[PriceEntry]) -> Result<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        // Re-running a refresh must never duplicate or rewrite a row;
        // delivery_start is the primary key and conflicts are dropped.
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO price_history (delivery_start, delivery_end, price) ");
        builder.push_values(entries, |mut row, entry| {
            row.push_bind(entry.delivery_start)
                .push_bind(entry.delivery_end)
                .push_bind(entry.price);
        });
        builder.push(" ON CONFLICT (delivery_start) DO NOTHING");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn get_prices(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PriceEntry>> {
        let entries = sqlx::query_as::<_, PriceEntry>(
            "SELECT price, delivery_start, delivery_end \
             FROM price_history \
             WHERE delivery_start >= $1 AND delivery_start < $2 \
             ORDER BY delivery_start",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
