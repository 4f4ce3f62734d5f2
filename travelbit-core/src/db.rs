use crate::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};

const CREATE_ITINERARIES: &str = r#"
CREATE TABLE IF NOT EXISTS itineraries (
    id                  BIGSERIAL PRIMARY KEY,
    user_request        TEXT        NOT NULL,
    destination         TEXT        NOT NULL,
    travel_dates        TEXT        NOT NULL,
    traveler_count      INTEGER     NOT NULL,
    budget              TEXT        NOT NULL,
    generated_itinerary TEXT        NOT NULL,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}

/// Create the `itineraries` table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_ITINERARIES).execute(pool).await?;
    Ok(())
}

pub async fn health_check(pool: &PgPool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT version()").fetch_one(pool).await?;
    Ok(row.0)
}
