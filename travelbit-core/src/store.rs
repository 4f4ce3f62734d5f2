//! Itinerary persistence.
//!
//! `ItineraryStore` has two implementations: [`PgItineraryStore`] for
//! production and [`MemoryItineraryStore`] for local runs and tests.
//! Records are insert-only; nothing here updates or deletes a row.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::error::TravelError;
use crate::models::{Itinerary, NewItinerary};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ItineraryStore: Send + Sync {
    /// Persist a completed itinerary and return its new id. A failed write
    /// leaves nothing behind.
    async fn create(&self, record: NewItinerary) -> Result<i64, StoreError>;

    /// Fetch by primary key. `Ok(None)` means no such record.
    async fn get(&self, id: i64) -> Result<Option<Itinerary>, StoreError>;

    /// Short backend description for health reporting.
    async fn health(&self) -> Result<String, StoreError>;

    fn name(&self) -> &str;
}

/// Build the store selected by `[database] backend`. The Postgres backend
/// connects and creates its table before returning.
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<dyn ItineraryStore>, TravelError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryItineraryStore::new())),
        "postgres" => {
            let pool = crate::db::create_pool(config).await?;
            crate::db::ensure_schema(&pool).await?;
            Ok(Arc::new(PgItineraryStore::new(pool)))
        }
        other => Err(TravelError::Other(format!(
            "unknown database backend '{}'",
            other
        ))),
    }
}

// ============================================================================
// PgItineraryStore
// ============================================================================

#[derive(Debug, Clone)]
pub struct PgItineraryStore {
    pool: PgPool,
}

impl PgItineraryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItineraryStore for PgItineraryStore {
    async fn create(&self, record: NewItinerary) -> Result<i64, StoreError> {
        // Dropping an uncommitted transaction rolls it back.
        let mut tx = self.pool.begin().await?;

        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO itineraries
                (user_request, destination, travel_dates, traveler_count, budget, generated_itinerary)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&record.user_request)
        .bind(&record.destination)
        .bind(&record.travel_dates)
        .bind(record.traveler_count)
        .bind(&record.budget)
        .bind(&record.generated_itinerary)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(id = row.0, destination = %record.destination, "Itinerary stored");
        Ok(row.0)
    }

    async fn get(&self, id: i64) -> Result<Option<Itinerary>, StoreError> {
        let record = sqlx::query_as::<_, Itinerary>(
            r#"
            SELECT id, user_request, destination, travel_dates, traveler_count,
                   budget, generated_itinerary, created_at
            FROM itineraries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn health(&self) -> Result<String, StoreError> {
        Ok(crate::db::health_check(&self.pool).await?)
    }

    fn name(&self) -> &str {
        "postgres"
    }
}

// ============================================================================
// MemoryItineraryStore
// ============================================================================

/// In-process store; ids start at 1. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryItineraryStore {
    records: Mutex<Vec<Itinerary>>,
}

impl MemoryItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ItineraryStore for MemoryItineraryStore {
    async fn create(&self, record: NewItinerary) -> Result<i64, StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let id = records.last().map(|r| r.id + 1).unwrap_or(1);
        records.push(Itinerary {
            id,
            user_request: record.user_request,
            destination: record.destination,
            travel_dates: record.travel_dates,
            traveler_count: record.traveler_count,
            budget: record.budget,
            generated_itinerary: record.generated_itinerary,
            created_at: Utc::now(),
        });

        tracing::debug!(id, "Itinerary stored in memory");
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Itinerary>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn health(&self) -> Result<String, StoreError> {
        Ok(format!("in-memory ({} records)", self.len()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
