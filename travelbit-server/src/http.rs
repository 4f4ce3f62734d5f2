//! Travelbit HTTP API
//!
//! Axum server exposing itinerary generation, lookup and destination imagery.
//!
//! Each endpoint has a thin axum handler that delegates to an inner function
//! returning `(StatusCode, serde_json::Value)`. The inner functions are
//! directly testable without axum dispatch.
//!
//! Endpoints:
//! - POST /generate-itinerary: validate, prompt, complete, persist
//! - GET  /get-itinerary/:id: fetch a stored itinerary
//! - GET  /get-destination-images: three placeholder image descriptors
//! - GET  /health: store and completion status
//! - GET  /version: server version info

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use travelbit_core::prompt::{build_prompt, TripRequest, SYSTEM_PROMPT};
use travelbit_core::providers::price_hints;
use travelbit_core::{
    CompletionBackend, ImageProvider, ItineraryStore, ItineraryView, MockImageProvider,
    MockPricingProvider, NewItinerary, PricingProvider, TravelConfig,
};

pub const GENERATION_FAILED: &str = "Failed to generate itinerary";
pub const SAVE_FAILED: &str = "Failed to save itinerary";
pub const NOT_FOUND: &str = "Itinerary not found";
pub const DESTINATION_REQUIRED: &str = "Destination parameter is required";

/// Shared state for all HTTP handlers
pub struct HttpState {
    pub config: TravelConfig,
    pub store: Arc<dyn ItineraryStore>,
    pub completion: Arc<dyn CompletionBackend>,
    pub images: Arc<dyn ImageProvider>,
    pub pricing: Arc<dyn PricingProvider>,
}

impl HttpState {
    /// State with the placeholder image and pricing providers.
    pub fn new(
        config: TravelConfig,
        store: Arc<dyn ItineraryStore>,
        completion: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            config,
            store,
            completion,
            images: Arc::new(MockImageProvider),
            pricing: Arc::new(MockPricingProvider),
        }
    }

    pub fn with_images(mut self, images: Arc<dyn ImageProvider>) -> Self {
        self.images = images;
        self
    }

    pub fn with_pricing(mut self, pricing: Arc<dyn PricingProvider>) -> Self {
        self.pricing = pricing;
        self
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/generate-itinerary", post(generate_handler))
        .route("/get-itinerary/:id", get(get_itinerary_handler))
        .route("/get-destination-images", get(destination_images_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<HttpState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", state.config.http.host, state.config.http.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Travelbit HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

/// First value of `key` in decoded query pairs. Repeated keys keep the first.
pub fn first_query_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn error_body(msg: impl Into<String>) -> Value {
    let msg: String = msg.into();
    json!({ "error": msg })
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner generate: validation, prompt, completion, then best-effort persistence.
pub async fn generate_inner(state: &HttpState, payload: Value) -> (StatusCode, Value) {
    let trip = match TripRequest::from_payload(&payload) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected generate request");
            return (StatusCode::BAD_REQUEST, error_body(e.to_string()));
        }
    };

    let hints = state.config.pricing.include_in_prompt.then(|| {
        price_hints(state.pricing.as_ref(), &state.config.pricing.origin, &trip)
    });
    let prompt = build_prompt(&trip, hints.as_ref());

    let start = Instant::now();
    let itinerary = match state.completion.complete(SYSTEM_PROMPT, &prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::error!(backend = state.completion.name(), "Completion returned no text");
            return (StatusCode::INTERNAL_SERVER_ERROR, error_body(GENERATION_FAILED));
        }
        Err(e) => {
            tracing::error!(
                backend = state.completion.name(),
                error = %e,
                "Error generating itinerary"
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, error_body(GENERATION_FAILED));
        }
    };
    tracing::info!(
        destination = %trip.destination,
        took_ms = start.elapsed().as_millis() as u64,
        "Itinerary generated"
    );

    let record = NewItinerary {
        user_request: prompt,
        destination: trip.destination.clone(),
        travel_dates: trip.travel_dates(),
        traveler_count: trip.travelers,
        budget: trip.budget.clone(),
        generated_itinerary: itinerary.clone(),
    };

    match state.store.create(record).await {
        Ok(id) => (StatusCode::OK, json!({ "itinerary": itinerary, "id": id })),
        Err(e) if state.config.database.require_persistence => {
            tracing::error!(store = state.store.name(), error = %e, "Error saving itinerary");
            (StatusCode::INTERNAL_SERVER_ERROR, error_body(SAVE_FAILED))
        }
        Err(e) => {
            tracing::warn!(
                store = state.store.name(),
                error = %e,
                "Error saving itinerary; returning it without an id"
            );
            (StatusCode::OK, json!({ "itinerary": itinerary, "id": null }))
        }
    }
}

/// Inner lookup. Non-numeric ids are reported as not found.
pub async fn get_itinerary_inner(store: &dyn ItineraryStore, id: &str) -> (StatusCode, Value) {
    let id: i64 = match id.parse() {
        Ok(id) => id,
        Err(_) => return (StatusCode::NOT_FOUND, error_body(NOT_FOUND)),
    };

    match store.get(id).await {
        Ok(Some(record)) => match serde_json::to_value(ItineraryView::from(record)) {
            Ok(body) => (StatusCode::OK, body),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())),
        },
        Ok(None) => (StatusCode::NOT_FOUND, error_body(NOT_FOUND)),
        Err(e) => {
            tracing::error!(id, error = %e, "Error loading itinerary");
            (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string()))
        }
    }
}

/// Inner images, pure, no IO.
pub fn destination_images_inner(
    images: &dyn ImageProvider,
    destination: Option<&str>,
) -> (StatusCode, Value) {
    let destination = match destination {
        Some(d) if !d.is_empty() => d,
        _ => return (StatusCode::BAD_REQUEST, error_body(DESTINATION_REQUIRED)),
    };

    (StatusCode::OK, json!({ "images": images.images(destination) }))
}

/// Inner health check, asks the store for its status.
pub async fn health_inner(state: &HttpState) -> (StatusCode, Value) {
    match state.store.health().await {
        Ok(store) => (
            StatusCode::OK,
            json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "store": store,
                "completion": state.completion.name(),
                "completion_key_configured": state.config.completion.has_api_key(),
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({
                "status": "unhealthy",
                "error": e.to_string(),
            }),
        ),
    }
}

/// Inner version, returns version info (pure, no IO).
pub fn version_inner() -> Value {
    json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": "travelbit",
    })
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

pub async fn generate_handler(
    State(state): State<Arc<HttpState>>,
    payload: Option<Json<Value>>,
) -> impl IntoResponse {
    let payload = payload.map(|Json(v)| v).unwrap_or(Value::Null);
    let (status, body) = generate_inner(&state, payload).await;
    (status, Json(body))
}

pub async fn get_itinerary_handler(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let (status, body) = get_itinerary_inner(state.store.as_ref(), &id).await;
    (status, Json(body))
}

pub async fn destination_images_handler(
    State(state): State<Arc<HttpState>>,
    query: Option<Query<Vec<(String, String)>>>,
) -> impl IntoResponse {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let destination = first_query_value(&pairs, "destination");
    let (status, body) = destination_images_inner(state.images.as_ref(), destination);
    (status, Json(body))
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

// ============================================================================
// Unit Tests: call inner functions directly
// ============================================================================
