//! HTTP routes for the hashing service.
//!
//! - `POST /hash` - admit a value, respond with its id.
//! - `GET /hash/{id}` - respond with the digest once persisted.
//! - `GET /stats` - request count and mean create latency.
//! - `POST /shutdown` - trigger a graceful shutdown.
//!
//! Every call to `POST /hash` is timed by the shared [`Stats`] aggregator.

use crate::server::{
    error::ApiError,
    telemetry::{
        increment_create_errors, increment_creates, increment_lookup_misses, increment_lookups,
        record_create_duration,
    },
};
use axum::{
    Form, Json, Router,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
    routing::{get, post},
};
use hashpipe::{HashingService, Pipeline, Stats, StatsSnapshot};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    stats: Arc<Stats>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            stats: Arc::new(Stats::new()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    /// Cancelled when a client calls `POST /shutdown`.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

#[derive(Debug, Deserialize)]
struct HashForm {
    #[serde(default)]
    password: String,
}

/// Builds the router with all routes bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/hash", post(create_hash))
        .route("/hash/{id}", get(get_hash))
        .route("/stats", get(stats))
        .route("/shutdown", post(shutdown))
        .with_state(state)
}

#[tracing::instrument(skip_all)]
async fn create_hash(
    State(state): State<AppState>,
    form: Result<Form<HashForm>, FormRejection>,
) -> Result<String, ApiError> {
    let start = std::time::Instant::now();
    // Malformed bodies are counted like any other create.
    let result = state.stats.wrap(|| {
        let Form(form) = form?;
        // Clients commonly send the value with a trailing newline.
        let value = form.password.strip_suffix('\n').unwrap_or(&form.password);
        state.pipeline.create(value).map_err(ApiError::from)
    });
    record_create_duration(start.elapsed().as_micros() as f64);
    increment_creates();

    match result {
        Ok(record) => {
            tracing::debug!("Admitted item.id={}", record.id());
            Ok(record.id().to_string())
        }
        Err(err) => {
            increment_create_errors();
            tracing::debug!("Rejected create: {err}");
            Err(err)
        }
    }
}

#[tracing::instrument(skip(state))]
async fn get_hash(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    let id: u64 = id.parse().map_err(|e: core::num::ParseIntError| ApiError::InvalidId {
        reason: e.to_string(),
        id,
    })?;

    increment_lookups();
    match state.pipeline.get(id) {
        Ok(record) => Ok(record.into_digest()),
        Err(err) => {
            increment_lookup_misses();
            Err(err.into())
        }
    }
}

async fn stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}

async fn shutdown(State(state): State<AppState>) -> StatusCode {
    tracing::info!("Shutdown requested over HTTP");
    state.shutdown.cancel();
    StatusCode::OK
}
