use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;

use compass_core::event::{Event, EventRow};

use crate::{error::AppError, state::AppState};

/// `POST /api/compass-event` — ingest a single event.
///
/// ## Validation
/// Presence-only, and it runs before a connection is ever acquired:
/// - `type` missing (or unknown) → 400; the tagged event model rejects it
///   at deserialization.
/// - Strict mode (default): `path` and `timestamp` are also required → 400.
/// - Lenient mode: a missing `timestamp` falls back to server receive time.
///
/// ## Persistence
/// One pooled connection, one parameterized INSERT, released on every
/// outcome. A terminated connection or exhausted pool answers 503 so a
/// caller that *does* retry knows it may succeed later; other storage
/// failures answer 500.
///
/// ## Response
/// `200 {"success":true}`. Delivery is beacon-driven and at-most-once on
/// the client side; the endpoint does not deduplicate, so a repeated
/// beacon produces a second row.
#[tracing::instrument(skip(state, payload))]
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Event>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(event) = payload.map_err(|e| AppError::BadRequest(format!("invalid event: {e}")))?;

    if state.config.strict_events {
        if event.path.is_none() {
            return Err(AppError::BadRequest("path is required".to_string()));
        }
        if event.timestamp.is_none() {
            return Err(AppError::BadRequest("timestamp is required".to_string()));
        }
    }

    let row = EventRow::from_event(event, Utc::now());
    state.store.insert_event(&row).await?;

    Ok(Json(json!({ "success": true })))
}

/// Any verb other than POST on the ingest route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
