//! HTTP request handlers for the Experience Consolidation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::NationalId;

use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/experience/:person_id", get(get_summary_handler))
        .route("/experience/:person_id/recompute", post(recompute_handler))
        .route(
            "/historical/:person_id/summary",
            get(historical_summary_handler),
        )
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    json_response(api_error.status, api_error.error)
}

/// Handler for GET /experience/:person_id.
///
/// Returns the stored summary, or 404 when no experience has been calculated.
async fn get_summary_handler(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = NationalId::from(person_id);

    match state.aggregator().summary(&id) {
        Ok(Some(summary)) => json_response(StatusCode::OK, summary),
        Ok(None) => {
            info!(correlation_id = %correlation_id, person_id = %id, "No summary stored");
            json_response(
                StatusCode::NOT_FOUND,
                ApiError::summary_not_found(&id.canonical()),
            )
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Summary read failed");
            error_response(err.into())
        }
    }
}

/// Handler for POST /experience/:person_id/recompute.
///
/// Called by the form collaborator after it commits a person's employment
/// entries. Recomputes and returns the committed summary.
async fn recompute_handler(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = NationalId::from(person_id);
    info!(correlation_id = %correlation_id, person_id = %id, "Processing recompute request");

    let aggregator = state.aggregator();
    let start_time = Instant::now();
    let task_id = id.clone();
    let result =
        tokio::task::spawn_blocking(move || aggregator.recompute_experience(&task_id)).await;

    match result {
        Ok(Ok(summary)) => {
            info!(
                correlation_id = %correlation_id,
                person_id = %id,
                total_days = summary.total_days,
                duration_us = start_time.elapsed().as_micros(),
                "Recompute completed successfully"
            );
            json_response(StatusCode::OK, summary)
        }
        Ok(Err(err)) => {
            warn!(
                correlation_id = %correlation_id,
                person_id = %id,
                error = %err,
                "Recompute failed"
            );
            error_response(err.into())
        }
        Err(join_error) => {
            error!(
                correlation_id = %correlation_id,
                person_id = %id,
                error = %join_error,
                "Recompute task aborted"
            );
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", "Recompute task aborted"),
            )
        }
    }
}

/// Handler for GET /historical/:person_id/summary.
///
/// Historical-ledger-only totals. An identifier with no ledger rows returns
/// an empty summary, not an error.
async fn historical_summary_handler(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = NationalId::from(person_id);

    match state.aggregator().historical_summary(&id) {
        Ok(summary) => json_response(StatusCode::OK, summary),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                person_id = %id,
                error = %err,
                "Historical summary failed"
            );
            error_response(err.into())
        }
    }
}
