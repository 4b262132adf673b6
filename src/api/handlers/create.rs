//! Handler for the allocation endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::urls::{CreateUrlRequest, ShortPathResponse};
use crate::application::services::AllocationOutcome;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a short path for a long URL, creating one if needed.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "short_path": "A1b2C3d" }
/// ```
///
/// - **201 Created**: a new mapping was written
/// - **200 OK**: a live mapping for the exact same URL was reused
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid or blacklisted URL, a malformed
/// body, an ambiguous store state, or when every allocation attempt collided.
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortPathResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::malformed_request(
            "Request body must be a JSON object with a \"url\" string",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    let allocation = state.url_service.shorten(&payload.url).await?;

    let status = match allocation.outcome {
        AllocationOutcome::Created => StatusCode::CREATED,
        AllocationOutcome::Reused => StatusCode::OK,
    };

    Ok((
        status,
        Json(ShortPathResponse {
            short_path: allocation.mapping.short_path,
        }),
    ))
}
