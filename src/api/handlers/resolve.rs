//! Handler for short path redirects.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::to_location;

/// Redirects a short path to its URL and counts the click.
///
/// # Endpoint
///
/// `GET /urls/{short_path}`
///
/// The click is committed before the redirect is returned; if the increment
/// fails, the caller gets an error instead of a redirect.
///
/// # Response Codes
///
/// - **302 Found**: `Location` holds the destination URL
/// - **404 Not Found**: no live mapping for this short path
/// - **400 Bad Request**: more than one live mapping matched
/// - **500 Internal Server Error**: the stored row could not be served
pub async fn resolve_url_handler(
    Path(short_path): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let mapping = state.url_service.resolve(&short_path).await?;
    let location = location_header(&short_path, &mapping.url)?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Builds the `Location` value for a stored url.
///
/// The url was validated when it was written, so a value that cannot be
/// sent as a header means the stored row itself is bad.
fn location_header(short_path: &str, stored_url: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&to_location(stored_url)).map_err(|e| {
        AppError::storage_failure(
            "Stored url cannot be used as a redirect target",
            json!({ "short_path": short_path, "reason": e.to_string() }),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_header_for_stored_url() {
        let location = location_header("A1b2C3d", "https://example.com/a").unwrap();

        assert_eq!(location, "https://example.com/a");
    }

    #[test]
    fn test_unusable_stored_url_is_storage_failure() {
        let result = location_header("A1b2C3d", "not a url\nX-Injected: 1");

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::StorageFailure { .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
