//! API route configuration.

use crate::api::handlers::{create_url_handler, resolve_url_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes for the allocator and resolver.
///
/// # Endpoints
///
/// - `POST /urls`                - Create or reuse a short path
/// - `GET  /urls/{short_path}`   - Redirect to the stored URL and count the click
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_url_handler))
        .route("/urls/{short_path}", get(resolve_url_handler))
}
