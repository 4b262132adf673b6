//! DTOs for the `/urls` endpoints.

use serde::{Deserialize, Serialize};

/// Request to shorten a URL.
///
/// The URL is kept exactly as sent; validation happens in the service layer.
#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
}

/// Response carrying the allocated or reused short path.
#[derive(Debug, Serialize)]
pub struct ShortPathResponse {
    pub short_path: String,
}
