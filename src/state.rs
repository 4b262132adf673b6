//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::infrastructure::persistence::PgUrlRepository;

/// State shared by all HTTP handlers.
///
/// Carries the service explicitly; handlers never reach for a global
/// connection.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService<PgUrlRepository>>,
}

impl AppState {
    pub fn new(url_service: Arc<UrlService<PgUrlRepository>>) -> Self {
        Self { url_service }
    }
}
