//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod create;
pub mod health;
pub mod resolve;

pub use create::create_url_handler;
pub use health::health_handler;
pub use resolve::resolve_url_handler;
