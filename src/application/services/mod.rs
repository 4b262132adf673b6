//! Business logic services for the application layer.

pub mod url_service;

pub use url_service::{Allocation, AllocationOutcome, MAX_ALLOCATION_ATTEMPTS, UrlService};
