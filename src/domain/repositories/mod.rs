//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for testing.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Mapping lookup, insertion and click accounting

pub mod url_repository;

pub use url_repository::{InsertOutcome, Resolution, UrlRepository, UrlTotals};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
