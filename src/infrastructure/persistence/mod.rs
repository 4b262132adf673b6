//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! parameterized queries.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - Mapping storage, reuse lookup and click accounting

pub mod pg_url_repository;

pub use pg_url_repository::PgUrlRepository;
