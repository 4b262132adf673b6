//! Repository trait for the `urls` relation.

use crate::domain::entities::{Mapping, NewMapping};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Result of an insert attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was committed.
    Created(Mapping),
    /// The unique constraint on `short_path` rejected the row. Nothing was written.
    Collision,
}

/// Result of a resolve-and-count attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No live row has this short path. Nothing was written.
    Missing,
    /// Exactly one live row matched; its click count was incremented and committed.
    /// The mapping carries the post-increment count.
    Resolved(Mapping),
    /// More than one live row matched. Nothing was written.
    Ambiguous(usize),
}

/// Aggregate counters over the whole relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UrlTotals {
    pub mappings: i64,
    pub live_mappings: i64,
    pub clicks: i64,
}

/// Storage interface for short path mappings.
///
/// Staleness is passed in as a `cutoff`: a row is live iff `created_at > cutoff`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds live mappings whose `url` equals `url` byte for byte.
    ///
    /// Returns at most two rows; two rows already prove an ambiguous state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] on database errors.
    async fn find_live_by_url(
        &self,
        url: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Mapping>, AppError>;

    /// Inserts a mapping with `clicks = 0`, all or nothing.
    ///
    /// # Errors
    ///
    /// A uniqueness violation on `short_path` is reported as
    /// [`InsertOutcome::Collision`], not as an error. Every other failure is
    /// returned as [`AppError::StorageFailure`].
    async fn insert(&self, new_mapping: NewMapping) -> Result<InsertOutcome, AppError>;

    /// Looks up the live mapping for `short_path` and increments its click
    /// count in the same transaction.
    ///
    /// Concurrent calls for the same short path are serialized by a row lock,
    /// so no increment is lost.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] if the read, the update or the
    /// commit fails. In that case the increment is not applied.
    async fn resolve(
        &self,
        short_path: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Resolution, AppError>;

    /// Finds a mapping by short path regardless of staleness.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] on database errors.
    async fn find_by_short_path(&self, short_path: &str) -> Result<Option<Mapping>, AppError>;

    /// Counts mappings, live mappings and clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] on database errors.
    async fn totals(&self, cutoff: DateTime<Utc>) -> Result<UrlTotals, AppError>;

    /// Returns true if the store answers a trivial query.
    async fn health_check(&self) -> bool;
}
