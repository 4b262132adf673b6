//! Short path allocation and resolution.
//!
//! # Allocation
//!
//! 1. Validate the URL (shape, then host denylist) before touching storage
//! 2. Reuse the live mapping for the exact same URL string if there is one
//! 3. Otherwise generate a code and insert it, retrying on `short_path`
//!    collisions up to [`MAX_ALLOCATION_ATTEMPTS`] times in total
//!
//! # Resolution
//!
//! Looks up the live mapping for a short path and increments its click
//! count in one storage transaction.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::clock::Clock;
use crate::domain::entities::{Mapping, NewMapping, staleness_cutoff};
use crate::domain::repositories::{InsertOutcome, Resolution, UrlRepository, UrlTotals};
use crate::error::AppError;
use crate::utils::code_generator::{SHORT_PATH_LENGTH, generate_short_path, validate_short_path};
use crate::utils::url_validator::{HostBlacklist, validate_url};

/// Total insert attempts per allocation: one initial attempt plus three retries.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 4;

/// Whether an allocation wrote a new row or returned an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// A new row was inserted (HTTP 201).
    Created,
    /// A live row for the same URL already existed (HTTP 200).
    Reused,
}

/// Result of [`UrlService::shorten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub mapping: Mapping,
    pub outcome: AllocationOutcome,
}

/// Allocator and resolver over an injected repository and clock.
///
/// Holds no mutable state of its own; all shared state lives in the store.
pub struct UrlService<R: UrlRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    blacklist: HostBlacklist,
}

impl<R: UrlRepository> UrlService<R> {
    /// Creates a new URL service.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, blacklist: HostBlacklist) -> Self {
        Self {
            repository,
            clock,
            blacklist,
        }
    }

    /// Returns an existing live short path for `url` or creates a new one.
    ///
    /// URLs are compared as literal strings: no normalization is applied.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] / [`AppError::BlacklistedUrl`] before any storage access
    /// - [`AppError::AmbiguousState`] if more than one live row has this URL
    /// - [`AppError::AllocationExhausted`] if every attempt collided
    /// - [`AppError::StorageFailure`] on any other storage error, without retrying
    pub async fn shorten(&self, url: &str) -> Result<Allocation, AppError> {
        let url = validate_url(url, &self.blacklist)?;

        let now = self.clock.now();
        let mut existing = self
            .repository
            .find_live_by_url(url, staleness_cutoff(now))
            .await?;

        if existing.len() > 1 {
            error!(
                "Found {} live short paths for url {}, refusing to pick one",
                existing.len(),
                url
            );
            return Err(AppError::ambiguous_state(
                "More than one live short path exists for this url",
                json!({ "url": url, "matches": existing.len() }),
            ));
        }

        if let Some(mapping) = existing.pop() {
            info!("Reusing short path {} for url {}", mapping.short_path, url);
            return Ok(Allocation {
                mapping,
                outcome: AllocationOutcome::Reused,
            });
        }

        info!("No short path exists for the url {}", url);

        let mapping = self.allocate(url, MAX_ALLOCATION_ATTEMPTS).await?;

        info!(
            "Short URL {} for {} successfully generated",
            mapping.short_path, url
        );

        Ok(Allocation {
            mapping,
            outcome: AllocationOutcome::Created,
        })
    }

    /// Runs the bounded creation loop.
    ///
    /// A collision or a code that fails shape validation consumes one attempt.
    /// Any storage error ends the loop immediately.
    async fn allocate(&self, url: &str, max_attempts: usize) -> Result<Mapping, AppError> {
        for attempt in 1..=max_attempts {
            let short_path = generate_short_path(SHORT_PATH_LENGTH as i64)?;

            if let Err(e) = validate_short_path(&short_path) {
                warn!(
                    "Could not generate short URL (attempt {}/{}), cause: {}",
                    attempt, max_attempts, e
                );
                continue;
            }

            let new_mapping = NewMapping {
                short_path,
                url: url.to_string(),
                created_at: self.clock.now(),
            };

            match self.repository.insert(new_mapping).await? {
                InsertOutcome::Created(mapping) => return Ok(mapping),
                InsertOutcome::Collision => {
                    warn!(
                        "Could not generate short URL (attempt {}/{}), cause: short path collision",
                        attempt, max_attempts
                    );
                }
            }
        }

        error!(
            "Short URL for {} could not be generated after {} attempts",
            url, max_attempts
        );

        Err(AppError::AllocationExhausted {
            attempts: max_attempts,
        })
    }

    /// Returns the live mapping for `short_path` after counting one click.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no live row matches; nothing is written
    /// - [`AppError::AmbiguousState`] if more than one live row matches; nothing is written
    /// - [`AppError::StorageFailure`] if the increment could not be committed
    pub async fn resolve(&self, short_path: &str) -> Result<Mapping, AppError> {
        let cutoff = staleness_cutoff(self.clock.now());

        match self.repository.resolve(short_path, cutoff).await? {
            Resolution::Resolved(mapping) => {
                debug!(
                    "Resolved {} to {} ({} clicks)",
                    short_path, mapping.url, mapping.clicks
                );
                Ok(mapping)
            }
            Resolution::Missing => {
                warn!("No url could be found for short path {}", short_path);
                Err(AppError::not_found(
                    "Not found",
                    json!({ "short_path": short_path }),
                ))
            }
            Resolution::Ambiguous(matches) => {
                error!(
                    "Found {} live rows for short path {}, refusing to pick one",
                    matches, short_path
                );
                Err(AppError::ambiguous_state(
                    "More than one live url exists for this short path",
                    json!({ "short_path": short_path, "matches": matches }),
                ))
            }
        }
    }

    /// Returns a mapping regardless of staleness, without counting a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the short path was never allocated.
    pub async fn lookup(&self, short_path: &str) -> Result<Mapping, AppError> {
        self.repository
            .find_by_short_path(short_path)
            .await?
            .ok_or_else(|| AppError::not_found("Not found", json!({ "short_path": short_path })))
    }

    /// Returns aggregate counters relative to the current staleness window.
    pub async fn totals(&self) -> Result<UrlTotals, AppError> {
        let cutoff = staleness_cutoff(self.clock.now());
        self.repository.totals(cutoff).await
    }

    /// Returns true if the backing store is reachable.
    pub async fn storage_healthy(&self) -> bool {
        self.repository.health_check().await
    }

    /// Returns true if `mapping` is outside the staleness window right now.
    pub fn is_stale(&self, mapping: &Mapping) -> bool {
        mapping.is_stale(self.clock.now())
    }
}
