//! Mapping entity: one row of the `urls` relation.

use chrono::{DateTime, Duration, Utc};

/// Number of days after which a mapping stops being served or reused.
pub const STALENESS_WINDOW_DAYS: i64 = 90;

/// Returns the staleness window as a [`Duration`].
pub fn staleness_window() -> Duration {
    Duration::days(STALENESS_WINDOW_DAYS)
}

/// Returns the oldest `created_at` that is still live at `now`.
///
/// A mapping is live iff `created_at > cutoff`, which is the same as
/// `now - created_at < 90 days`.
pub fn staleness_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - staleness_window()
}

/// A short path bound to its destination URL.
///
/// Rows are never deleted or rewritten by the service; only `clicks` changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub url: String,
    pub short_path: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(url: String, short_path: String, clicks: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            url,
            short_path,
            clicks,
            created_at,
        }
    }

    /// Returns true if the mapping has aged out of the staleness window at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= staleness_window()
    }
}

/// Input data for inserting a mapping. `clicks` always starts at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub short_path: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}
