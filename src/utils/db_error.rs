//! Classification of database errors raised by inserts.

/// Name of the unique constraint on `urls.short_path`.
pub const SHORT_PATH_UNIQUE_CONSTRAINT: &str = "urls_short_path_key";

/// Returns true if `e` is a uniqueness violation on `urls.short_path`.
///
/// Unique violations on any other constraint are not collisions and must be
/// escalated by the caller.
pub fn is_unique_violation_on_short_path(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_PATH_UNIQUE_CONSTRAINT))
}
