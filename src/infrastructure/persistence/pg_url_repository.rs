//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{InsertOutcome, Resolution, UrlRepository, UrlTotals};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_short_path;

#[derive(Debug, FromRow)]
struct MappingRow {
    url: String,
    short_path: String,
    clicks: i64,
    created_at: DateTime<Utc>,
}

impl From<MappingRow> for Mapping {
    fn from(r: MappingRow) -> Self {
        Mapping::new(r.url, r.short_path, r.clicks, r.created_at)
    }
}

#[derive(Debug, FromRow)]
struct TotalsRow {
    mappings: i64,
    live_mappings: i64,
    clicks: i64,
}

/// PostgreSQL repository for the `urls` relation.
///
/// All statements are parameterized. Connections are borrowed from the pool
/// per call and returned on every exit path, including errors.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_live_by_url(
        &self,
        url: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Mapping>, AppError> {
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT url, short_path, clicks, created_at
            FROM urls
            WHERE url = $1 AND created_at > $2
            ORDER BY created_at DESC
            LIMIT 2
            "#,
        )
        .bind(url)
        .bind(cutoff)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Mapping::from).collect())
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<InsertOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, MappingRow>(
            r#"
            INSERT INTO urls (short_path, url, clicks, created_at)
            VALUES ($1, $2, 0, $3)
            RETURNING url, short_path, clicks, created_at
            "#,
        )
        .bind(&new_mapping.short_path)
        .bind(&new_mapping.url)
        .bind(new_mapping.created_at)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                Ok(InsertOutcome::Created(row.into()))
            }
            Err(e) if is_unique_violation_on_short_path(&e) => {
                tx.rollback().await?;
                Ok(InsertOutcome::Collision)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve(
        &self,
        short_path: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Resolution, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent resolutions of the same short path.
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT url, short_path, clicks, created_at
            FROM urls
            WHERE short_path = $1 AND created_at > $2
            LIMIT 2
            FOR UPDATE
            "#,
        )
        .bind(short_path)
        .bind(cutoff)
        .fetch_all(&mut *tx)
        .await?;

        match rows.len() {
            0 => {
                tx.rollback().await?;
                return Ok(Resolution::Missing);
            }
            1 => {}
            n => {
                tx.rollback().await?;
                return Ok(Resolution::Ambiguous(n));
            }
        }

        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            UPDATE urls
            SET clicks = clicks + 1
            WHERE short_path = $1 AND created_at > $2
            RETURNING url, short_path, clicks, created_at
            "#,
        )
        .bind(short_path)
        .bind(cutoff)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Resolution::Resolved(row.into()))
    }

    async fn find_by_short_path(&self, short_path: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT url, short_path, clicks, created_at
            FROM urls
            WHERE short_path = $1
            "#,
        )
        .bind(short_path)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn totals(&self, cutoff: DateTime<Utc>) -> Result<UrlTotals, AppError> {
        let row = sqlx::query_as::<_, TotalsRow>(
            r#"
            SELECT
                COUNT(*)                                        AS mappings,
                COUNT(*) FILTER (WHERE created_at > $1)         AS live_mappings,
                COALESCE(SUM(clicks), 0)::BIGINT                AS clicks
            FROM urls
            "#,
        )
        .bind(cutoff)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(UrlTotals {
            mappings: row.mappings,
            live_mappings: row.live_mappings,
            clicks: row.clicks,
        })
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
