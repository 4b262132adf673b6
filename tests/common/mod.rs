#![allow(dead_code)]

use chrono::{DateTime, Utc};
use shortpath::infrastructure::persistence::PgUrlRepository;
use shortpath::prelude::{AppState, FixedClock, SystemClock, UrlService};
use shortpath::utils::url_validator::HostBlacklist;
use sqlx::PgPool;
use std::sync::Arc;

pub async fn insert_mapping(
    pool: &PgPool,
    url: &str,
    short_path: &str,
    clicks: i64,
    created_at: DateTime<Utc>,
) {
    sqlx::query(
        r#"
        INSERT INTO urls (short_path, url, clicks, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(short_path)
    .bind(url)
    .bind(clicks)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn get_clicks(pool: &PgPool, short_path: &str) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM urls WHERE short_path = $1")
        .bind(short_path)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_repository(pool: PgPool) -> PgUrlRepository {
    PgUrlRepository::new(Arc::new(pool))
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let repository = Arc::new(create_repository(pool));
    let service = UrlService::new(repository, Arc::new(SystemClock), HostBlacklist::default());

    AppState::new(Arc::new(service))
}

pub fn create_test_state_with_clock(pool: PgPool, clock: Arc<FixedClock>) -> AppState {
    let repository = Arc::new(create_repository(pool));
    let service = UrlService::new(repository, clock, HostBlacklist::new(&["blocked.test"]));

    AppState::new(Arc::new(service))
}
