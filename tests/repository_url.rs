mod common;

use chrono::{Duration, SubsecRound, Utc};
use serde_json::json;
use shortpath::domain::entities::{NewMapping, staleness_cutoff};
use shortpath::domain::repositories::{InsertOutcome, Resolution, UrlRepository};
use shortpath::error::AppError;
use shortpath::utils::db_error::is_unique_violation_on_short_path;
use sqlx::PgPool;
use std::sync::Arc;

fn new_mapping(short_path: &str, url: &str) -> NewMapping {
    NewMapping {
        short_path: short_path.to_string(),
        url: url.to_string(),
        created_at: Utc::now(),
    }
}

#[sqlx::test]
async fn test_insert_creates_mapping_with_zero_clicks(pool: PgPool) {
    let repo = common::create_repository(pool.clone());

    let outcome = repo
        .insert(new_mapping("Abc1234", "https://example.com/a"))
        .await
        .unwrap();

    match outcome {
        InsertOutcome::Created(mapping) => {
            assert_eq!(mapping.short_path, "Abc1234");
            assert_eq!(mapping.url, "https://example.com/a");
            assert_eq!(mapping.clicks, 0);
        }
        InsertOutcome::Collision => panic!("expected a created mapping"),
    }

    assert_eq!(common::count_rows(&pool).await, 1);
}

#[sqlx::test]
async fn test_insert_duplicate_short_path_is_collision(pool: PgPool) {
    let repo = common::create_repository(pool.clone());
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 0, Utc::now()).await;

    let outcome = repo
        .insert(new_mapping("Abc1234", "https://example.com/b"))
        .await
        .unwrap();

    assert!(matches!(outcome, InsertOutcome::Collision));
    assert_eq!(common::count_rows(&pool).await, 1);
}

#[sqlx::test]
async fn test_insert_collides_with_stale_short_path(pool: PgPool) {
    let repo = common::create_repository(pool.clone());
    let old = Utc::now() - Duration::days(200);
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 3, old).await;

    let outcome = repo
        .insert(new_mapping("Abc1234", "https://example.com/b"))
        .await
        .unwrap();

    assert!(matches!(outcome, InsertOutcome::Collision));
}

#[sqlx::test]
async fn test_insert_escalates_other_unique_violations(pool: PgPool) {
    sqlx::query("CREATE UNIQUE INDEX urls_url_unique ON urls (url)")
        .execute(&pool)
        .await
        .unwrap();
    let repo = common::create_repository(pool.clone());
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 0, Utc::now()).await;

    let result = repo
        .insert(new_mapping("Xyz9876", "https://example.com/a"))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::StorageFailure { .. }));
    assert_eq!(err.to_error_info().details, json!({}));
    assert_eq!(common::count_rows(&pool).await, 1);
}

#[sqlx::test]
async fn test_short_path_violation_is_classified_as_collision(pool: PgPool) {
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 0, Utc::now()).await;

    let err = sqlx::query("INSERT INTO urls (short_path, url) VALUES ($1, $2)")
        .bind("Abc1234")
        .bind("https://example.com/b")
        .execute(&pool)
        .await
        .unwrap_err();

    assert!(is_unique_violation_on_short_path(&err));
}

#[sqlx::test]
async fn test_check_violation_is_not_a_collision(pool: PgPool) {
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 0, Utc::now()).await;

    let err = sqlx::query("UPDATE urls SET clicks = -1 WHERE short_path = $1")
        .bind("Abc1234")
        .execute(&pool)
        .await
        .unwrap_err();

    assert!(!is_unique_violation_on_short_path(&err));

    let app_err = AppError::from(err);
    assert!(matches!(app_err, AppError::StorageFailure { .. }));
    assert_eq!(app_err.to_error_info().details, json!({}));
}

#[sqlx::test]
async fn test_find_live_by_url_excludes_stale_rows(pool: PgPool) {
    let repo = common::create_repository(pool.clone());
    // Whole seconds so the boundary row survives the round trip exactly.
    let now = Utc::now().trunc_subsecs(0);
    let boundary = now - Duration::days(90);
    let recent = now - Duration::days(89);
    common::insert_mapping(&pool, "https://example.com/a", "Old0001", 0, boundary).await;
    common::insert_mapping(&pool, "https://example.com/a", "New0001", 0, recent).await;

    let found = repo
        .find_live_by_url("https://example.com/a", staleness_cutoff(now))
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].short_path, "New0001");
}

#[sqlx::test]
async fn test_find_live_by_url_matches_literally(pool: PgPool) {
    let repo = common::create_repository(pool.clone());
    let now = Utc::now();
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 0, now).await;

    let found = repo
        .find_live_by_url("https://example.com/a/", staleness_cutoff(now))
        .await
        .unwrap();

    assert!(found.is_empty());
}

#[sqlx::test]
async fn test_resolve_increments_clicks(pool: PgPool) {
    let repo = common::create_repository(pool.clone());
    let now = Utc::now();
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 4, now).await;

    let cutoff = staleness_cutoff(now);
    let resolution = repo.resolve("Abc1234", cutoff).await.unwrap();

    match resolution {
        Resolution::Resolved(mapping) => {
            assert_eq!(mapping.url, "https://example.com/a");
            assert_eq!(mapping.clicks, 5);
        }
        other => panic!("unexpected resolution: {:?}", other),
    }

    assert_eq!(common::get_clicks(&pool, "Abc1234").await, 5);
}

#[sqlx::test]
async fn test_resolve_unknown_short_path_is_missing(pool: PgPool) {
    let repo = common::create_repository(pool);

    let cutoff = staleness_cutoff(Utc::now());
    let resolution = repo.resolve("Zzz9999", cutoff).await.unwrap();

    assert!(matches!(resolution, Resolution::Missing));
}

#[sqlx::test]
async fn test_resolve_stale_row_is_missing_and_untouched(pool: PgPool) {
    let repo = common::create_repository(pool.clone());
    let now = Utc::now();
    let old = now - Duration::days(91);
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 7, old).await;

    let cutoff = staleness_cutoff(now);
    let resolution = repo.resolve("Abc1234", cutoff).await.unwrap();

    assert!(matches!(resolution, Resolution::Missing));
    assert_eq!(common::get_clicks(&pool, "Abc1234").await, 7);
}

#[sqlx::test]
async fn test_concurrent_resolves_lose_no_updates(pool: PgPool) {
    let repo = Arc::new(common::create_repository(pool.clone()));
    let now = Utc::now();
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 0, now).await;

    let cutoff = staleness_cutoff(now);
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.resolve("Abc1234", cutoff).await })
        })
        .collect();

    for task in tasks {
        let resolution = task.await.unwrap().unwrap();
        assert!(matches!(resolution, Resolution::Resolved(_)));
    }

    assert_eq!(common::get_clicks(&pool, "Abc1234").await, 8);
}

#[sqlx::test]
async fn test_find_by_short_path_ignores_staleness(pool: PgPool) {
    let repo = common::create_repository(pool.clone());
    let old = Utc::now() - Duration::days(365);
    common::insert_mapping(&pool, "https://example.com/a", "Abc1234", 2, old).await;

    let found = repo.find_by_short_path("Abc1234").await.unwrap();
    assert_eq!(found.map(|m| m.clicks), Some(2));

    let missing = repo.find_by_short_path("Zzz9999").await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test]
async fn test_totals(pool: PgPool) {
    let repo = common::create_repository(pool.clone());
    let now = Utc::now();
    let recent = now - Duration::days(10);
    let old = now - Duration::days(100);
    common::insert_mapping(&pool, "https://example.com/a", "Live001", 3, now).await;
    common::insert_mapping(&pool, "https://example.com/b", "Live002", 2, recent).await;
    common::insert_mapping(&pool, "https://example.com/c", "Stale01", 10, old).await;

    let totals = repo.totals(staleness_cutoff(now)).await.unwrap();

    assert_eq!(totals.mappings, 3);
    assert_eq!(totals.live_mappings, 2);
    assert_eq!(totals.clicks, 15);
}

#[sqlx::test]
async fn test_totals_empty(pool: PgPool) {
    let repo = common::create_repository(pool);

    let totals = repo.totals(staleness_cutoff(Utc::now())).await.unwrap();

    assert_eq!(totals.mappings, 0);
    assert_eq!(totals.live_mappings, 0);
    assert_eq!(totals.clicks, 0);
}

#[sqlx::test]
async fn test_health_check(pool: PgPool) {
    let repo = common::create_repository(pool);

    assert!(repo.health_check().await);
}
