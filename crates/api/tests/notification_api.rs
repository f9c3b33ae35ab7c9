//! HTTP-level integration tests for notifications and delivery settings.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth, register_user};
use sqlx::PgPool;

/// Insert a delivered notification row directly (as the router would).
async fn seed_delivered(pool: &PgPool, user_id: i64, title: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO notifications (user_id, kind, priority, title, sent_at) \
         VALUES ($1, 'system', 'normal', $2, NOW()) RETURNING id",
    )
    .bind(user_id)
    .bind(title)
    .fetch_one(pool)
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Scheduling reminders
// ---------------------------------------------------------------------------

/// A reminder with an empty title is rejected and no row is created.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_empty_reminder_title_rejected_without_insert(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, _) = register_user(&app, "nuser").await;

    let body = serde_json::json!({
        "title": "  ",
        "scheduled_for": "2026-09-01T09:00:00Z",
    });
    let response = post_json_auth(&app, "/api/v1/notifications", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "no notification row on validation failure");
}

/// A valid reminder is stored unsent with its schedule.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_schedule_reminder(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "planner").await;

    let body = serde_json::json!({
        "title": "Take medication",
        "body": "With food",
        "scheduled_for": "2026-09-01T09:00:00Z",
    });
    let response = post_json_auth(&app, "/api/v1/notifications", &token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "reminder");
    assert_eq!(json["data"]["priority"], "normal");
    assert!(json["data"]["sent_at"].is_null());
    assert!(json["data"]["scheduled_for"].is_string());
}

/// An unknown priority is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_priority_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "shouty").await;

    let body = serde_json::json!({
        "title": "Loud reminder",
        "priority": "critical",
        "scheduled_for": "2026-09-01T09:00:00Z",
    });
    let response = post_json_auth(&app, "/api/v1/notifications", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Read / dismiss / counts
// ---------------------------------------------------------------------------

/// Unread count tracks reads and dismissals.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unread_count_and_mark_read(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = register_user(&app, "reader").await;

    let first = seed_delivered(&pool, user_id, "first").await;
    seed_delivered(&pool, user_id, "second").await;

    let response = get_auth(&app, "/api/v1/notifications/unread-count", &token).await;
    assert_eq!(body_json(response).await["data"]["count"], 2);

    // Mark one read.
    let response = post_json_auth(
        &app,
        &format!("/api/v1/notifications/{first}/read"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, "/api/v1/notifications/unread-count", &token).await;
    assert_eq!(body_json(response).await["data"]["count"], 1);

    // Mark the rest read.
    let response = post_json_auth(
        &app,
        "/api/v1/notifications/read-all",
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["marked_read"], 1);
}

/// Dismissed notifications drop out of listings.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dismiss_hides_notification(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = register_user(&app, "dismisser").await;

    let id = seed_delivered(&pool, user_id, "go away").await;

    let response = post_json_auth(
        &app,
        &format!("/api/v1/notifications/{id}/dismiss"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, "/api/v1/notifications", &token).await;
    let list = body_json(response).await["data"].clone();
    assert_eq!(list.as_array().unwrap().len(), 0);
}

/// Another user's notification answers 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_foreign_notification_invisible(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner_id) = register_user(&app, "nowner").await;
    let (other_token, _) = register_user(&app, "nother").await;

    let id = seed_delivered(&pool, owner_id, "private").await;

    let response = post_json_auth(
        &app,
        &format!("/api/v1/notifications/{id}/read"),
        &other_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Users who never saved settings get the defaults.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_settings_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "defaulted").await;

    let response = get_auth(&app, "/api/v1/notifications/settings", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["quiet_hours_enabled"], false);
    assert_eq!(json["data"]["quiet_start"], "22:00");
    assert_eq!(json["data"]["quiet_end"], "07:00");
}

/// Updating settings persists the quiet-hours window.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_settings(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "quietuser").await;

    let body = serde_json::json!({
        "quiet_hours_enabled": true,
        "quiet_start": "21:30",
        "quiet_end": "06:00",
    });
    let response = put_json_auth(&app, "/api/v1/notifications/settings", &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(&app, "/api/v1/notifications/settings", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["quiet_hours_enabled"], true);
    assert_eq!(json["data"]["quiet_start"], "21:30");
    assert_eq!(json["data"]["quiet_end"], "06:00");
}

/// Malformed quiet-hours boundaries are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_bad_quiet_hours_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "sloppy").await;

    let body = serde_json::json!({ "quiet_start": "25:99" });
    let response = put_json_auth(&app, "/api/v1/notifications/settings", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
