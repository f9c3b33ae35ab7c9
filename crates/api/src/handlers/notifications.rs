//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use momentum_core::error::CoreError;
use momentum_core::matrix::validate_title;
use momentum_core::notifications::{is_valid_priority, kinds, priorities};
use momentum_core::quiet_hours::validate_hhmm;
use momentum_core::types::DbId;
use momentum_db::models::notification::{CreateReminder, UpdateNotificationSettings};
use momentum_db::repositories::{NotificationRepo, NotificationSettingsRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only delivered-but-unread notifications.
    pub unread_only: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for notification listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for notification listing.
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Notification CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
///
/// List the authenticated user's notifications with optional filtering.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);
    let unread_only = params.unread_only.unwrap_or(false);

    let notifications =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, unread_only, limit, offset)
            .await?;

    Ok(Json(serde_json::json!({ "data": notifications })))
}

/// POST /api/v1/notifications
///
/// Schedule a reminder notification for the authenticated user. An empty
/// title is rejected before any row is inserted. Delivery happens on the
/// scheduler tick following `scheduled_for`, subject to quiet hours.
pub async fn create_reminder(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReminder>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    validate_title(&input.title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let priority = input.priority.as_deref().unwrap_or(priorities::NORMAL);
    if !is_valid_priority(priority) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid priority '{priority}'"
        ))));
    }

    let notification = NotificationRepo::create(
        &state.pool,
        auth.user_id,
        kinds::REMINDER,
        priority,
        input.title.trim(),
        input.body.as_deref(),
        Some(input.scheduled_for),
        None,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": notification })),
    ))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark a single notification as read. Returns 204 No Content on success,
/// or 404 if the notification does not belong to the authenticated user.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = NotificationRepo::mark_read(&state.pool, notification_id, auth.user_id).await?;

    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
///
/// Mark all of the authenticated user's notifications as read.
/// Returns the number of notifications that were marked.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}

/// GET /api/v1/notifications/unread-count
///
/// Return the number of unread notifications for the authenticated user.
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

/// POST /api/v1/notifications/{id}/dismiss
///
/// Dismiss a notification. Returns 204 No Content.
pub async fn dismiss(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = NotificationRepo::dismiss(&state.pool, notification_id, auth.user_id).await?;

    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Settings (quiet hours, DND)
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/settings
///
/// Get the authenticated user's notification settings. Users who have
/// never saved settings get the defaults.
pub async fn get_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let settings = NotificationSettingsRepo::get(&state.pool, auth.user_id).await?;

    let data = match settings {
        Some(s) => serde_json::to_value(s)
            .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?,
        None => serde_json::json!({
            "user_id": auth.user_id,
            "quiet_hours_enabled": false,
            "quiet_start": "22:00",
            "quiet_end": "07:00",
            "dnd_until": null,
        }),
    };

    Ok(Json(serde_json::json!({ "data": data })))
}

/// PUT /api/v1/notifications/settings
///
/// Update the authenticated user's notification settings. Quiet-hours
/// boundaries must be well-formed `HH:MM` strings.
pub async fn update_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateNotificationSettings>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(start) = input.quiet_start.as_deref() {
        validate_hhmm(start).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(end) = input.quiet_end.as_deref() {
        validate_hhmm(end).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let settings = NotificationSettingsRepo::upsert(&state.pool, auth.user_id, &input).await?;

    Ok(Json(serde_json::json!({ "data": settings })))
}
