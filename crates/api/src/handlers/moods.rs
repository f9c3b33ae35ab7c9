//! Handlers for the `/moods` resource. Append-only log.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use momentum_core::error::CoreError;
use momentum_core::mood::{validate_scales, validate_tags};
use momentum_core::types::Timestamp;
use momentum_db::models::mood::CreateMoodEntry;
use momentum_db::repositories::MoodRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for entry listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for entry listing.
const DEFAULT_LIMIT: i64 = 50;

/// Default summary window in days.
const DEFAULT_SUMMARY_DAYS: i32 = 7;

/// Maximum summary window in days.
const MAX_SUMMARY_DAYS: i32 = 365;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /moods`.
#[derive(Debug, Deserialize)]
pub struct MoodQuery {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /moods/summary`.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Trailing window in days. Defaults to 7, capped at 365.
    pub days: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/moods
///
/// Log a mood entry. Scales are 1-5; tags and energy factors are free-form.
pub async fn create_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMoodEntry>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    validate_scales(input.mood, input.energy, input.focus)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_tags("tags", &input.tags).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_tags("energy_factors", &input.energy_factors)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let entry = MoodRepo::create(&state.pool, auth.user_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": entry })),
    ))
}

/// GET /api/v1/moods
///
/// List the authenticated user's entries, newest first, optionally
/// bounded by a `[from, to)` window.
pub async fn list_entries(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MoodQuery>,
) -> AppResult<Json<DataResponse<Vec<momentum_db::models::mood::MoodEntry>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let entries = MoodRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.from,
        params.to,
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/moods/summary
///
/// Entry count and mood/energy/focus averages over a trailing day window.
pub async fn summary(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SummaryQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let days = params
        .days
        .unwrap_or(DEFAULT_SUMMARY_DAYS)
        .clamp(1, MAX_SUMMARY_DAYS);

    let summary = MoodRepo::summary(&state.pool, auth.user_id, days).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "days": days,
            "entry_count": summary.entry_count,
            "avg_mood": summary.avg_mood,
            "avg_energy": summary.avg_energy,
            "avg_focus": summary.avg_focus,
        }
    })))
}
