//! Handlers for the `/tasks` resource (priority matrix).
//!
//! All endpoints require authentication and operate only on the
//! authenticated user's tasks; a foreign task id behaves exactly like a
//! missing one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use momentum_core::error::CoreError;
use momentum_core::matrix::{
    is_valid_quadrant, is_valid_status, validate_estimated_minutes, validate_scale,
    validate_title,
};
use momentum_core::types::DbId;
use momentum_db::models::task::{CreateTask, MoveTask, UpdateTask};
use momentum_db::repositories::TaskRepo;
use momentum_events::bus::event_types;
use momentum_events::AppEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Restrict to one quadrant.
    pub quadrant: Option<String>,
    /// Restrict to one status.
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Shared field validation for create/update payloads.
fn validate_task_fields(
    title: Option<&str>,
    status: Option<&str>,
    estimated_minutes: Option<i32>,
    energy_required: Option<i16>,
    focus_required: Option<i16>,
) -> Result<(), AppError> {
    if let Some(title) = title {
        validate_title(title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(status) = status {
        if !is_valid_status(status) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid status '{status}'"
            ))));
        }
    }
    if let Some(minutes) = estimated_minutes {
        validate_estimated_minutes(minutes)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(energy) = energy_required {
        validate_scale("energy_required", energy)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(focus) = focus_required {
        validate_scale("focus_required", focus)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tasks
///
/// List the authenticated user's live tasks, optionally filtered by
/// quadrant and status, ordered by quadrant then position.
pub async fn list_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TaskQuery>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(quadrant) = params.quadrant.as_deref() {
        if !is_valid_quadrant(quadrant) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid quadrant '{quadrant}'"
            ))));
        }
    }

    let tasks = TaskRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.quadrant.as_deref(),
        params.status.as_deref(),
    )
    .await?;

    Ok(Json(serde_json::json!({ "data": tasks })))
}

/// POST /api/v1/tasks
///
/// Create a task at the end of its quadrant. An empty title is rejected
/// before any row is inserted.
pub async fn create_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    validate_task_fields(
        Some(&input.title),
        None,
        input.estimated_minutes,
        input.energy_required,
        input.focus_required,
    )?;

    if !is_valid_quadrant(&input.quadrant) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid quadrant '{}'",
            input.quadrant
        ))));
    }

    let task = TaskRepo::create(&state.pool, auth.user_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": task })),
    ))
}

/// GET /api/v1/tasks/{id}
pub async fn get_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let task = TaskRepo::get_for_user(&state.pool, task_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    Ok(Json(serde_json::json!({ "data": task })))
}

/// PUT /api/v1/tasks/{id}
///
/// Patch a task's editable fields. Absent fields are kept.
pub async fn update_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<serde_json::Value>> {
    validate_task_fields(
        input.title.as_deref(),
        input.status.as_deref(),
        input.estimated_minutes,
        input.energy_required,
        input.focus_required,
    )?;

    let task = TaskRepo::update(&state.pool, task_id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    Ok(Json(serde_json::json!({ "data": task })))
}

/// POST /api/v1/tasks/{id}/move
///
/// Move a task to a quadrant/position (the drag-and-drop backend).
pub async fn move_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    Json(input): Json<MoveTask>,
) -> AppResult<Json<serde_json::Value>> {
    if !is_valid_quadrant(&input.quadrant) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid quadrant '{}'",
            input.quadrant
        ))));
    }
    if input.position < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Position must be non-negative".into(),
        )));
    }

    let task = TaskRepo::move_task(
        &state.pool,
        task_id,
        auth.user_id,
        &input.quadrant,
        input.position,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Task",
        id: task_id,
    }))?;

    Ok(Json(serde_json::json!({ "data": task })))
}

/// POST /api/v1/tasks/{id}/complete
///
/// Mark a task done and stamp its completion time.
pub async fn complete_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let task = TaskRepo::complete(&state.pool, task_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    state.event_bus.publish(
        AppEvent::new(event_types::TASK_COMPLETED)
            .with_source("task", task.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "quadrant": task.quadrant })),
    );

    Ok(Json(serde_json::json!({ "data": task })))
}

/// DELETE /api/v1/tasks/{id}
///
/// Soft-delete a task. Returns 204 No Content on success.
pub async fn delete_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = TaskRepo::soft_delete(&state.pool, task_id, auth.user_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
