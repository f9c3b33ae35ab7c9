//! Handlers for the `/routines` resource: routines, steps, executions,
//! and per-routine statistics.
//!
//! Every step mutation finishes by rewriting the routine's derived fields
//! (`total_minutes`, `flexibility_score`) so they are never stale, and
//! returns the refreshed routine alongside the step.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use momentum_core::error::CoreError;
use momentum_core::matrix::validate_title;
use momentum_core::routine::{is_finishable_status, validate_step_minutes};
use momentum_core::types::DbId;
use momentum_db::models::routine::{
    CreateRoutine, CreateRoutineStep, FinishExecution, UpdateRoutine, UpdateRoutineStep,
};
use momentum_db::repositories::{RoutineExecutionRepo, RoutineRepo, RoutineStepRepo};
use momentum_events::bus::event_types;
use momentum_events::AppEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum page size for execution listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for execution listing.
const DEFAULT_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /routines/{id}/executions`.
#[derive(Debug, Deserialize)]
pub struct ExecutionQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Routine handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/routines
pub async fn list_routines(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let routines = RoutineRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(serde_json::json!({ "data": routines })))
}

/// POST /api/v1/routines
pub async fn create_routine(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRoutine>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    validate_title(&input.title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let routine = RoutineRepo::create(&state.pool, auth.user_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": routine })),
    ))
}

/// GET /api/v1/routines/{id}
///
/// Get a routine together with its ordered steps.
pub async fn get_routine(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(routine_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let routine = RoutineRepo::get_for_user(&state.pool, routine_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Routine",
            id: routine_id,
        }))?;
    let steps = RoutineStepRepo::list_for_routine(&state.pool, routine_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "routine": routine, "steps": steps }
    })))
}

/// PUT /api/v1/routines/{id}
pub async fn update_routine(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(routine_id): Path<DbId>,
    Json(input): Json<UpdateRoutine>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(title) = input.title.as_deref() {
        validate_title(title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let routine = RoutineRepo::update(&state.pool, routine_id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Routine",
            id: routine_id,
        }))?;

    Ok(Json(serde_json::json!({ "data": routine })))
}

/// DELETE /api/v1/routines/{id}
///
/// Delete a routine. Steps and executions cascade. Returns 204.
pub async fn delete_routine(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(routine_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = RoutineRepo::delete(&state.pool, routine_id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Routine",
            id: routine_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Step handlers
// ---------------------------------------------------------------------------

/// Check the routine exists for this user before touching its steps.
async fn require_routine(
    state: &AppState,
    routine_id: DbId,
    user_id: DbId,
) -> Result<(), AppError> {
    RoutineRepo::get_for_user(&state.pool, routine_id, user_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Routine",
            id: routine_id,
        }))
}

/// Re-derive and return the routine after a step mutation.
async fn refreshed_routine(
    state: &AppState,
    routine_id: DbId,
    user_id: DbId,
) -> Result<momentum_db::models::routine::Routine, AppError> {
    RoutineRepo::refresh_derived(&state.pool, routine_id).await?;
    RoutineRepo::get_for_user(&state.pool, routine_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Routine",
            id: routine_id,
        }))
}

/// POST /api/v1/routines/{id}/steps
///
/// Append a step; responds with the step and the refreshed routine.
pub async fn create_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(routine_id): Path<DbId>,
    Json(input): Json<CreateRoutineStep>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    require_routine(&state, routine_id, auth.user_id).await?;

    validate_title(&input.title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_step_minutes(input.duration_minutes)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let step = RoutineStepRepo::create(
        &state.pool,
        routine_id,
        input.title.trim(),
        input.duration_minutes,
        input.is_flexible.unwrap_or(false),
    )
    .await?;

    let routine = refreshed_routine(&state, routine_id, auth.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": { "step": step, "routine": routine } })),
    ))
}

/// PUT /api/v1/routines/{routine_id}/steps/{step_id}
pub async fn update_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((routine_id, step_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateRoutineStep>,
) -> AppResult<Json<serde_json::Value>> {
    require_routine(&state, routine_id, auth.user_id).await?;

    if let Some(title) = input.title.as_deref() {
        validate_title(title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(minutes) = input.duration_minutes {
        validate_step_minutes(minutes).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let step = RoutineStepRepo::update(
        &state.pool,
        step_id,
        routine_id,
        input.title.as_deref().map(str::trim),
        input.duration_minutes,
        input.is_flexible,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "RoutineStep",
        id: step_id,
    }))?;

    let routine = refreshed_routine(&state, routine_id, auth.user_id).await?;

    Ok(Json(
        serde_json::json!({ "data": { "step": step, "routine": routine } }),
    ))
}

/// DELETE /api/v1/routines/{routine_id}/steps/{step_id}
///
/// Delete a step; remaining positions are re-compacted and the routine's
/// derived fields refreshed. Responds with the refreshed routine.
pub async fn delete_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((routine_id, step_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<serde_json::Value>> {
    require_routine(&state, routine_id, auth.user_id).await?;

    let deleted = RoutineStepRepo::delete(&state.pool, step_id, routine_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "RoutineStep",
            id: step_id,
        }));
    }

    let routine = refreshed_routine(&state, routine_id, auth.user_id).await?;

    Ok(Json(serde_json::json!({ "data": { "routine": routine } })))
}

// ---------------------------------------------------------------------------
// Execution handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/routines/{id}/executions
///
/// Start a run of the routine.
pub async fn start_execution(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(routine_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    require_routine(&state, routine_id, auth.user_id).await?;

    let execution = RoutineExecutionRepo::start(&state.pool, routine_id, auth.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": execution })),
    ))
}

/// PUT /api/v1/routines/executions/{id}
///
/// Finish a running execution with a terminal status and step counts.
pub async fn finish_execution(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(execution_id): Path<DbId>,
    Json(input): Json<FinishExecution>,
) -> AppResult<Json<serde_json::Value>> {
    if !is_finishable_status(&input.status) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Status must be one of: completed, abandoned (got '{}')",
            input.status
        ))));
    }
    let steps_completed = input.steps_completed.unwrap_or(0);
    let steps_skipped = input.steps_skipped.unwrap_or(0);
    if steps_completed < 0 || steps_skipped < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Step counts must be non-negative".into(),
        )));
    }

    let execution = RoutineExecutionRepo::finish(
        &state.pool,
        execution_id,
        auth.user_id,
        &input.status,
        steps_completed,
        steps_skipped,
        input.notes.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "RoutineExecution",
        id: execution_id,
    }))?;

    state.event_bus.publish(
        AppEvent::new(event_types::ROUTINE_EXECUTION_FINISHED)
            .with_source("routine", execution.routine_id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "status": execution.status,
                "steps_completed": execution.steps_completed,
                "steps_skipped": execution.steps_skipped,
            })),
    );

    Ok(Json(serde_json::json!({ "data": execution })))
}

/// GET /api/v1/routines/{id}/executions
///
/// List a routine's executions, newest first.
pub async fn list_executions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(routine_id): Path<DbId>,
    Query(params): Query<ExecutionQuery>,
) -> AppResult<Json<serde_json::Value>> {
    require_routine(&state, routine_id, auth.user_id).await?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let executions =
        RoutineExecutionRepo::list_for_routine(&state.pool, routine_id, auth.user_id, limit, offset)
            .await?;

    Ok(Json(serde_json::json!({ "data": executions })))
}

/// GET /api/v1/routines/{id}/stats
///
/// Aggregate execution statistics: run counts, completion rate, average
/// completed duration.
pub async fn routine_stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(routine_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    require_routine(&state, routine_id, auth.user_id).await?;

    let stats = RoutineExecutionRepo::stats(&state.pool, routine_id, auth.user_id).await?;

    let completion_rate = if stats.total_runs == 0 {
        0.0
    } else {
        stats.completed_runs as f64 / stats.total_runs as f64
    };

    Ok(Json(serde_json::json!({
        "data": {
            "total_runs": stats.total_runs,
            "completed_runs": stats.completed_runs,
            "abandoned_runs": stats.abandoned_runs,
            "completion_rate": completion_rate,
            "avg_completed_minutes": stats.avg_completed_minutes,
        }
    })))
}
