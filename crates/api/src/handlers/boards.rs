//! Handlers for the `/boards` resource and its steps.
//!
//! Access is board-scoped: the caller's collaborator role is fetched per
//! call and checked against the operation. Non-members get 404 rather
//! than 403 so board existence is not leaked.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use momentum_core::boards::{is_valid_board_type, is_valid_layout};
use momentum_core::error::CoreError;
use momentum_core::matrix::validate_title;
use momentum_core::roles::{can_edit_content, can_manage_board};
use momentum_core::types::DbId;
use momentum_db::models::board::{CreateBoard, CreateBoardStep, UpdateBoard, UpdateBoardStep};
use momentum_db::repositories::{BoardRepo, BoardStepRepo, CollaboratorRepo};
use momentum_events::bus::event_types;
use momentum_events::AppEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Role helpers
// ---------------------------------------------------------------------------

/// Fetch the caller's role on a board, or 404 when they are not a member.
pub(crate) async fn require_member(
    state: &AppState,
    board_id: DbId,
    user_id: DbId,
) -> Result<String, AppError> {
    CollaboratorRepo::find_role(&state.pool, board_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Board",
            id: board_id,
        }))
}

/// Require a role that may mutate board content.
pub(crate) async fn require_editor(
    state: &AppState,
    board_id: DbId,
    user_id: DbId,
) -> Result<String, AppError> {
    let role = require_member(state, board_id, user_id).await?;
    if !can_edit_content(&role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Viewers cannot modify board content".into(),
        )));
    }
    Ok(role)
}

/// Require the owner role.
pub(crate) async fn require_owner(
    state: &AppState,
    board_id: DbId,
    user_id: DbId,
) -> Result<String, AppError> {
    let role = require_member(state, board_id, user_id).await?;
    if !can_manage_board(&role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the board owner can do this".into(),
        )));
    }
    Ok(role)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /boards/{id}/duplicate`.
#[derive(Debug, Deserialize)]
pub struct DuplicateBoard {
    /// Title for the copy; defaults to `"<source title> (copy)"`.
    pub title: Option<String>,
}

/// Request body for `POST /boards/{id}/steps/reorder`.
#[derive(Debug, Deserialize)]
pub struct ReorderSteps {
    /// Every step id of the board, in the desired order.
    pub step_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Board handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/boards
///
/// List boards the authenticated user owns or collaborates on.
pub async fn list_boards(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let boards = BoardRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(serde_json::json!({ "data": boards })))
}

/// POST /api/v1/boards
///
/// Create a board. The creator becomes its owner collaborator.
pub async fn create_board(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBoard>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    validate_title(&input.title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    if !is_valid_board_type(&input.board_type) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid board type '{}'",
            input.board_type
        ))));
    }
    if let Some(layout) = input.layout.as_deref() {
        if !is_valid_layout(layout) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid layout '{layout}'"
            ))));
        }
    }

    let board = BoardRepo::create(&state.pool, auth.user_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": board })),
    ))
}

/// GET /api/v1/boards/{id}
///
/// Get a board together with its ordered steps.
pub async fn get_board(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    require_member(&state, board_id, auth.user_id).await?;

    let board = BoardRepo::find_by_id(&state.pool, board_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Board",
            id: board_id,
        }))?;
    let steps = BoardStepRepo::list_for_board(&state.pool, board_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "board": board, "steps": steps }
    })))
}

/// PUT /api/v1/boards/{id}
///
/// Patch a board's title/layout/template flag (owner or editor).
pub async fn update_board(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
    Json(input): Json<UpdateBoard>,
) -> AppResult<Json<serde_json::Value>> {
    require_editor(&state, board_id, auth.user_id).await?;

    if let Some(title) = input.title.as_deref() {
        validate_title(title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(layout) = input.layout.as_deref() {
        if !is_valid_layout(layout) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid layout '{layout}'"
            ))));
        }
    }

    let board = BoardRepo::update(&state.pool, board_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Board",
            id: board_id,
        }))?;

    state.event_bus.publish(
        AppEvent::new(event_types::BOARD_UPDATED)
            .with_source("board", board_id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "change": "board" })),
    );

    Ok(Json(serde_json::json!({ "data": board })))
}

/// DELETE /api/v1/boards/{id}
///
/// Delete a board (owner only). Steps, collaborators, and invitations
/// cascade. Returns 204 No Content.
pub async fn delete_board(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_owner(&state, board_id, auth.user_id).await?;

    BoardRepo::delete(&state.pool, board_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/boards/{id}/duplicate
///
/// Duplicate a board the caller can see, deep-copying its steps. The copy
/// belongs to the caller alone and is not a template.
pub async fn duplicate_board(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
    Json(input): Json<DuplicateBoard>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    require_member(&state, board_id, auth.user_id).await?;

    let source = BoardRepo::find_by_id(&state.pool, board_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Board",
            id: board_id,
        }))?;

    let title = match input.title {
        Some(t) => {
            validate_title(&t).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
            t
        }
        None => format!("{} (copy)", source.title),
    };

    let copy = BoardRepo::duplicate(&state.pool, board_id, auth.user_id, title.trim()).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": copy })),
    ))
}

// ---------------------------------------------------------------------------
// Step handlers
// ---------------------------------------------------------------------------

/// Empty JSON object used when a step payload is omitted.
fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

/// POST /api/v1/boards/{id}/steps
///
/// Append a step to the board (owner or editor).
pub async fn create_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
    Json(input): Json<CreateBoardStep>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    require_editor(&state, board_id, auth.user_id).await?;
    validate_title(&input.title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let step = BoardStepRepo::create(
        &state.pool,
        board_id,
        input.title.trim(),
        &input.visual.unwrap_or_else(empty_object),
        &input.timer.unwrap_or_else(empty_object),
        &input.transition.unwrap_or_else(empty_object),
    )
    .await?;

    publish_board_change(&state, board_id, auth.user_id, "step_added");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": step })),
    ))
}

/// PUT /api/v1/boards/{board_id}/steps/{step_id}
pub async fn update_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, step_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateBoardStep>,
) -> AppResult<Json<serde_json::Value>> {
    require_editor(&state, board_id, auth.user_id).await?;

    if let Some(title) = input.title.as_deref() {
        validate_title(title).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let step = BoardStepRepo::update(
        &state.pool,
        step_id,
        board_id,
        input.title.as_deref().map(str::trim),
        input.visual.as_ref(),
        input.timer.as_ref(),
        input.transition.as_ref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "BoardStep",
        id: step_id,
    }))?;

    publish_board_change(&state, board_id, auth.user_id, "step_updated");

    Ok(Json(serde_json::json!({ "data": step })))
}

/// DELETE /api/v1/boards/{board_id}/steps/{step_id}
///
/// Delete a step; remaining positions are re-compacted. Returns 204.
pub async fn delete_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, step_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    require_editor(&state, board_id, auth.user_id).await?;

    let deleted = BoardStepRepo::delete(&state.pool, step_id, board_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "BoardStep",
            id: step_id,
        }));
    }

    publish_board_change(&state, board_id, auth.user_id, "step_deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/boards/{id}/steps/reorder
///
/// Reorder all steps of a board. The id list must be exactly the board's
/// step set; positions come out contiguous from zero.
pub async fn reorder_steps(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
    Json(input): Json<ReorderSteps>,
) -> AppResult<Json<serde_json::Value>> {
    require_editor(&state, board_id, auth.user_id).await?;

    let ok = BoardStepRepo::reorder(&state.pool, board_id, &input.step_ids).await?;
    if !ok {
        return Err(AppError::Core(CoreError::Validation(
            "step_ids must contain exactly the board's step ids".into(),
        )));
    }

    let steps = BoardStepRepo::list_for_board(&state.pool, board_id).await?;

    publish_board_change(&state, board_id, auth.user_id, "steps_reordered");

    Ok(Json(serde_json::json!({ "data": steps })))
}

/// Publish an audit event for a board content change.
fn publish_board_change(state: &AppState, board_id: DbId, actor: DbId, change: &str) {
    state.event_bus.publish(
        AppEvent::new(event_types::BOARD_UPDATED)
            .with_source("board", board_id)
            .with_actor(actor)
            .with_payload(serde_json::json!({ "change": change })),
    );
}
