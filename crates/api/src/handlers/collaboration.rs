//! Handlers for board collaborators and invitations.
//!
//! Invitations address users by email and expire after a fixed TTL.
//! Every mutation here lands in the audit trail via the event bus, and
//! affected users are notified through the notification router.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use momentum_core::error::CoreError;
use momentum_core::invitations::{self, statuses, INVITATION_TTL_DAYS};
use momentum_core::roles::{is_assignable_role, ROLE_OWNER};
use momentum_core::types::DbId;
use momentum_db::models::collaboration::{ChangeRole, CreateInvitation};
use momentum_db::repositories::{BoardRepo, CollaboratorRepo, InvitationRepo, UserRepo};
use momentum_events::bus::event_types;
use momentum_events::AppEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::boards::{require_member, require_owner};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// GET /api/v1/boards/{id}/collaborators
///
/// List a board's collaborators with their public identity (any member).
pub async fn list_collaborators(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    require_member(&state, board_id, auth.user_id).await?;

    let collaborators = CollaboratorRepo::list_with_users(&state.pool, board_id).await?;

    Ok(Json(serde_json::json!({ "data": collaborators })))
}

/// PUT /api/v1/boards/{board_id}/collaborators/{user_id}
///
/// Change a collaborator's role (owner only). The owner row itself can
/// never be changed.
pub async fn change_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, target_user_id)): Path<(DbId, DbId)>,
    Json(input): Json<ChangeRole>,
) -> AppResult<Json<serde_json::Value>> {
    require_owner(&state, board_id, auth.user_id).await?;

    if !is_assignable_role(&input.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Role must be one of: editor, viewer (got '{}')",
            input.role
        ))));
    }

    let collaborator =
        CollaboratorRepo::change_role(&state.pool, board_id, target_user_id, &input.role)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Collaborator",
                id: target_user_id,
            }))?;

    state.event_bus.publish(
        AppEvent::new(event_types::COLLABORATOR_ROLE_CHANGED)
            .with_source("board", board_id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "notify_user_id": target_user_id,
                "title": "Your board role changed",
                "body": format!("You are now a {} on this board", input.role),
                "role": input.role,
            })),
    );

    Ok(Json(serde_json::json!({ "data": collaborator })))
}

/// DELETE /api/v1/boards/{board_id}/collaborators/{user_id}
///
/// Remove a collaborator (owner only). The owner cannot be removed.
/// Returns 204 No Content.
pub async fn remove_collaborator(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, target_user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    require_owner(&state, board_id, auth.user_id).await?;

    if target_user_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "The owner cannot remove themselves; delete the board instead".into(),
        )));
    }

    let removed = CollaboratorRepo::remove(&state.pool, board_id, target_user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Collaborator",
            id: target_user_id,
        }));
    }

    state.event_bus.publish(
        AppEvent::new(event_types::COLLABORATOR_REMOVED)
            .with_source("board", board_id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "notify_user_id": target_user_id,
                "title": "Removed from a board",
                "body": "You no longer have access to this board",
            })),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/boards/{id}/leave
///
/// Leave a board the caller collaborates on. Owners cannot leave their
/// own board. Returns 204 No Content.
pub async fn leave_board(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let role = require_member(&state, board_id, auth.user_id).await?;
    if role == ROLE_OWNER {
        return Err(AppError::Core(CoreError::Validation(
            "The owner cannot leave their own board; delete it instead".into(),
        )));
    }

    CollaboratorRepo::remove(&state.pool, board_id, auth.user_id).await?;

    let board = BoardRepo::find_by_id(&state.pool, board_id).await?;
    if let Some(board) = board {
        state.event_bus.publish(
            AppEvent::new(event_types::COLLABORATOR_REMOVED)
                .with_source("board", board_id)
                .with_actor(auth.user_id)
                .with_payload(serde_json::json!({
                    "notify_user_id": board.owner_id,
                    "title": "A collaborator left your board",
                    "body": format!("Someone left \"{}\"", board.title),
                })),
        );
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

/// POST /api/v1/boards/{id}/invitations
///
/// Invite a user by email (owner only). The invitation expires after
/// seven days. If the email belongs to a registered user they are
/// notified immediately.
pub async fn create_invitation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
    Json(input): Json<CreateInvitation>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    require_owner(&state, board_id, auth.user_id).await?;

    invitations::validate_email(&input.invitee_email)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    if !is_assignable_role(&input.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Role must be one of: editor, viewer (got '{}')",
            input.role
        ))));
    }

    let email = input.invitee_email.trim().to_lowercase();

    // Inviting an existing member is a conflict, not a new invitation.
    if let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? {
        if CollaboratorRepo::find_role(&state.pool, board_id, user.id)
            .await?
            .is_some()
        {
            return Err(AppError::Core(CoreError::Conflict(
                "That user already collaborates on this board".into(),
            )));
        }
    }

    let expires_at = Utc::now() + Duration::days(INVITATION_TTL_DAYS);
    let invitation = InvitationRepo::create(
        &state.pool,
        board_id,
        auth.user_id,
        &email,
        &input.role,
        expires_at,
    )
    .await?;

    let board = BoardRepo::find_by_id(&state.pool, board_id).await?;
    let board_title = board.map(|b| b.title).unwrap_or_default();

    let mut payload = serde_json::json!({
        "invitee_email": email,
        "role": invitation.role,
        "title": "Board invitation",
        "body": format!("You've been invited to \"{board_title}\""),
    });
    // Only registered invitees can receive an in-app notification.
    if let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? {
        payload["notify_user_id"] = serde_json::json!(user.id);
    }

    state.event_bus.publish(
        AppEvent::new(event_types::INVITATION_CREATED)
            .with_source("board", board_id)
            .with_actor(auth.user_id)
            .with_payload(payload),
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": invitation })),
    ))
}

/// GET /api/v1/boards/{id}/invitations
///
/// List a board's invitations, newest first (owner only).
pub async fn list_board_invitations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    require_owner(&state, board_id, auth.user_id).await?;

    let invitations = InvitationRepo::list_for_board(&state.pool, board_id).await?;

    Ok(Json(serde_json::json!({ "data": invitations })))
}

/// GET /api/v1/invitations
///
/// List unexpired pending invitations addressed to the authenticated
/// user's email.
pub async fn list_my_invitations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    let invitations = InvitationRepo::list_pending_for_email(&state.pool, &user.email).await?;

    Ok(Json(serde_json::json!({ "data": invitations })))
}

/// POST /api/v1/invitations/{id}/accept
///
/// Accept a pending invitation addressed to the caller's email. Expired
/// invitations are marked as such and answered with 410 Gone.
pub async fn accept_invitation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(invitation_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let (invitation, _user) = load_own_invitation(&state, auth.user_id, invitation_id).await?;

    if invitations::is_expired(invitation.expires_at, Utc::now()) {
        InvitationRepo::mark_status(&state.pool, invitation_id, statuses::EXPIRED).await?;
        return Err(AppError::Core(CoreError::Gone(
            "This invitation has expired".into(),
        )));
    }

    let collaborator = CollaboratorRepo::add(
        &state.pool,
        invitation.board_id,
        auth.user_id,
        &invitation.role,
        invitation.inviter_id,
    )
    .await?;

    InvitationRepo::mark_status(&state.pool, invitation_id, statuses::ACCEPTED).await?;

    state.event_bus.publish(
        AppEvent::new(event_types::INVITATION_ACCEPTED)
            .with_source("board", invitation.board_id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "notify_user_id": invitation.inviter_id,
                "title": "Invitation accepted",
                "body": format!("{} joined your board", invitation.invitee_email),
                "role": invitation.role,
            })),
    );

    Ok(Json(serde_json::json!({ "data": collaborator })))
}

/// POST /api/v1/invitations/{id}/decline
///
/// Decline a pending invitation addressed to the caller's email.
/// Returns 204 No Content.
pub async fn decline_invitation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(invitation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (invitation, _user) = load_own_invitation(&state, auth.user_id, invitation_id).await?;

    InvitationRepo::mark_status(&state.pool, invitation_id, statuses::DECLINED)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invitation",
            id: invitation_id,
        }))?;

    state.event_bus.publish(
        AppEvent::new(event_types::INVITATION_DECLINED)
            .with_source("board", invitation.board_id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "notify_user_id": invitation.inviter_id,
                "title": "Invitation declined",
                "body": format!("{} declined your invitation", invitation.invitee_email),
            })),
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a pending invitation and verify it is addressed to the caller.
///
/// A foreign invitation id answers 404 so invitation existence is not
/// leaked across accounts.
async fn load_own_invitation(
    state: &AppState,
    user_id: DbId,
    invitation_id: DbId,
) -> Result<
    (
        momentum_db::models::collaboration::BoardInvitation,
        momentum_db::models::user::User,
    ),
    AppError,
> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    let invitation = InvitationRepo::find_by_id(&state.pool, invitation_id)
        .await?
        .filter(|inv| inv.invitee_email.eq_ignore_ascii_case(&user.email))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invitation",
            id: invitation_id,
        }))?;

    if invitation.status != statuses::PENDING {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Invitation was already {}",
            invitation.status
        ))));
    }

    Ok((invitation, user))
}
