//! HTTP-level integration tests for board collaboration: invitations,
//! roles, and the permission gates around them.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, register_user};
use sqlx::PgPool;

/// Create a board and return its id.
async fn create_board(app: &axum::Router, token: &str, title: &str) -> i64 {
    let body = serde_json::json!({ "title": title, "board_type": "routine" });
    let response = post_json_auth(app, "/api/v1/boards", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Invite an email to a board and return the invitation id.
async fn invite(app: &axum::Router, token: &str, board_id: i64, email: &str, role: &str) -> i64 {
    let body = serde_json::json!({ "invitee_email": email, "role": role });
    let response = post_json_auth(
        app,
        &format!("/api/v1/boards/{board_id}/invitations"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Invitation lifecycle
// ---------------------------------------------------------------------------

/// Full happy path: invite -> listed for invitee -> accept -> collaborator.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_invite_accept_creates_collaborator(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (owner_token, _) = register_user(&app, "inviter").await;
    let (invitee_token, invitee_id) = register_user(&app, "invitee").await;
    let board_id = create_board(&app, &owner_token, "Shared board").await;

    let invitation_id = invite(&app, &owner_token, board_id, "invitee@example.com", "editor").await;

    // The invitee sees it.
    let response = get_auth(&app, "/api/v1/invitations", &invitee_token).await;
    let mine = body_json(response).await["data"].clone();
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["status"], "pending");

    // Accept.
    let response = post_json_auth(
        &app,
        &format!("/api/v1/invitations/{invitation_id}/accept"),
        &invitee_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let collaborator = body_json(response).await["data"].clone();
    assert_eq!(collaborator["user_id"], invitee_id);
    assert_eq!(collaborator["role"], "editor");

    // The invitation is terminal now.
    let status: String = sqlx::query_scalar("SELECT status FROM board_invitations WHERE id = $1")
        .bind(invitation_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "accepted");

    // The board is now listed for the invitee.
    let response = get_auth(&app, &format!("/api/v1/boards/{board_id}"), &invitee_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Declining marks the invitation and adds no collaborator.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_decline_adds_no_collaborator(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (owner_token, _) = register_user(&app, "dinviter").await;
    let (invitee_token, _) = register_user(&app, "decliner").await;
    let board_id = create_board(&app, &owner_token, "Unwanted board").await;

    let invitation_id =
        invite(&app, &owner_token, board_id, "decliner@example.com", "viewer").await;

    let response = post_json_auth(
        &app,
        &format!("/api/v1/invitations/{invitation_id}/decline"),
        &invitee_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let collaborators: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM board_collaborators WHERE board_id = $1")
            .bind(board_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(collaborators, 1, "only the owner remains");
}

/// Accepting an expired invitation answers 410 and marks it expired.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_expired_invitation_gone(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (owner_token, _) = register_user(&app, "einviter").await;
    let (invitee_token, _) = register_user(&app, "lateuser").await;
    let board_id = create_board(&app, &owner_token, "Stale board").await;

    let invitation_id =
        invite(&app, &owner_token, board_id, "lateuser@example.com", "editor").await;

    // Backdate the deadline.
    sqlx::query("UPDATE board_invitations SET expires_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(invitation_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json_auth(
        &app,
        &format!("/api/v1/invitations/{invitation_id}/accept"),
        &invitee_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::GONE);

    let status: String = sqlx::query_scalar("SELECT status FROM board_invitations WHERE id = $1")
        .bind(invitation_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "expired");
}

/// An invitation addressed to someone else is invisible to the caller.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_foreign_invitation_invisible(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register_user(&app, "finviter").await;
    let (_, _) = register_user(&app, "intended").await;
    let (sneak_token, _) = register_user(&app, "sneak").await;
    let board_id = create_board(&app, &owner_token, "Targeted board").await;

    let invitation_id =
        invite(&app, &owner_token, board_id, "intended@example.com", "editor").await;

    let response = post_json_auth(
        &app,
        &format!("/api/v1/invitations/{invitation_id}/accept"),
        &sneak_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Inviting an existing collaborator is a conflict.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_invite_existing_member_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register_user(&app, "cinviter").await;
    let (invitee_token, _) = register_user(&app, "joined").await;
    let board_id = create_board(&app, &owner_token, "Crowded board").await;

    let invitation_id = invite(&app, &owner_token, board_id, "joined@example.com", "editor").await;
    let response = post_json_auth(
        &app,
        &format!("/api/v1/invitations/{invitation_id}/accept"),
        &invitee_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = serde_json::json!({ "invitee_email": "joined@example.com", "role": "viewer" });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/invitations"),
        &owner_token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Role gates
// ---------------------------------------------------------------------------

/// Accept an invitation for a user, making them a collaborator with the
/// given role.
async fn join_board(
    app: &axum::Router,
    owner_token: &str,
    member_token: &str,
    member_email: &str,
    board_id: i64,
    role: &str,
) {
    let invitation_id = invite(app, owner_token, board_id, member_email, role).await;
    let response = post_json_auth(
        app,
        &format!("/api/v1/invitations/{invitation_id}/accept"),
        member_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Viewers can read but not mutate content.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_viewer_cannot_edit(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register_user(&app, "vowner").await;
    let (viewer_token, _) = register_user(&app, "viewer").await;
    let board_id = create_board(&app, &owner_token, "Read-only board").await;
    join_board(
        &app,
        &owner_token,
        &viewer_token,
        "viewer@example.com",
        board_id,
        "viewer",
    )
    .await;

    // Reading works.
    let response = get_auth(&app, &format!("/api/v1/boards/{board_id}"), &viewer_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Mutating does not.
    let body = serde_json::json!({ "title": "A step" });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/steps"),
        &viewer_token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Editors can mutate content but not manage collaborators.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_editor_cannot_manage(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register_user(&app, "eowner").await;
    let (editor_token, _) = register_user(&app, "editor").await;
    let board_id = create_board(&app, &owner_token, "Editable board").await;
    join_board(
        &app,
        &owner_token,
        &editor_token,
        "editor@example.com",
        board_id,
        "editor",
    )
    .await;

    // Content mutation works.
    let body = serde_json::json!({ "title": "A step" });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/steps"),
        &editor_token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Inviting does not.
    let body = serde_json::json!({ "invitee_email": "x@example.com", "role": "viewer" });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/invitations"),
        &editor_token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The owner can change a member's role; the owner row itself is immovable.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_role_change_and_owner_protection(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, owner_id) = register_user(&app, "rowner").await;
    let (member_token, member_id) = register_user(&app, "member").await;
    let board_id = create_board(&app, &owner_token, "Role board").await;
    join_board(
        &app,
        &owner_token,
        &member_token,
        "member@example.com",
        board_id,
        "viewer",
    )
    .await;

    // Promote the viewer to editor.
    let response = put_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/collaborators/{member_id}"),
        &owner_token,
        serde_json::json!({ "role": "editor" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "editor");

    // The owner row cannot be demoted.
    let response = put_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/collaborators/{owner_id}"),
        &owner_token,
        serde_json::json!({ "role": "viewer" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Granting 'owner' is not a thing.
    let response = put_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/collaborators/{member_id}"),
        &owner_token,
        serde_json::json!({ "role": "owner" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Removing a collaborator revokes their access; owners cannot leave.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_remove_and_leave(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register_user(&app, "lowner").await;
    let (member_token, member_id) = register_user(&app, "leaver").await;
    let board_id = create_board(&app, &owner_token, "Departure board").await;
    join_board(
        &app,
        &owner_token,
        &member_token,
        "leaver@example.com",
        board_id,
        "editor",
    )
    .await;

    // The owner cannot leave their own board.
    let response = post_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/leave"),
        &owner_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Remove the member; their access vanishes.
    let response = delete_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/collaborators/{member_id}"),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, &format!("/api/v1/boards/{board_id}"), &member_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
