//! HTTP-level integration tests for boards and steps.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, register_user};
use sqlx::PgPool;

/// Create a board through the API and return its JSON row.
async fn create_board(app: &axum::Router, token: &str, title: &str) -> serde_json::Value {
    let body = serde_json::json!({ "title": title, "board_type": "routine" });
    let response = post_json_auth(app, "/api/v1/boards", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Append a step and return its JSON row.
async fn add_step(
    app: &axum::Router,
    token: &str,
    board_id: i64,
    title: &str,
    visual: serde_json::Value,
) -> serde_json::Value {
    let body = serde_json::json!({ "title": title, "visual": visual });
    let response =
        post_json_auth(app, &format!("/api/v1/boards/{board_id}/steps"), token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

/// Creating a board makes the creator its owner collaborator.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_board_adds_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = register_user(&app, "boardmaker").await;

    let board = create_board(&app, &token, "Morning routine").await;
    assert_eq!(board["owner_id"], user_id);

    let response = get_auth(
        &app,
        &format!("/api/v1/boards/{}/collaborators", board["id"]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let collaborators = body_json(response).await["data"].clone();
    let collaborators = collaborators.as_array().unwrap();
    assert_eq!(collaborators.len(), 1);
    assert_eq!(collaborators[0]["role"], "owner");
    assert_eq!(collaborators[0]["user_id"], user_id);
}

/// An unknown board type is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_board_type_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "typo").await;

    let body = serde_json::json!({ "title": "Oops", "board_type": "kanban" });
    let response = post_json_auth(&app, "/api/v1/boards", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Non-members get 404 for a board, not 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_board_invisible_to_non_members(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register_user(&app, "bowner").await;
    let (outsider_token, _) = register_user(&app, "boutsider").await;

    let board = create_board(&app, &owner_token, "Private board").await;

    let response = get_auth(
        &app,
        &format!("/api/v1/boards/{}", board["id"]),
        &outsider_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Steps append in order and come back sorted by position.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_steps_ordered_by_position(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "stepper").await;
    let board = create_board(&app, &token, "Wind-down").await;
    let board_id = board["id"].as_i64().unwrap();

    add_step(&app, &token, board_id, "Dim lights", serde_json::json!({})).await;
    add_step(&app, &token, board_id, "Brush teeth", serde_json::json!({})).await;

    let response = get_auth(&app, &format!("/api/v1/boards/{board_id}"), &token).await;
    let json = body_json(response).await;
    let steps = json["data"]["steps"].as_array().unwrap().clone();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["title"], "Dim lights");
    assert_eq!(steps[0]["position"], 0);
    assert_eq!(steps[1]["title"], "Brush teeth");
    assert_eq!(steps[1]["position"], 1);
}

/// Deleting a middle step re-compacts the remaining positions.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_step_delete_compacts_positions(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "compactor").await;
    let board = create_board(&app, &token, "Checklist").await;
    let board_id = board["id"].as_i64().unwrap();

    let s0 = add_step(&app, &token, board_id, "zero", serde_json::json!({})).await;
    let s1 = add_step(&app, &token, board_id, "one", serde_json::json!({})).await;
    let s2 = add_step(&app, &token, board_id, "two", serde_json::json!({})).await;

    let response = delete_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/steps/{}", s1["id"]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, &format!("/api/v1/boards/{board_id}"), &token).await;
    let json = body_json(response).await;
    let steps = json["data"]["steps"].as_array().unwrap().clone();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["id"], s0["id"]);
    assert_eq!(steps[0]["position"], 0);
    assert_eq!(steps[1]["id"], s2["id"]);
    assert_eq!(steps[1]["position"], 1);
}

/// Reorder requires exactly the board's step set.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reorder_validates_id_set(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "reorderer").await;
    let board = create_board(&app, &token, "Sequence").await;
    let board_id = board["id"].as_i64().unwrap();

    let s0 = add_step(&app, &token, board_id, "zero", serde_json::json!({})).await;
    let s1 = add_step(&app, &token, board_id, "one", serde_json::json!({})).await;

    // A partial list is rejected.
    let body = serde_json::json!({ "step_ids": [s0["id"]] });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/steps/reorder"),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The full set in reverse succeeds and rewrites positions.
    let body = serde_json::json!({ "step_ids": [s1["id"], s0["id"]] });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/steps/reorder"),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let steps = body_json(response).await["data"].clone();
    let steps = steps.as_array().unwrap().clone();
    assert_eq!(steps[0]["id"], s1["id"]);
    assert_eq!(steps[0]["position"], 0);
    assert_eq!(steps[1]["id"], s0["id"]);
    assert_eq!(steps[1]["position"], 1);
}

// ---------------------------------------------------------------------------
// Duplication
// ---------------------------------------------------------------------------

/// Duplicating a board deep-copies steps by value: editing the copy
/// leaves the template untouched.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_copies_steps_by_value(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(&app, "templater").await;
    let board = create_board(&app, &token, "Template").await;
    let board_id = board["id"].as_i64().unwrap();

    let original_visual = serde_json::json!({ "icon": "sun", "color": "#ffcc00" });
    add_step(&app, &token, board_id, "Wake up", original_visual.clone()).await;

    // Duplicate.
    let response = post_json_auth(
        &app,
        &format!("/api/v1/boards/{board_id}/duplicate"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy = body_json(response).await["data"].clone();
    let copy_id = copy["id"].as_i64().unwrap();
    assert_eq!(copy["title"], "Template (copy)");
    assert_eq!(copy["is_template"], false);

    // Edit the copied step.
    let response = get_auth(&app, &format!("/api/v1/boards/{copy_id}"), &token).await;
    let copy_steps = body_json(response).await["data"]["steps"].clone();
    let copy_step_id = copy_steps[0]["id"].as_i64().unwrap();

    let body = serde_json::json!({ "visual": { "icon": "moon" } });
    let response = put_json_auth(
        &app,
        &format!("/api/v1/boards/{copy_id}/steps/{copy_step_id}"),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The template's step payload is unchanged.
    let response = get_auth(&app, &format!("/api/v1/boards/{board_id}"), &token).await;
    let template_steps = body_json(response).await["data"]["steps"].clone();
    assert_eq!(template_steps[0]["visual"], original_visual);
}
