//! Route definitions for the `/boards` resource, its steps, and
//! board-scoped collaboration.
//!
//! All endpoints require authentication; per-board authorization is
//! enforced in the handlers from the caller's collaborator role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{boards, collaboration};
use crate::state::AppState;

/// Routes mounted at `/boards`.
///
/// ```text
/// GET    /                                    -> list_boards
/// POST   /                                    -> create_board
/// GET    /{id}                                -> get_board (with steps)
/// PUT    /{id}                                -> update_board
/// DELETE /{id}                                -> delete_board (owner)
/// POST   /{id}/duplicate                      -> duplicate_board
///
/// POST   /{id}/steps                          -> create_step
/// POST   /{id}/steps/reorder                  -> reorder_steps
/// PUT    /{id}/steps/{step_id}                -> update_step
/// DELETE /{id}/steps/{step_id}                -> delete_step
///
/// GET    /{id}/collaborators                  -> list_collaborators
/// PUT    /{id}/collaborators/{user_id}        -> change_role (owner)
/// DELETE /{id}/collaborators/{user_id}        -> remove_collaborator (owner)
/// POST   /{id}/leave                          -> leave_board
/// POST   /{id}/invitations                    -> create_invitation (owner)
/// GET    /{id}/invitations                    -> list_board_invitations (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Board CRUD.
        .route("/", get(boards::list_boards).post(boards::create_board))
        .route(
            "/{id}",
            get(boards::get_board)
                .put(boards::update_board)
                .delete(boards::delete_board),
        )
        .route("/{id}/duplicate", post(boards::duplicate_board))
        // Steps.
        .route("/{id}/steps", post(boards::create_step))
        .route("/{id}/steps/reorder", post(boards::reorder_steps))
        .route(
            "/{id}/steps/{step_id}",
            put(boards::update_step).delete(boards::delete_step),
        )
        // Collaboration.
        .route(
            "/{id}/collaborators",
            get(collaboration::list_collaborators),
        )
        .route(
            "/{id}/collaborators/{user_id}",
            put(collaboration::change_role).delete(collaboration::remove_collaborator),
        )
        .route("/{id}/leave", post(collaboration::leave_board))
        .route(
            "/{id}/invitations",
            post(collaboration::create_invitation).get(collaboration::list_board_invitations),
        )
}
