//! Route definitions for `/invitations` (invitations addressed to the
//! authenticated user).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::collaboration;
use crate::state::AppState;

/// Routes mounted at `/invitations`.
///
/// ```text
/// GET  /              -> list_my_invitations
/// POST /{id}/accept   -> accept_invitation
/// POST /{id}/decline  -> decline_invitation
/// ```
pub fn invitation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(collaboration::list_my_invitations))
        .route("/{id}/accept", post(collaboration::accept_invitation))
        .route("/{id}/decline", post(collaboration::decline_invitation))
}
