//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /               -> list_notifications
/// POST   /               -> create_reminder
/// POST   /read-all       -> mark_all_read
/// GET    /unread-count   -> unread_count
/// POST   /{id}/read      -> mark_read
/// POST   /{id}/dismiss   -> dismiss
///
/// GET    /settings       -> get_settings
/// PUT    /settings       -> update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Core notification endpoints.
        .route(
            "/",
            get(notifications::list_notifications).post(notifications::create_reminder),
        )
        .route("/read-all", post(notifications::mark_all_read))
        .route("/unread-count", get(notifications::unread_count))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/{id}/dismiss", post(notifications::dismiss))
        // Settings endpoints.
        .route(
            "/settings",
            get(notifications::get_settings).put(notifications::update_settings),
        )
}
