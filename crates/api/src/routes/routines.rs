//! Route definitions for the `/routines` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::routines;
use crate::state::AppState;

/// Routes mounted at `/routines`.
///
/// ```text
/// GET    /                                 -> list_routines
/// POST   /                                 -> create_routine
/// GET    /{id}                             -> get_routine (with steps)
/// PUT    /{id}                             -> update_routine
/// DELETE /{id}                             -> delete_routine
///
/// POST   /{id}/steps                       -> create_step
/// PUT    /{id}/steps/{step_id}             -> update_step
/// DELETE /{id}/steps/{step_id}             -> delete_step
///
/// POST   /{id}/executions                  -> start_execution
/// GET    /{id}/executions                  -> list_executions
/// PUT    /executions/{id}                  -> finish_execution
/// GET    /{id}/stats                       -> routine_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(routines::list_routines).post(routines::create_routine),
        )
        .route(
            "/{id}",
            get(routines::get_routine)
                .put(routines::update_routine)
                .delete(routines::delete_routine),
        )
        // Steps.
        .route("/{id}/steps", post(routines::create_step))
        .route(
            "/{id}/steps/{step_id}",
            put(routines::update_step).delete(routines::delete_step),
        )
        // Executions.
        .route(
            "/{id}/executions",
            post(routines::start_execution).get(routines::list_executions),
        )
        .route("/executions/{id}", put(routines::finish_execution))
        .route("/{id}/stats", get(routines::routine_stats))
}
