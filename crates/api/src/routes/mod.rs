pub mod auth;
pub mod boards;
pub mod collaboration;
pub mod health;
pub mod moods;
pub mod notifications;
pub mod preferences;
pub mod routines;
pub mod tasks;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                              WebSocket (?token=)
///
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user (requires auth)
///
/// /tasks                                           list (?quadrant, status), create
/// /tasks/{id}                                      get, update, delete (soft)
/// /tasks/{id}/move                                 move to quadrant/position (POST)
/// /tasks/{id}/complete                             mark done (POST)
///
/// /boards                                          list, create
/// /boards/{id}                                     get (with steps), update, delete
/// /boards/{id}/duplicate                           deep-copy (POST)
/// /boards/{id}/steps                               append step (POST)
/// /boards/{id}/steps/reorder                       reorder all steps (POST)
/// /boards/{board_id}/steps/{step_id}               update, delete
/// /boards/{id}/collaborators                       list
/// /boards/{board_id}/collaborators/{user_id}       change role (PUT), remove (DELETE)
/// /boards/{id}/leave                               leave board (POST)
/// /boards/{id}/invitations                         create (POST), list (owner)
///
/// /invitations                                     my pending invitations (GET)
/// /invitations/{id}/accept                         accept (POST)
/// /invitations/{id}/decline                        decline (POST)
///
/// /routines                                        list, create
/// /routines/{id}                                   get (with steps), update, delete
/// /routines/{id}/steps                             append step (POST)
/// /routines/{routine_id}/steps/{step_id}           update, delete
/// /routines/{id}/executions                        start (POST), list (GET)
/// /routines/executions/{id}                        finish (PUT)
/// /routines/{id}/stats                             execution statistics (GET)
///
/// /notifications                                   list (?unread_only, limit, offset), schedule reminder (POST)
/// /notifications/read-all                          mark all read (POST)
/// /notifications/unread-count                      unread count (GET)
/// /notifications/{id}/read                         mark read (POST)
/// /notifications/{id}/dismiss                      dismiss (POST)
/// /notifications/settings                          get/update settings (GET, PUT)
///
/// /moods                                           list (?from, to), log entry (POST)
/// /moods/summary                                   averages over a day window (GET)
///
/// /preferences                                     get, update (GET, PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // Authentication routes.
        .nest("/auth", auth::router())
        // Priority-matrix tasks.
        .nest("/tasks", tasks::router())
        // Boards, steps, and board-scoped collaboration.
        .nest("/boards", boards::router())
        // Invitations addressed to the authenticated user.
        .nest("/invitations", collaboration::invitation_router())
        // Routines, steps, executions, stats.
        .nest("/routines", routines::router())
        // Notifications and delivery settings.
        .nest("/notifications", notifications::router())
        // Mood / energy log.
        .nest("/moods", moods::router())
        // Accessibility preferences.
        .nest("/preferences", preferences::router())
}
