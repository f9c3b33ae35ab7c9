//! Route definitions for the `/moods` resource.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::moods;
use crate::state::AppState;

/// Routes mounted at `/moods`.
///
/// ```text
/// GET  /         -> list_entries
/// POST /         -> create_entry
/// GET  /summary  -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(moods::list_entries).post(moods::create_entry))
        .route("/summary", get(moods::summary))
}
