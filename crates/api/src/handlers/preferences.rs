//! Handlers for the `/preferences` resource (accessibility / sensory).

use axum::extract::State;
use axum::Json;
use momentum_core::error::CoreError;
use momentum_core::preferences::{is_valid_theme, validate_color_overlay, validate_font_scale};
use momentum_db::models::preferences::UpdatePreferences;
use momentum_db::repositories::PreferencesRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/preferences
///
/// Get the authenticated user's accessibility preferences. Users who have
/// never saved preferences get the defaults.
pub async fn get_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let prefs = PreferencesRepo::get(&state.pool, auth.user_id).await?;

    let data = match prefs {
        Some(p) => serde_json::to_value(p)
            .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?,
        None => serde_json::json!({
            "user_id": auth.user_id,
            "theme": "system",
            "reduce_motion": false,
            "font_scale": 1.0,
            "simplified_ui": false,
            "sound_muted": false,
            "color_overlay": null,
        }),
    };

    Ok(Json(serde_json::json!({ "data": data })))
}

/// PUT /api/v1/preferences
///
/// Update the authenticated user's accessibility preferences.
pub async fn update_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdatePreferences>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(theme) = input.theme.as_deref() {
        if !is_valid_theme(theme) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid theme '{theme}'"
            ))));
        }
    }
    if let Some(scale) = input.font_scale {
        validate_font_scale(scale).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(color) = input.color_overlay.as_deref() {
        validate_color_overlay(color).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let prefs = PreferencesRepo::upsert(&state.pool, auth.user_id, &input).await?;

    Ok(Json(serde_json::json!({ "data": prefs })))
}
