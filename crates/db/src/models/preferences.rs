//! Accessibility preference model and DTO.

use momentum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPreferences {
    pub id: DbId,
    pub user_id: DbId,
    pub theme: String,
    pub reduce_motion: bool,
    pub font_scale: f64,
    pub simplified_ui: bool,
    pub sound_muted: bool,
    pub color_overlay: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating preferences. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferences {
    pub theme: Option<String>,
    pub reduce_motion: Option<bool>,
    pub font_scale: Option<f64>,
    pub simplified_ui: Option<bool>,
    pub sound_muted: Option<bool>,
    pub color_overlay: Option<String>,
}
