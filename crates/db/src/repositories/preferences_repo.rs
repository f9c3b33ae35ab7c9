//! Repository for the `user_preferences` table.

use momentum_core::types::DbId;
use sqlx::PgPool;

use crate::models::preferences::{UpdatePreferences, UserPreferences};

/// Column list for `user_preferences` queries.
const COLUMNS: &str = "id, user_id, theme, reduce_motion, font_scale, simplified_ui, \
                       sound_muted, color_overlay, created_at, updated_at";

/// Provides read/upsert access to accessibility preferences.
pub struct PreferencesRepo;

impl PreferencesRepo {
    /// Get a user's preferences row, if one exists.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<UserPreferences>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreferences>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or update a user's preferences. Absent fields keep their
    /// current (or default) values.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdatePreferences,
    ) -> Result<UserPreferences, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_preferences \
                (user_id, theme, reduce_motion, font_scale, simplified_ui, sound_muted, color_overlay) \
             VALUES ($1, COALESCE($2, 'system'), COALESCE($3, false), COALESCE($4, 1.0), \
                     COALESCE($5, false), COALESCE($6, false), $7) \
             ON CONFLICT (user_id) DO UPDATE SET \
                theme = COALESCE($2, user_preferences.theme), \
                reduce_motion = COALESCE($3, user_preferences.reduce_motion), \
                font_scale = COALESCE($4, user_preferences.font_scale), \
                simplified_ui = COALESCE($5, user_preferences.simplified_ui), \
                sound_muted = COALESCE($6, user_preferences.sound_muted), \
                color_overlay = COALESCE($7, user_preferences.color_overlay), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreferences>(&query)
            .bind(user_id)
            .bind(input.theme.as_deref())
            .bind(input.reduce_motion)
            .bind(input.font_scale)
            .bind(input.simplified_ui)
            .bind(input.sound_muted)
            .bind(input.color_overlay.as_deref())
            .fetch_one(pool)
            .await
    }
}
