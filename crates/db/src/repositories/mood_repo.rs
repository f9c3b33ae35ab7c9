//! Repository for the `mood_entries` table. Append-only.

use momentum_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::mood::{CreateMoodEntry, MoodEntry, MoodSummary};

/// Column list for `mood_entries` queries.
const COLUMNS: &str = "id, user_id, mood, energy, focus, tags, energy_factors, note, \
                       recorded_at, created_at";

/// Provides insert/list/summary operations for mood entries.
pub struct MoodRepo;

impl MoodRepo {
    /// Insert a mood entry, returning the full row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateMoodEntry,
    ) -> Result<MoodEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO mood_entries \
                (user_id, mood, energy, focus, tags, energy_factors, note, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MoodEntry>(&query)
            .bind(user_id)
            .bind(input.mood)
            .bind(input.energy)
            .bind(input.focus)
            .bind(&input.tags)
            .bind(&input.energy_factors)
            .bind(&input.note)
            .bind(input.recorded_at)
            .fetch_one(pool)
            .await
    }

    /// List a user's entries within an optional time window, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MoodEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mood_entries \
             WHERE user_id = $1 \
               AND ($2::timestamptz IS NULL OR recorded_at >= $2) \
               AND ($3::timestamptz IS NULL OR recorded_at < $3) \
             ORDER BY recorded_at DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, MoodEntry>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Aggregate averages over the trailing `days` days.
    pub async fn summary(
        pool: &PgPool,
        user_id: DbId,
        days: i32,
    ) -> Result<MoodSummary, sqlx::Error> {
        sqlx::query_as::<_, MoodSummary>(
            "SELECT COUNT(*) AS entry_count, \
                    AVG(mood)::float AS avg_mood, \
                    AVG(energy)::float AS avg_energy, \
                    AVG(focus)::float AS avg_focus \
             FROM mood_entries \
             WHERE user_id = $1 AND recorded_at >= NOW() - make_interval(days => $2)",
        )
        .bind(user_id)
        .bind(days)
        .fetch_one(pool)
        .await
    }
}
