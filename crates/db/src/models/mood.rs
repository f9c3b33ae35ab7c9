//! Mood entry model and DTOs.

use momentum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mood_entries` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MoodEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub mood: i16,
    pub energy: i16,
    pub focus: i16,
    pub tags: Vec<String>,
    pub energy_factors: Vec<String>,
    pub note: Option<String>,
    pub recorded_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for logging a mood entry.
#[derive(Debug, Deserialize)]
pub struct CreateMoodEntry {
    pub mood: i16,
    pub energy: i16,
    pub focus: i16,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub energy_factors: Vec<String>,
    pub note: Option<String>,
    /// Defaults to now when absent (backdated logging is allowed).
    pub recorded_at: Option<Timestamp>,
}

/// Aggregated mood statistics over a window.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MoodSummary {
    pub entry_count: i64,
    pub avg_mood: Option<f64>,
    pub avg_energy: Option<f64>,
    pub avg_focus: Option<f64>,
}
