//! Routine, routine step, and execution models and DTOs.

use momentum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `routines` table.
///
/// `total_minutes` and `flexibility_score` are derived from the step rows
/// and rewritten on every step mutation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Routine {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub total_minutes: i32,
    pub flexibility_score: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `routine_steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoutineStep {
    pub id: DbId,
    pub routine_id: DbId,
    pub position: i32,
    pub title: String,
    pub duration_minutes: i32,
    pub is_flexible: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `routine_executions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoutineExecution {
    pub id: DbId,
    pub routine_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub steps_completed: i32,
    pub steps_skipped: i32,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// Aggregated execution statistics for a routine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoutineStats {
    pub total_runs: i64,
    pub completed_runs: i64,
    pub abandoned_runs: i64,
    /// Mean wall-clock minutes of completed runs; `None` with no completions.
    pub avg_completed_minutes: Option<f64>,
}

/// DTO for creating a routine.
#[derive(Debug, Deserialize)]
pub struct CreateRoutine {
    pub title: String,
    pub description: Option<String>,
}

/// DTO for patching a routine.
#[derive(Debug, Deserialize)]
pub struct UpdateRoutine {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// DTO for creating a routine step.
#[derive(Debug, Deserialize)]
pub struct CreateRoutineStep {
    pub title: String,
    pub duration_minutes: i32,
    pub is_flexible: Option<bool>,
}

/// DTO for patching a routine step.
#[derive(Debug, Deserialize)]
pub struct UpdateRoutineStep {
    pub title: Option<String>,
    pub duration_minutes: Option<i32>,
    pub is_flexible: Option<bool>,
}

/// DTO for finishing an execution.
#[derive(Debug, Deserialize)]
pub struct FinishExecution {
    /// Terminal status: `completed` or `abandoned`.
    pub status: String,
    pub steps_completed: Option<i32>,
    pub steps_skipped: Option<i32>,
    pub notes: Option<String>,
}
