//! Task entity models and DTOs.

use momentum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub notes: Option<String>,
    pub status: String,
    pub quadrant: String,
    pub position: i32,
    pub due_date: Option<Timestamp>,
    pub estimated_minutes: Option<i32>,
    pub energy_required: Option<i16>,
    pub focus_required: Option<i16>,
    pub completed_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub notes: Option<String>,
    pub quadrant: String,
    pub due_date: Option<Timestamp>,
    pub estimated_minutes: Option<i32>,
    pub energy_required: Option<i16>,
    pub focus_required: Option<i16>,
}

/// DTO for patching a task. All fields optional; absent fields are kept.
#[derive(Debug, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<Timestamp>,
    pub estimated_minutes: Option<i32>,
    pub energy_required: Option<i16>,
    pub focus_required: Option<i16>,
}

/// DTO for moving a task to a quadrant/position (the drag-and-drop backend).
#[derive(Debug, Deserialize)]
pub struct MoveTask {
    pub quadrant: String,
    pub position: i32,
}
