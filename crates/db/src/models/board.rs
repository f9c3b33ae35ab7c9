//! Board and board step entity models and DTOs.

use momentum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `boards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Board {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub board_type: String,
    pub layout: String,
    pub is_template: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `board_steps` table.
///
/// `visual`, `timer`, and `transition` are free-form JSON owned by the
/// client; the server stores and copies them by value but never
/// interprets them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardStep {
    pub id: DbId,
    pub board_id: DbId,
    pub position: i32,
    pub title: String,
    pub visual: serde_json::Value,
    pub timer: serde_json::Value,
    pub transition: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a board.
#[derive(Debug, Deserialize)]
pub struct CreateBoard {
    pub title: String,
    pub board_type: String,
    pub layout: Option<String>,
    pub is_template: Option<bool>,
}

/// DTO for patching a board.
#[derive(Debug, Deserialize)]
pub struct UpdateBoard {
    pub title: Option<String>,
    pub layout: Option<String>,
    pub is_template: Option<bool>,
}

/// DTO for creating a board step.
#[derive(Debug, Deserialize)]
pub struct CreateBoardStep {
    pub title: String,
    pub visual: Option<serde_json::Value>,
    pub timer: Option<serde_json::Value>,
    pub transition: Option<serde_json::Value>,
}

/// DTO for patching a board step.
#[derive(Debug, Deserialize)]
pub struct UpdateBoardStep {
    pub title: Option<String>,
    pub visual: Option<serde_json::Value>,
    pub timer: Option<serde_json::Value>,
    pub transition: Option<serde_json::Value>,
}
