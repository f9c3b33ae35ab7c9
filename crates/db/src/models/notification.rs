//! Notification entity models and DTOs.

use momentum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// The nullable timestamps are the state: unsent while `sent_at` is null,
/// unread while `read_at` is null, live while `dismissed_at` is null.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub priority: String,
    pub title: String,
    pub body: Option<String>,
    pub scheduled_for: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
    pub read_at: Option<Timestamp>,
    pub dismissed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A row from the `notification_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationSettings {
    pub id: DbId,
    pub user_id: DbId,
    pub quiet_hours_enabled: bool,
    pub quiet_start: String,
    pub quiet_end: String,
    pub dnd_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for scheduling a reminder notification.
#[derive(Debug, Deserialize)]
pub struct CreateReminder {
    pub title: String,
    pub body: Option<String>,
    pub priority: Option<String>,
    pub scheduled_for: Timestamp,
}

/// DTO for updating notification settings.
///
/// Absent fields are left unchanged. DND is cleared by setting `dnd_until`
/// to a past instant (an elapsed DND never suppresses).
#[derive(Debug, Deserialize)]
pub struct UpdateNotificationSettings {
    pub quiet_hours_enabled: Option<bool>,
    pub quiet_start: Option<String>,
    pub quiet_end: Option<String>,
    pub dnd_until: Option<Timestamp>,
}
