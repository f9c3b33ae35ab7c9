//! Repositories for the `notifications` and `notification_settings` tables.

use momentum_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::notification::{
    Notification, NotificationSettings, UpdateNotificationSettings,
};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, kind, priority, title, body, scheduled_for, \
                       sent_at, read_at, dismissed_at, created_at";

/// Column list for `notification_settings` queries.
const SETTINGS_COLUMNS: &str = "id, user_id, quiet_hours_enabled, quiet_start, quiet_end, \
                                dnd_until, created_at, updated_at";

// ---------------------------------------------------------------------------
// NotificationRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, returning the full row.
    ///
    /// `sent_at` is `None` for scheduled/deferred notifications and the
    /// delivery instant for ones pushed immediately.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        kind: &str,
        priority: &str,
        title: &str,
        body: Option<&str>,
        scheduled_for: Option<Timestamp>,
        sent_at: Option<Timestamp>,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, kind, priority, title, body, scheduled_for, sent_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(kind)
            .bind(priority)
            .bind(title)
            .bind(body)
            .bind(scheduled_for)
            .bind(sent_at)
            .fetch_one(pool)
            .await
    }

    /// List a user's live (undismissed) notifications, newest first.
    ///
    /// When `unread_only` is `true`, only delivered-but-unread rows are
    /// returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND sent_at IS NOT NULL AND read_at IS NULL"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 AND dismissed_at IS NULL {filter} \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification was found for the given user and
    /// updated, `false` otherwise.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND read_at IS NULL",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() \
             WHERE user_id = $1 AND read_at IS NULL AND dismissed_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of delivered, unread, undismissed notifications.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE user_id = $1 AND sent_at IS NOT NULL \
               AND read_at IS NULL AND dismissed_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Dismiss a notification.
    ///
    /// Returns `true` if the notification was found for the given user and
    /// dismissed, `false` otherwise.
    pub async fn dismiss(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET dismissed_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND dismissed_at IS NULL",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List notifications due for delivery: scheduled, unsent, undismissed.
    pub async fn list_due(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE sent_at IS NULL AND dismissed_at IS NULL \
               AND scheduled_for IS NOT NULL AND scheduled_for <= $1 \
             ORDER BY scheduled_for \
             LIMIT $2"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(now)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Stamp a notification as sent.
    pub async fn mark_sent(pool: &PgPool, notification_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE notifications SET sent_at = NOW() WHERE id = $1")
            .bind(notification_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Push an unsent notification's `scheduled_for` to a later instant.
    pub async fn defer(
        pool: &PgPool,
        notification_id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notifications SET scheduled_for = $2 WHERE id = $1 AND sent_at IS NULL",
        )
        .bind(notification_id)
        .bind(until)
        .execute(pool)
        .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NotificationSettingsRepo
// ---------------------------------------------------------------------------

/// Provides read/upsert access to per-user notification settings.
pub struct NotificationSettingsRepo;

impl NotificationSettingsRepo {
    /// Get a user's settings row, if one exists.
    pub async fn get(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<NotificationSettings>, sqlx::Error> {
        let query = format!(
            "SELECT {SETTINGS_COLUMNS} FROM notification_settings WHERE user_id = $1"
        );
        sqlx::query_as::<_, NotificationSettings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or update a user's settings. Absent fields keep their
    /// current (or default) values.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateNotificationSettings,
    ) -> Result<NotificationSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_settings \
                (user_id, quiet_hours_enabled, quiet_start, quiet_end, dnd_until) \
             VALUES ($1, COALESCE($2, false), COALESCE($3, '22:00'), COALESCE($4, '07:00'), $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
                quiet_hours_enabled = COALESCE($2, notification_settings.quiet_hours_enabled), \
                quiet_start = COALESCE($3, notification_settings.quiet_start), \
                quiet_end = COALESCE($4, notification_settings.quiet_end), \
                dnd_until = COALESCE($5, notification_settings.dnd_until), \
                updated_at = NOW() \
             RETURNING {SETTINGS_COLUMNS}"
        );
        sqlx::query_as::<_, NotificationSettings>(&query)
            .bind(user_id)
            .bind(input.quiet_hours_enabled)
            .bind(input.quiet_start.as_deref())
            .bind(input.quiet_end.as_deref())
            .bind(input.dnd_until)
            .fetch_one(pool)
            .await
    }
}
