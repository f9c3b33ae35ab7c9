//! Reminder delivery scheduler.
//!
//! [`ReminderScheduler`] runs as a background task, periodically checking
//! for scheduled notifications whose delivery time has arrived. Each due
//! notification is checked against its user's quiet-hours / do-not-disturb
//! settings: suppressed ones are deferred to the end of the window, the
//! rest are stamped `sent_at` and announced on the event bus so the
//! WebSocket layer can push them to live connections.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use momentum_core::notifications::{decide_delivery, DeliveryDecision, DeliveryWindow};
use momentum_db::models::notification::Notification;
use momentum_db::repositories::{NotificationRepo, NotificationSettingsRepo};
use momentum_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::bus::{event_types, AppEvent, EventBus};

/// How often the scheduler polls for due notifications.
const CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Maximum notifications processed per tick.
const BATCH_LIMIT: i64 = 200;

// ---------------------------------------------------------------------------
// ReminderScheduler
// ---------------------------------------------------------------------------

/// Background service that delivers due scheduled notifications.
pub struct ReminderScheduler {
    pool: DbPool,
    bus: Arc<EventBus>,
}

impl ReminderScheduler {
    /// Create a new scheduler with the given database pool and event bus.
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }

    /// Run the scheduler loop.
    ///
    /// Checks every minute for due notifications. The loop exits gracefully
    /// when the provided [`CancellationToken`] is cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(CHECK_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reminder scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.process_due().await {
                        tracing::error!(error = %e, "Failed to process due notifications");
                    }
                }
            }
        }
    }

    /// Find all due notifications and deliver or defer each one.
    async fn process_due(&self) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        let due = NotificationRepo::list_due(&self.pool, now, BATCH_LIMIT).await?;

        let mut delivered = 0usize;
        let mut deferred = 0usize;

        for notification in &due {
            match self.deliver_one(notification).await {
                Ok(true) => delivered += 1,
                Ok(false) => deferred += 1,
                Err(e) => {
                    tracing::error!(
                        notification_id = notification.id,
                        error = %e,
                        "Failed to deliver notification"
                    );
                }
            }
        }

        if !due.is_empty() {
            tracing::info!(delivered, deferred, "Processed due notifications");
        }

        Ok(())
    }

    /// Deliver a single notification, honoring its user's suppression
    /// settings. Returns `true` if delivered, `false` if deferred.
    async fn deliver_one(&self, notification: &Notification) -> Result<bool, sqlx::Error> {
        let window = self.delivery_window(notification.user_id).await?;

        match decide_delivery(&notification.priority, &window, Utc::now()) {
            DeliveryDecision::Deliver => {
                NotificationRepo::mark_sent(&self.pool, notification.id).await?;

                self.bus.publish(
                    AppEvent::new(event_types::NOTIFICATION_DUE)
                        .with_source("notification", notification.id)
                        .with_payload(serde_json::json!({
                            "user_id": notification.user_id,
                            "kind": notification.kind,
                            "title": notification.title,
                        })),
                );

                Ok(true)
            }
            DeliveryDecision::Defer(until) => {
                NotificationRepo::defer(&self.pool, notification.id, until).await?;
                tracing::debug!(
                    notification_id = notification.id,
                    until = %until,
                    "Deferred notification into quiet hours end"
                );
                Ok(false)
            }
        }
    }

    /// Load a user's suppression settings, defaulting to "no suppression"
    /// when they have never saved settings.
    async fn delivery_window(
        &self,
        user_id: momentum_core::types::DbId,
    ) -> Result<DeliveryWindow, sqlx::Error> {
        let settings = NotificationSettingsRepo::get(&self.pool, user_id).await?;
        Ok(match settings {
            Some(s) => DeliveryWindow {
                quiet_hours_enabled: s.quiet_hours_enabled,
                quiet_start: s.quiet_start,
                quiet_end: s.quiet_end,
                dnd_until: s.dnd_until,
            },
            None => DeliveryWindow {
                quiet_hours_enabled: false,
                quiet_start: String::new(),
                quiet_end: String::new(),
                dnd_until: None,
            },
        })
    }
}
