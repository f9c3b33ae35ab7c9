//! Routes application events to users as notifications.
//!
//! [`NotificationRouter`] subscribes to the event bus and turns events that
//! name a recipient (a `notify_user_id` payload field) into notification
//! rows, delivered immediately over WebSocket or parked with a
//! `scheduled_for` when the recipient's quiet hours / DND suppress them.
//! `notification.due` events from the reminder scheduler are pushed
//! straight through to the recipient's live connections.

use std::sync::Arc;

use axum::extract::ws::Message;
use chrono::Utc;
use momentum_core::notifications::{decide_delivery, kinds, priorities, DeliveryDecision, DeliveryWindow};
use momentum_core::types::DbId;
use momentum_db::models::notification::Notification;
use momentum_db::repositories::{CollaboratorRepo, NotificationRepo, NotificationSettingsRepo};
use momentum_db::DbPool;
use momentum_events::bus::event_types;
use momentum_events::AppEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Background service that fans events out to user notifications.
pub struct NotificationRouter {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
}

impl NotificationRouter {
    /// Create a new router with the given pool and connection manager.
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>) -> Self {
        Self { pool, ws_manager }
    }

    /// Run the routing loop.
    ///
    /// Consumes events from the provided `receiver` until the bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<AppEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event to notifications"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Route a single event.
    async fn route(&self, event: &AppEvent) -> Result<(), sqlx::Error> {
        // Scheduler-delivered reminders: already stamped sent, just push.
        if event.event_type == event_types::NOTIFICATION_DUE {
            if let Some(user_id) = event.payload["user_id"].as_i64() {
                self.push(user_id, "notification.due", &event.payload).await;
            }
            return Ok(());
        }

        // Board content changes are live-sync pushes to every collaborator
        // except the actor; they never become notification rows.
        if event.event_type == event_types::BOARD_UPDATED {
            self.broadcast_board_update(event).await?;
            return Ok(());
        }

        // Everything else only produces a notification when the emitting
        // handler named a recipient.
        let Some(recipient) = event.payload["notify_user_id"].as_i64() else {
            return Ok(());
        };

        let Some(kind) = kind_for_event(&event.event_type) else {
            return Ok(());
        };

        let title = event.payload["title"]
            .as_str()
            .unwrap_or("Activity on your board")
            .to_string();
        let body = event.payload["body"].as_str().map(str::to_string);

        let window = self.delivery_window(recipient).await?;
        let now = Utc::now();

        let notification = match decide_delivery(priorities::NORMAL, &window, now) {
            DeliveryDecision::Deliver => {
                let n = NotificationRepo::create(
                    &self.pool,
                    recipient,
                    kind,
                    priorities::NORMAL,
                    &title,
                    body.as_deref(),
                    None,
                    Some(now),
                )
                .await?;
                Some(n)
            }
            DeliveryDecision::Defer(until) => {
                NotificationRepo::create(
                    &self.pool,
                    recipient,
                    kind,
                    priorities::NORMAL,
                    &title,
                    body.as_deref(),
                    Some(until),
                    None,
                )
                .await?;
                tracing::debug!(
                    user_id = recipient,
                    until = %until,
                    "Notification parked until quiet hours end"
                );
                None
            }
        };

        if let Some(n) = notification {
            self.push_notification(&n).await;
        }

        Ok(())
    }

    /// Push a `board.updated` sync message to all collaborators but the actor.
    async fn broadcast_board_update(&self, event: &AppEvent) -> Result<(), sqlx::Error> {
        let Some(board_id) = event.source_entity_id else {
            return Ok(());
        };

        let collaborators = CollaboratorRepo::list_with_users(&self.pool, board_id).await?;
        let payload = serde_json::json!({
            "board_id": board_id,
            "change": event.payload["change"],
        });
        for collaborator in collaborators {
            if Some(collaborator.user_id) == event.actor_user_id {
                continue;
            }
            self.push(collaborator.user_id, "board.updated", &payload)
                .await;
        }
        Ok(())
    }

    /// Push a freshly delivered notification to the recipient's connections.
    async fn push_notification(&self, notification: &Notification) {
        let payload = serde_json::json!({ "notification": notification });
        self.push(notification.user_id, "notification.new", &payload)
            .await;
    }

    /// Serialize and send a typed message to all of a user's connections.
    async fn push(&self, user_id: DbId, message_type: &str, payload: &serde_json::Value) {
        let mut envelope = serde_json::json!({ "type": message_type });
        if let (Some(obj), Some(extra)) = (envelope.as_object_mut(), payload.as_object()) {
            for (k, v) in extra {
                obj.insert(k.clone(), v.clone());
            }
        }
        let text = envelope.to_string();
        let sent = self
            .ws_manager
            .send_to_user(user_id, Message::Text(text.into()))
            .await;
        tracing::trace!(user_id, connections = sent, message_type, "Pushed WS message");
    }

    /// Load a user's suppression settings, defaulting to "no suppression".
    async fn delivery_window(&self, user_id: DbId) -> Result<DeliveryWindow, sqlx::Error> {
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

/// Map an event type to the notification kind it produces, if any.
fn kind_for_event(event_type: &str) -> Option<&'static str> {
    match event_type {
        event_types::INVITATION_CREATED => Some(kinds::BOARD_INVITE),
        event_types::INVITATION_ACCEPTED
        | event_types::INVITATION_DECLINED
        | event_types::COLLABORATOR_ROLE_CHANGED
        | event_types::COLLABORATOR_REMOVED => Some(kinds::COLLAB_UPDATE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            kind_for_event(event_types::INVITATION_CREATED),
            Some(kinds::BOARD_INVITE)
        );
        assert_eq!(
            kind_for_event(event_types::COLLABORATOR_REMOVED),
            Some(kinds::COLLAB_UPDATE)
        );
        // Audit-only and live-sync events never become notification rows.
        assert_eq!(kind_for_event(event_types::TASK_COMPLETED), None);
        assert_eq!(kind_for_event(event_types::BOARD_UPDATED), None);
        assert_eq!(kind_for_event(event_types::ROUTINE_EXECUTION_FINISHED), None);
    }
}
