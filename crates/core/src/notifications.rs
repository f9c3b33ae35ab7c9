//! Notification kinds, priorities, and the delivery decision.
//!
//! The delivery decision combines quiet hours and do-not-disturb into a
//! single answer used by both the notification router (live events) and
//! the reminder scheduler (due scheduled notifications): deliver now, or
//! defer until a specific instant. Urgent notifications always deliver.

use serde::{Deserialize, Serialize};

use crate::quiet_hours;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Known notification kinds.
pub mod kinds {
    pub const REMINDER: &str = "reminder";
    pub const BOARD_INVITE: &str = "board_invite";
    pub const COLLAB_UPDATE: &str = "collab_update";
    pub const SYSTEM: &str = "system";
}

/// The set of all valid notification kinds.
pub const VALID_KINDS: &[&str] = &[
    kinds::REMINDER,
    kinds::BOARD_INVITE,
    kinds::COLLAB_UPDATE,
    kinds::SYSTEM,
];

/// Returns `true` if the given kind is valid.
pub fn is_valid_kind(kind: &str) -> bool {
    VALID_KINDS.contains(&kind)
}

// ---------------------------------------------------------------------------
// Priorities
// ---------------------------------------------------------------------------

/// Known notification priorities.
pub mod priorities {
    pub const LOW: &str = "low";
    pub const NORMAL: &str = "normal";
    pub const URGENT: &str = "urgent";
}

/// The set of all valid priorities.
pub const VALID_PRIORITIES: &[&str] =
    &[priorities::LOW, priorities::NORMAL, priorities::URGENT];

/// Returns `true` if the given priority is valid.
pub fn is_valid_priority(priority: &str) -> bool {
    VALID_PRIORITIES.contains(&priority)
}

// ---------------------------------------------------------------------------
// Delivery decision
// ---------------------------------------------------------------------------

/// A user's suppression settings, as read from `notification_settings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryWindow {
    pub quiet_hours_enabled: bool,
    /// Window start, `HH:MM`.
    pub quiet_start: String,
    /// Window end, `HH:MM`.
    pub quiet_end: String,
    /// Do-not-disturb: suppress everything non-urgent until this instant.
    pub dnd_until: Option<Timestamp>,
}

/// The outcome of a delivery check.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryDecision {
    /// Deliver immediately.
    Deliver,
    /// Hold until the given instant.
    Defer(Timestamp),
}

/// Decide whether a notification may be delivered at `now`.
///
/// Urgent notifications always deliver. Otherwise DND wins over quiet
/// hours (its explicit end instant is the defer target); quiet hours
/// defer to the end of the current window. Malformed window strings are
/// treated as no window at all rather than blocking delivery.
pub fn decide_delivery(
    priority: &str,
    window: &DeliveryWindow,
    now: Timestamp,
) -> DeliveryDecision {
    if priority == priorities::URGENT {
        return DeliveryDecision::Deliver;
    }

    if let Some(dnd_until) = window.dnd_until {
        if dnd_until > now {
            return DeliveryDecision::Defer(dnd_until);
        }
    }

    if window.quiet_hours_enabled {
        let inside =
            quiet_hours::is_quiet_time(&window.quiet_start, &window.quiet_end, now.time())
                .unwrap_or(false);
        if inside {
            if let Ok(end) = quiet_hours::window_end(&window.quiet_start, &window.quiet_end, now)
            {
                return DeliveryDecision::Defer(end);
            }
        }
    }

    DeliveryDecision::Deliver
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window(enabled: bool, start: &str, end: &str) -> DeliveryWindow {
        DeliveryWindow {
            quiet_hours_enabled: enabled,
            quiet_start: start.to_string(),
            quiet_end: end.to_string(),
            dnd_until: None,
        }
    }

    #[test]
    fn test_kind_and_priority_validation() {
        assert!(is_valid_kind("reminder"));
        assert!(is_valid_kind("board_invite"));
        assert!(!is_valid_kind("email"));
        assert!(is_valid_priority("urgent"));
        assert!(!is_valid_priority("critical"));
    }

    #[test]
    fn test_delivers_outside_quiet_hours() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let decision = decide_delivery("normal", &window(true, "22:00", "06:00"), now);
        assert_eq!(decision, DeliveryDecision::Deliver);
    }

    #[test]
    fn test_defers_inside_overnight_quiet_hours() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        let decision = decide_delivery("normal", &window(true, "22:00", "06:00"), now);
        let expected_end = Utc.with_ymd_and_hms(2026, 3, 11, 6, 0, 0).unwrap();
        assert_eq!(decision, DeliveryDecision::Defer(expected_end));
    }

    #[test]
    fn test_urgent_ignores_quiet_hours() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        let decision = decide_delivery("urgent", &window(true, "22:00", "06:00"), now);
        assert_eq!(decision, DeliveryDecision::Deliver);
    }

    #[test]
    fn test_disabled_quiet_hours_delivers() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        let decision = decide_delivery("normal", &window(false, "22:00", "06:00"), now);
        assert_eq!(decision, DeliveryDecision::Deliver);
    }

    #[test]
    fn test_dnd_defers_until_its_end() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let dnd_until = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let mut w = window(false, "22:00", "06:00");
        w.dnd_until = Some(dnd_until);
        assert_eq!(
            decide_delivery("normal", &w, now),
            DeliveryDecision::Defer(dnd_until)
        );
    }

    #[test]
    fn test_elapsed_dnd_is_ignored() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let mut w = window(false, "22:00", "06:00");
        w.dnd_until = Some(Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap());
        assert_eq!(decide_delivery("normal", &w, now), DeliveryDecision::Deliver);
    }

    #[test]
    fn test_malformed_window_does_not_block() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        let decision = decide_delivery("normal", &window(true, "bogus", "06:00"), now);
        assert_eq!(decision, DeliveryDecision::Deliver);
    }
}
