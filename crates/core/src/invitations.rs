//! Board invitation lifecycle.
//!
//! Invitations address users by email, carry the role to grant, and expire
//! after a fixed TTL. Status transitions are one-way: `pending` goes to
//! exactly one of `accepted`, `declined`, or `expired`.

use crate::types::Timestamp;

/// Days an invitation stays acceptable after creation.
pub const INVITATION_TTL_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Known invitation statuses.
pub mod statuses {
    pub const PENDING: &str = "pending";
    pub const ACCEPTED: &str = "accepted";
    pub const DECLINED: &str = "declined";
    pub const EXPIRED: &str = "expired";
}

/// The set of all valid invitation statuses.
pub const VALID_STATUSES: &[&str] = &[
    statuses::PENDING,
    statuses::ACCEPTED,
    statuses::DECLINED,
    statuses::EXPIRED,
];

/// Returns `true` if the given status is valid.
pub fn is_valid_status(status: &str) -> bool {
    VALID_STATUSES.contains(&status)
}

/// Returns `true` if the invitation's deadline has passed.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    now >= expires_at
}

/// Validate an invitee email address.
///
/// Deliberately shallow: one `@` with a non-empty local part and a domain
/// containing a dot. Deliverability is the mail system's problem.
pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(format!("Invalid email address '{trimmed}'"));
    };
    if local.is_empty() || domain.len() < 3 || !domain.contains('.') || domain.contains('@') {
        return Err(format!("Invalid email address '{trimmed}'"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_valid_statuses() {
        assert!(is_valid_status("pending"));
        assert!(is_valid_status("accepted"));
        assert!(is_valid_status("declined"));
        assert!(is_valid_status("expired"));
        assert!(!is_valid_status("revoked"));
    }

    #[test]
    fn test_expiry_check() {
        let now = Utc::now();
        assert!(!is_expired(now + Duration::days(1), now));
        assert!(is_expired(now - Duration::seconds(1), now));
        // Boundary: exactly at the deadline counts as expired.
        assert!(is_expired(now, now));
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("sam@example.com").is_ok());
        assert!(validate_email("  padded@example.org  ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("sam@nodot").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }
}
