//! Priority-matrix constants, task lifecycle states, and validation.
//!
//! This module lives in `core` (zero internal deps) so that the repository
//! layer, API handlers, and background services can all reference the same
//! quadrant names, status strings, and field limits.

// ---------------------------------------------------------------------------
// Quadrants
// ---------------------------------------------------------------------------

/// Known quadrants of the priority matrix (urgency x importance).
pub mod quadrants {
    pub const URGENT_IMPORTANT: &str = "urgent_important";
    pub const NOT_URGENT_IMPORTANT: &str = "not_urgent_important";
    pub const URGENT_NOT_IMPORTANT: &str = "urgent_not_important";
    pub const NOT_URGENT_NOT_IMPORTANT: &str = "not_urgent_not_important";
}

/// The set of all valid quadrants.
pub const VALID_QUADRANTS: &[&str] = &[
    quadrants::URGENT_IMPORTANT,
    quadrants::NOT_URGENT_IMPORTANT,
    quadrants::URGENT_NOT_IMPORTANT,
    quadrants::NOT_URGENT_NOT_IMPORTANT,
];

/// Returns `true` if the given quadrant name is valid.
pub fn is_valid_quadrant(quadrant: &str) -> bool {
    VALID_QUADRANTS.contains(&quadrant)
}

// ---------------------------------------------------------------------------
// Task statuses
// ---------------------------------------------------------------------------

/// Known task statuses.
pub mod statuses {
    pub const TODO: &str = "todo";
    pub const IN_PROGRESS: &str = "in_progress";
    pub const DONE: &str = "done";
}

/// The set of all valid task statuses.
pub const VALID_STATUSES: &[&str] = &[statuses::TODO, statuses::IN_PROGRESS, statuses::DONE];

/// Returns `true` if the given status is valid.
pub fn is_valid_status(status: &str) -> bool {
    VALID_STATUSES.contains(&status)
}

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

/// Maximum length of a task title in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum estimated duration of a task in minutes (24 hours).
pub const MAX_ESTIMATED_MINUTES: i32 = 1440;

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate a title: non-empty after trimming, within the length limit.
pub fn validate_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(format!(
            "Title must be at most {MAX_TITLE_LEN} characters, got {}",
            trimmed.chars().count()
        ));
    }
    Ok(())
}

/// Validate a 1-5 scale field (energy required, focus required, mood, ...).
pub fn validate_scale(field: &'static str, value: i16) -> Result<(), String> {
    if !(1..=5).contains(&value) {
        return Err(format!("{field} must be between 1 and 5, got {value}"));
    }
    Ok(())
}

/// Validate an estimated duration in minutes.
pub fn validate_estimated_minutes(minutes: i32) -> Result<(), String> {
    if minutes < 1 {
        return Err(format!(
            "Estimated duration must be at least 1 minute, got {minutes}"
        ));
    }
    if minutes > MAX_ESTIMATED_MINUTES {
        return Err(format!(
            "Estimated duration must be at most {MAX_ESTIMATED_MINUTES} minutes, got {minutes}"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Quadrant validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_valid_quadrants() {
        assert!(is_valid_quadrant("urgent_important"));
        assert!(is_valid_quadrant("not_urgent_important"));
        assert!(is_valid_quadrant("urgent_not_important"));
        assert!(is_valid_quadrant("not_urgent_not_important"));
    }

    #[test]
    fn test_invalid_quadrants() {
        assert!(!is_valid_quadrant(""));
        assert!(!is_valid_quadrant("urgent"));
        assert!(!is_valid_quadrant("URGENT_IMPORTANT"));
        assert!(!is_valid_quadrant("quadrant-1"));
    }

    // -----------------------------------------------------------------------
    // Status validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_valid_statuses() {
        assert!(is_valid_status("todo"));
        assert!(is_valid_status("in_progress"));
        assert!(is_valid_status("done"));
    }

    #[test]
    fn test_invalid_statuses() {
        assert!(!is_valid_status("pending"));
        assert!(!is_valid_status("Done"));
        assert!(!is_valid_status(""));
    }

    // -----------------------------------------------------------------------
    // Title validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_empty_title_rejected() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title("\t\n").is_err());
    }

    #[test]
    fn test_normal_title_accepted() {
        assert!(validate_title("Water the plants").is_ok());
        assert!(validate_title("  padded  ").is_ok());
    }

    #[test]
    fn test_overlong_title_rejected() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        let result = validate_title(&long);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("at most"));
    }

    #[test]
    fn test_title_at_limit_accepted() {
        let exact = "x".repeat(MAX_TITLE_LEN);
        assert!(validate_title(&exact).is_ok());
    }

    // -----------------------------------------------------------------------
    // Scale validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_scale_bounds() {
        assert!(validate_scale("energy_required", 1).is_ok());
        assert!(validate_scale("energy_required", 5).is_ok());
        assert!(validate_scale("energy_required", 0).is_err());
        assert!(validate_scale("energy_required", 6).is_err());
        assert!(validate_scale("energy_required", -3).is_err());
    }

    #[test]
    fn test_scale_error_names_field() {
        let result = validate_scale("focus_required", 9);
        assert!(result.unwrap_err().contains("focus_required"));
    }

    // -----------------------------------------------------------------------
    // Estimated duration validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_estimated_minutes_bounds() {
        assert!(validate_estimated_minutes(1).is_ok());
        assert!(validate_estimated_minutes(90).is_ok());
        assert!(validate_estimated_minutes(MAX_ESTIMATED_MINUTES).is_ok());
        assert!(validate_estimated_minutes(0).is_err());
        assert!(validate_estimated_minutes(MAX_ESTIMATED_MINUTES + 1).is_err());
    }
}
