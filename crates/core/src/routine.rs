//! Routine derived fields and step validation.
//!
//! `total_minutes` and `flexibility_score` are recomputed from the step
//! rows on every mutation and written back, so stored values are never
//! stale relative to the steps.

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum duration of a single routine step in minutes (8 hours).
pub const MAX_STEP_MINUTES: i32 = 480;

// ---------------------------------------------------------------------------
// Derived fields
// ---------------------------------------------------------------------------

/// Sum of step durations in minutes.
pub fn total_minutes(durations: &[i32]) -> i32 {
    durations.iter().sum()
}

/// Ratio of flexible steps to total steps, in `0.0..=1.0`.
///
/// A routine with no steps has a flexibility score of `0.0`.
pub fn flexibility_score(flexible: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        flexible as f64 / total as f64
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a step duration in minutes.
pub fn validate_step_minutes(minutes: i32) -> Result<(), String> {
    if minutes < 1 {
        return Err(format!(
            "Step duration must be at least 1 minute, got {minutes}"
        ));
    }
    if minutes > MAX_STEP_MINUTES {
        return Err(format!(
            "Step duration must be at most {MAX_STEP_MINUTES} minutes, got {minutes}"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Execution statuses
// ---------------------------------------------------------------------------

/// Known routine execution statuses.
pub mod execution_statuses {
    pub const RUNNING: &str = "running";
    pub const COMPLETED: &str = "completed";
    pub const ABANDONED: &str = "abandoned";
}

/// Statuses an execution can be finished with.
pub const FINISHABLE_STATUSES: &[&str] = &[
    execution_statuses::COMPLETED,
    execution_statuses::ABANDONED,
];

/// Returns `true` if the given status is a valid terminal execution status.
pub fn is_finishable_status(status: &str) -> bool {
    FINISHABLE_STATUSES.contains(&status)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
