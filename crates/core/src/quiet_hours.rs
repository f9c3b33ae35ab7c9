//! Quiet-hours range checks.
//!
//! A quiet-hours window is a pair of `HH:MM` strings in the user's clock.
//! A time T is inside the window when `start <= T < end`; when
//! `start > end` the window wraps midnight and T is inside when
//! `T >= start || T < end`. A window with `start == end` is empty and
//! never suppresses anything.

use chrono::{NaiveTime, Timelike};

use crate::types::Timestamp;

/// Minutes in a day, used for wraparound arithmetic.
const MINUTES_PER_DAY: u32 = 24 * 60;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an `HH:MM` string into minutes since midnight.
///
/// Accepts `00:00` through `23:59`. Returns an error message for anything
/// else (missing colon, out-of-range components, non-numeric input).
pub fn parse_hhmm(value: &str) -> Result<u32, String> {
    let (h, m) = value
        .split_once(':')
        .ok_or_else(|| format!("Invalid time '{value}': expected HH:MM"))?;

    let hours: u32 = h
        .parse()
        .map_err(|_| format!("Invalid time '{value}': hours must be numeric"))?;
    let minutes: u32 = m
        .parse()
        .map_err(|_| format!("Invalid time '{value}': minutes must be numeric"))?;

    if hours > 23 {
        return Err(format!("Invalid time '{value}': hours must be 0-23"));
    }
    if minutes > 59 {
        return Err(format!("Invalid time '{value}': minutes must be 0-59"));
    }

    Ok(hours * 60 + minutes)
}

/// Validate that a string is a well-formed `HH:MM` time.
pub fn validate_hhmm(value: &str) -> Result<(), String> {
    parse_hhmm(value).map(|_| ())
}

// ---------------------------------------------------------------------------
// Range checks
// ---------------------------------------------------------------------------

/// Half-open range check in minutes-since-midnight, with midnight wraparound.
fn contains(start: u32, end: u32, now: u32) -> bool {
    if start == end {
        // Empty window.
        false
    } else if start < end {
        now >= start && now < end
    } else {
        // Overnight window, e.g. 22:00 - 06:00.
        now >= start || now < end
    }
}

/// Returns `true` if `now` falls inside the `start`..`end` quiet window.
pub fn is_quiet_time(start: &str, end: &str, now: NaiveTime) -> Result<bool, String> {
    let start_min = parse_hhmm(start)?;
    let end_min = parse_hhmm(end)?;
    let now_min = now.hour() * 60 + now.minute();
    Ok(contains(start_min, end_min, now_min))
}

/// Compute the instant the current quiet window ends.
///
/// Assumes `now` is inside the window (callers check [`is_quiet_time`]
/// first); if the window end has already passed today, the end is tomorrow.
/// Seconds are truncated so deferred deliveries land exactly on the minute.
pub fn window_end(start: &str, end: &str, now: Timestamp) -> Result<Timestamp, String> {
    let start_min = parse_hhmm(start)?;
    let end_min = parse_hhmm(end)?;
    let now_min = now.time().hour() * 60 + now.time().minute();

    let minutes_until_end = if start_min < end_min {
        // Same-day window: end is later today.
        end_min.saturating_sub(now_min)
    } else if now_min >= start_min {
        // Overnight window, evening side: end is tomorrow morning.
        (MINUTES_PER_DAY - now_min) + end_min
    } else {
        // Overnight window, morning side: end is later this morning.
        end_min.saturating_sub(now_min)
    };

    let truncated = now - chrono::Duration::seconds(i64::from(now.time().second()));
    Ok(truncated + chrono::Duration::minutes(i64::from(minutes_until_end)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_valid_times() {
        assert_eq!(parse_hhmm("00:00").unwrap(), 0);
        assert_eq!(parse_hhmm("09:30").unwrap(), 570);
        assert_eq!(parse_hhmm("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_hhmm("").is_err());
        assert!(parse_hhmm("9am").is_err());
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("12:60").is_err());
        assert!(parse_hhmm("12").is_err());
        assert!(parse_hhmm("ab:cd").is_err());
    }

    // -----------------------------------------------------------------------
    // Same-day window
    // -----------------------------------------------------------------------

    #[test]
    fn test_same_day_window() {
        // 13:00 - 15:00
        assert!(is_quiet_time("13:00", "15:00", t(13, 0)).unwrap());
        assert!(is_quiet_time("13:00", "15:00", t(14, 30)).unwrap());
        assert!(!is_quiet_time("13:00", "15:00", t(15, 0)).unwrap());
        assert!(!is_quiet_time("13:00", "15:00", t(12, 59)).unwrap());
    }

    // -----------------------------------------------------------------------
    // Overnight wraparound window
    // -----------------------------------------------------------------------

    #[test]
    fn test_overnight_window_late_evening() {
        // start=22:00, end=06:00, now=23:30 must be inside.
        assert!(is_quiet_time("22:00", "06:00", t(23, 30)).unwrap());
    }

    #[test]
    fn test_overnight_window_early_morning() {
        assert!(is_quiet_time("22:00", "06:00", t(2, 15)).unwrap());
        assert!(is_quiet_time("22:00", "06:00", t(5, 59)).unwrap());
    }

    #[test]
    fn test_overnight_window_daytime_outside() {
        assert!(!is_quiet_time("22:00", "06:00", t(6, 0)).unwrap());
        assert!(!is_quiet_time("22:00", "06:00", t(12, 0)).unwrap());
        assert!(!is_quiet_time("22:00", "06:00", t(21, 59)).unwrap());
    }

    #[test]
    fn test_empty_window_never_matches() {
        assert!(!is_quiet_time("08:00", "08:00", t(8, 0)).unwrap());
        assert!(!is_quiet_time("08:00", "08:00", t(20, 0)).unwrap());
    }

    #[test]
    fn test_invalid_time_propagates_error() {
        assert!(is_quiet_time("25:00", "06:00", t(1, 0)).is_err());
    }

    // -----------------------------------------------------------------------
    // Window end computation
    // -----------------------------------------------------------------------

    #[test]
    fn test_window_end_same_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 13, 30, 45).unwrap();
        let end = window_end("13:00", "15:00", now).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_window_end_overnight_evening_side() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        let end = window_end("22:00", "06:00", now).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 3, 11, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_window_end_overnight_morning_side() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap();
        let end = window_end("22:00", "06:00", now).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 3, 10, 6, 0, 0).unwrap());
    }
}
