//! Mood entry validation.
//!
//! Mood entries are an append-only log: mood, energy, and focus on the
//! shared 1-5 scale, plus free-form tags and energy factors.

use crate::matrix::validate_scale;

/// Maximum number of tags / energy factors per entry.
pub const MAX_TAGS: usize = 20;

/// Maximum length of a single tag in characters.
pub const MAX_TAG_LEN: usize = 50;

/// Validate the three scale fields of a mood entry.
pub fn validate_scales(mood: i16, energy: i16, focus: i16) -> Result<(), String> {
    validate_scale("mood", mood)?;
    validate_scale("energy", energy)?;
    validate_scale("focus", focus)?;
    Ok(())
}

/// Validate a tag list (tags or energy factors).
///
/// Each tag must be non-empty after trimming and within the length limit.
pub fn validate_tags(field: &'static str, tags: &[String]) -> Result<(), String> {
    if tags.len() > MAX_TAGS {
        return Err(format!("{field} must have at most {MAX_TAGS} entries"));
    }
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(format!("{field} must not contain empty entries"));
        }
        if trimmed.chars().count() > MAX_TAG_LEN {
            return Err(format!(
                "{field} entries must be at most {MAX_TAG_LEN} characters"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_validated_together() {
        assert!(validate_scales(3, 3, 3).is_ok());
        assert!(validate_scales(1, 5, 2).is_ok());
        assert!(validate_scales(0, 3, 3).is_err());
        assert!(validate_scales(3, 6, 3).is_err());
        assert!(validate_scales(3, 3, -1).is_err());
    }

    #[test]
    fn test_scale_error_names_offending_field() {
        let err = validate_scales(3, 9, 3).unwrap_err();
        assert!(err.contains("energy"));
    }

    #[test]
    fn test_tags_accept_normal_lists() {
        let tags = vec!["overwhelmed".to_string(), "after-meeting".to_string()];
        assert!(validate_tags("tags", &tags).is_ok());
        assert!(validate_tags("tags", &[]).is_ok());
    }

    #[test]
    fn test_tags_reject_empty_and_overlong() {
        assert!(validate_tags("tags", &["  ".to_string()]).is_err());
        let long = "x".repeat(MAX_TAG_LEN + 1);
        assert!(validate_tags("tags", &[long]).is_err());
    }

    #[test]
    fn test_too_many_tags_rejected() {
        let tags: Vec<String> = (0..MAX_TAGS + 1).map(|i| format!("tag{i}")).collect();
        let err = validate_tags("energy_factors", &tags).unwrap_err();
        assert!(err.contains("energy_factors"));
    }
}
