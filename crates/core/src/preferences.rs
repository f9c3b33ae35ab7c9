//! Accessibility and sensory preference constants and validation.

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

/// Known themes.
pub mod themes {
    pub const SYSTEM: &str = "system";
    pub const LIGHT: &str = "light";
    pub const DARK: &str = "dark";
    pub const LOW_CONTRAST: &str = "low_contrast";
}

/// The set of all valid themes.
pub const VALID_THEMES: &[&str] = &[
    themes::SYSTEM,
    themes::LIGHT,
    themes::DARK,
    themes::LOW_CONTRAST,
];

/// Returns `true` if the given theme name is valid.
pub fn is_valid_theme(theme: &str) -> bool {
    VALID_THEMES.contains(&theme)
}

// ---------------------------------------------------------------------------
// Font scale
// ---------------------------------------------------------------------------

/// Minimum font scale factor.
pub const MIN_FONT_SCALE: f64 = 0.8;

/// Maximum font scale factor.
pub const MAX_FONT_SCALE: f64 = 1.6;

/// Validate a font scale factor.
pub fn validate_font_scale(scale: f64) -> Result<(), String> {
    if !(MIN_FONT_SCALE..=MAX_FONT_SCALE).contains(&scale) {
        return Err(format!(
            "Font scale must be between {MIN_FONT_SCALE} and {MAX_FONT_SCALE}, got {scale}"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Color overlay
// ---------------------------------------------------------------------------

/// Validate a color overlay as a `#rrggbb` hex string.
pub fn validate_color_overlay(color: &str) -> Result<(), String> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(format!(
            "Color overlay must be a #rrggbb hex string, got '{color}'"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
