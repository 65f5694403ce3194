//! Overlay appearance and geometry settings
//!
//! Defaults mirror the portal's comment markers (32 px round badges with a
//! dark detail card). Sizes can be overridden from the environment:
//! - `BUGWAVE_MARKER_SIZE`: marker diameter in pixels
//! - `BUGWAVE_POPUP_WIDTH`: detail card width in pixels

use crate::scene::Color;

/// Environment variable overriding the marker diameter
pub const MARKER_SIZE_ENV: &str = "BUGWAVE_MARKER_SIZE";

/// Environment variable overriding the popup width
pub const POPUP_WIDTH_ENV: &str = "BUGWAVE_POPUP_WIDTH";

/// Settings shared by the markers, detail popup and draft editor
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Marker diameter
    pub marker_size: f32,
    /// Detail card width
    pub popup_width: f32,
    pub popup_min_height: f32,
    pub popup_max_height: f32,
    /// Inner padding of the card and editor
    pub padding: f32,
    /// Header row height (author and timestamp)
    pub header_height: f32,
    /// Edit/delete affordance size
    pub button_size: f32,
    /// Line height used for wrapped comment text
    pub line_height: f32,
    /// Approximate glyph advance used for wrapping
    pub char_width: f32,
    /// Draft editor text area
    pub editor_width: f32,
    pub editor_height: f32,
    /// Height of the Cancel/Done button row under the editor
    pub editor_button_height: f32,

    pub marker_color: Color,
    pub marker_active_color: Color,
    pub popup_background: Color,
    pub text_color: Color,
    pub muted_text_color: Color,
    pub edit_color: Color,
    pub delete_color: Color,
    pub editor_background: Color,
    pub confirm_color: Color,
    pub cancel_color: Color,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            marker_size: 32.0,
            popup_width: 320.0,
            popup_min_height: 80.0,
            popup_max_height: 300.0,
            padding: 8.0,
            header_height: 32.0,
            button_size: 18.0,
            line_height: 16.0,
            char_width: 7.0,
            editor_width: 192.0,
            editor_height: 96.0,
            editor_button_height: 28.0,

            marker_color: Color::rgb(0.15, 0.15, 0.15),
            marker_active_color: Color::rgb(0.25, 0.25, 0.25),
            popup_background: Color::rgb(0.12, 0.16, 0.22),
            text_color: Color::rgb(1.0, 1.0, 1.0),
            muted_text_color: Color::rgb(0.82, 0.84, 0.86),
            edit_color: Color::rgb(0.92, 0.70, 0.03),
            delete_color: Color::rgb(0.94, 0.27, 0.27),
            editor_background: Color::rgb(1.0, 1.0, 1.0),
            confirm_color: Color::rgb(0.09, 0.64, 0.29),
            cancel_color: Color::rgb(0.82, 0.84, 0.86),
        }
    }
}

impl OverlayConfig {
    pub fn with_marker_size(mut self, size: f32) -> Self {
        self.marker_size = size;
        self
    }

    pub fn with_popup_width(mut self, width: f32) -> Self {
        self.popup_width = width;
        self
    }

    pub fn with_editor_size(mut self, width: f32, height: f32) -> Self {
        self.editor_width = width;
        self.editor_height = height;
        self
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Unparsable or non-positive values
    /// are skipped.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(size) = parse_dimension(MARKER_SIZE_ENV, lookup(MARKER_SIZE_ENV)) {
            self.marker_size = size;
        }
        if let Some(width) = parse_dimension(POPUP_WIDTH_ENV, lookup(POPUP_WIDTH_ENV)) {
            self.popup_width = width;
        }
        self
    }
}

fn parse_dimension(key: &str, raw: Option<String>) -> Option<f32> {
    let raw = raw?;
    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid overlay dimension");
            None
        }
    }
}
