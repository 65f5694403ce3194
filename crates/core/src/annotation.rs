//! Comment data model
//!
//! Position-anchored review comments laid over an externally rendered document.
//! Positions are pixel offsets from the top-left of the overlay container at the
//! moment of creation. They are never normalized to page space, so they only
//! line up with the rendering size they were captured against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a comment
///
/// Generated using UUID v4. Only uniqueness is relied upon, never ordering.
pub type CommentId = uuid::Uuid;

/// Display format for comment timestamps (`10/05/2025 14:30`).
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Pixel offset relative to the overlay container's top-left corner
///
/// - Origin (0, 0) at top-left of the container
/// - X increases to the right
/// - Y increases downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPosition {
    pub x: f32,
    pub y: f32,
}

impl PixelPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both offsets finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x >= 0.0 && self.y >= 0.0
    }
}

/// A committed review comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    position: PixelPosition,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
}

impl Comment {
    /// Create a comment with a freshly generated id, stamped now.
    pub fn new(position: PixelPosition, text: impl Into<String>, author: Option<String>) -> Self {
        Self {
            id: CommentId::new_v4(),
            position,
            text: text.into(),
            author,
            timestamp: Some(Utc::now()),
        }
    }

    /// Rebuild a comment with a known id (for loading from a backend)
    pub fn with_id(
        id: CommentId,
        position: PixelPosition,
        text: impl Into<String>,
        author: Option<String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self { id, position, text: text.into(), author, timestamp }
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn position(&self) -> PixelPosition {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Placed at a usable position and carrying non-blank text
    pub fn is_well_formed(&self) -> bool {
        self.position.is_valid() && has_content(&self.text)
    }

    /// Human-readable timestamp, if one is tracked
    pub fn formatted_timestamp(&self) -> Option<String> {
        self.timestamp.map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Apply a patch in place. Id, position and author never change.
    pub fn apply(&mut self, patch: CommentPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = Some(timestamp);
        }
    }
}

/// Partial update for a stored comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CommentPatch {
    /// Replace the text and refresh the timestamp to now
    pub fn edit_text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), timestamp: Some(Utc::now()) }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.timestamp.is_none()
    }
}

/// Text counts as present only if something other than whitespace remains.
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}
