//! Comment detail popup
//!
//! The card shown over a marker on hover or click. Features include:
//! - Author and timestamp header
//! - Wrapped comment text
//! - Edit and delete affordances for authoring roles
//!
//! The card is anchored to its marker's bottom-left corner and grows upward,
//! like the portal's speech-bubble cards.

use crate::config::OverlayConfig;
use crate::scene::{Primitive, Rect, SceneNode};
use bugwave_core::{Comment, CommentId};
use serde::Serialize;

/// Placeholder shown when a comment has no author
const ANONYMOUS: &str = "Anonymous";

/// Part of the popup under a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupHit {
    Edit,
    Delete,
    Body,
}

/// Laid-out detail card for one comment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentPopup {
    comment_id: CommentId,
    author: String,
    timestamp: Option<String>,
    lines: Vec<String>,
    bounds: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    edit_button: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delete_button: Option<Rect>,
}

impl CommentPopup {
    /// Lay out the card for `comment` above `marker`.
    ///
    /// `show_actions` adds the edit/delete affordances.
    pub fn layout(
        comment: &Comment,
        marker: Rect,
        show_actions: bool,
        config: &OverlayConfig,
    ) -> Self {
        let lines = wrap_text(comment.text(), config.popup_width - config.padding * 2.0, config);
        let height = calculate_height(lines.len(), config);

        let x = marker.x;
        let y = (marker.bottom() - height).max(0.0);
        let bounds = Rect::new(x, y, config.popup_width, height);

        let (edit_button, delete_button) = if show_actions {
            let button_y = y + (config.header_height - config.button_size) / 2.0;
            let delete_x = bounds.right() - config.padding - config.button_size;
            let edit_x = delete_x - config.padding - config.button_size;
            (
                Some(Rect::new(edit_x, button_y, config.button_size, config.button_size)),
                Some(Rect::new(delete_x, button_y, config.button_size, config.button_size)),
            )
        } else {
            (None, None)
        };

        Self {
            comment_id: comment.id(),
            author: comment.author().unwrap_or(ANONYMOUS).to_string(),
            timestamp: comment.formatted_timestamp(),
            lines,
            bounds,
            edit_button,
            delete_button,
        }
    }

    pub fn comment_id(&self) -> CommentId {
        self.comment_id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn has_actions(&self) -> bool {
        self.edit_button.is_some()
    }

    /// Which part of the card, if any, contains the point
    pub fn hit_test(&self, x: f32, y: f32) -> Option<PopupHit> {
        if self.edit_button.is_some_and(|r| r.contains(x, y)) {
            return Some(PopupHit::Edit);
        }
        if self.delete_button.is_some_and(|r| r.contains(x, y)) {
            return Some(PopupHit::Delete);
        }
        self.bounds.contains(x, y).then_some(PopupHit::Body)
    }

    /// Paint primitives for the card
    pub fn scene_node(&self, config: &OverlayConfig) -> SceneNode {
        let mut node = SceneNode::new();
        let Rect { x, y, .. } = self.bounds;

        node.add_primitive(Primitive::Rectangle {
            rect: self.bounds,
            color: config.popup_background,
        });

        // Header: author, then timestamp
        let text_y = y + (config.header_height - config.line_height) / 2.0;
        node.add_primitive(Primitive::Text {
            origin: [x + config.padding, text_y],
            content: self.author.clone(),
            size: config.line_height,
            color: config.text_color,
        });
        if let Some(timestamp) = &self.timestamp {
            let offset = (self.author.chars().count() as f32 + 1.0) * config.char_width;
            node.add_primitive(Primitive::Text {
                origin: [x + config.padding + offset, text_y],
                content: timestamp.clone(),
                size: config.line_height * 0.85,
                color: config.muted_text_color,
            });
        }

        if let Some(rect) = self.edit_button {
            node.add_primitive(Primitive::Rectangle { rect, color: config.edit_color });
        }
        if let Some(rect) = self.delete_button {
            node.add_primitive(Primitive::Rectangle { rect, color: config.delete_color });
        }

        let mut line_y = y + config.header_height + config.padding;
        for line in &self.lines {
            node.add_primitive(Primitive::Text {
                origin: [x + config.padding, line_y],
                content: line.clone(),
                size: config.line_height,
                color: config.text_color,
            });
            line_y += config.line_height;
        }

        node
    }
}

fn calculate_height(line_count: usize, config: &OverlayConfig) -> f32 {
    let height = config.header_height
        + config.padding * 2.0
        + line_count.max(1) as f32 * config.line_height;
    height.clamp(config.popup_min_height, config.popup_max_height)
}

/// Greedy word wrap by approximate glyph width, truncated to fit the card
pub(crate) fn wrap_text(text: &str, max_width: f32, config: &OverlayConfig) -> Vec<String> {
    let chars_per_line = (max_width / config.char_width) as usize;
    if chars_per_line == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            if current.is_empty() {
                current = word.to_string();
            } else if current_len + 1 + word_len <= chars_per_line {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    let max_lines = ((config.popup_max_height - config.header_height - config.padding * 2.0)
        / config.line_height) as usize;
    if max_lines > 0 && lines.len() > max_lines {
        lines.truncate(max_lines - 1);
        lines.push("...".to_string());
    }

    lines
}
