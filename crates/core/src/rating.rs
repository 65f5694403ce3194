//! Star rating and review submission payload
//!
//! Reviewers rate a submission next to annotating it. The hosting page saves
//! the rating and the comment list together.

use crate::annotation::Comment;
use serde::{Deserialize, Serialize};

/// Default number of stars
pub const DEFAULT_TOTAL_STARS: u8 = 5;

/// How a single star is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarFill {
    Full,
    Half,
    Empty,
}

/// Interactive star rating in half-star steps
#[derive(Debug, Clone, PartialEq)]
pub struct StarRating {
    value: f32,
    total_stars: u8,
    read_only: bool,
    hover: Option<u8>,
}

impl StarRating {
    /// Five empty stars, editable
    pub fn new() -> Self {
        Self { value: 0.0, total_stars: DEFAULT_TOTAL_STARS, read_only: false, hover: None }
    }

    /// Start from an existing rating, clamped and snapped to half steps
    pub fn with_value(mut self, value: f32) -> Self {
        self.value = snap(value, self.total_stars);
        self
    }

    pub fn with_total_stars(mut self, total_stars: u8) -> Self {
        self.total_stars = total_stars.max(1);
        self.value = snap(self.value, self.total_stars);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn total_stars(&self) -> u8 {
        self.total_stars
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn hovered(&self) -> Option<u8> {
        self.hover
    }

    /// Set the rating to `star` (1-based). Returns the new value if it changed.
    pub fn click(&mut self, star: u8) -> Option<f32> {
        if self.read_only || star == 0 || star > self.total_stars {
            return None;
        }
        let value = f32::from(star);
        if (self.value - value).abs() < f32::EPSILON {
            return None;
        }
        self.value = value;
        Some(value)
    }

    /// Preview `star` while the pointer is over it
    pub fn hover(&mut self, star: u8) {
        if !self.read_only && star >= 1 && star <= self.total_stars {
            self.hover = Some(star);
        }
    }

    pub fn leave(&mut self) {
        self.hover = None;
    }

    /// Fill of the star at 1-based `index`, previewing the hover if any
    pub fn fill(&self, index: u8) -> StarFill {
        let shown = self.hover.map(f32::from).unwrap_or(self.value);
        let index = f32::from(index);
        if shown >= index {
            StarFill::Full
        } else if shown >= index - 0.5 {
            StarFill::Half
        } else {
            StarFill::Empty
        }
    }

    /// Fills for every star, left to right
    pub fn fills(&self) -> Vec<StarFill> {
        (1..=self.total_stars).map(|i| self.fill(i)).collect()
    }
}

impl Default for StarRating {
    fn default() -> Self {
        Self::new()
    }
}

fn snap(value: f32, total_stars: u8) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let clamped = value.clamp(0.0, f32::from(total_stars));
    (clamped * 2.0).round() / 2.0
}

/// What the hosting page sends to its backend when a review is saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub document_id: String,
    pub comments: Vec<Comment>,
    pub rating: f32,
}

impl ReviewSubmission {
    pub fn new(document_id: impl Into<String>, comments: &[Comment], rating: &StarRating) -> Self {
        Self {
            document_id: document_id.into(),
            comments: comments.to_vec(),
            rating: rating.value(),
        }
    }
}
