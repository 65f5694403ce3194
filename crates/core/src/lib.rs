//! BugWave Core Library
//!
//! Comment model, role policy, annotation store and placement state machine
//! for the review overlay drawn on top of a submitted article.

pub mod annotation;
pub mod placement;
pub mod rating;
pub mod role;
pub mod store;

pub use annotation::{has_content, Comment, CommentId, CommentPatch, PixelPosition};
pub use placement::{DraftView, IgnoreReason, Outcome, PlacementController, PlacementState};
pub use rating::{ReviewSubmission, StarFill, StarRating};
pub use role::{can_author, Role};
pub use store::{AnnotationStore, SubscriptionId};
