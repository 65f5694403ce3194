//! BugWave UI Library
//!
//! Overlay renderer for positional review comments: markers, detail cards and
//! the draft editor, laid out as a retained scene graph over an external
//! document viewer.

pub mod config;
pub mod overlay;
pub mod popup;
pub mod renderer;
pub mod scene;

pub use config::OverlayConfig;
pub use overlay::{AnnotationOverlay, ClickAction, DocumentRef};
pub use popup::{CommentPopup, PopupHit};
pub use renderer::{DraftEditor, EditorHit, EditorMode, Marker, OverlayFrame, OverlayRenderer};
pub use scene::{Color, Primitive, Rect, SceneGraph, SceneNode};
