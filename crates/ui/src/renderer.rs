//! Overlay renderer
//!
//! Maps each comment's stored (x, y) to an absolutely positioned marker and
//! lays out the detail popup and draft editor. Markers are placed purely by
//! their stored pixel offsets: if the document surface is resized or rezoomed
//! the markers go stale. There is no re-anchoring.

use crate::config::OverlayConfig;
use crate::popup::{CommentPopup, PopupHit};
use crate::scene::{Primitive, Rect, SceneGraph, SceneNode};
use bugwave_core::{can_author, Comment, CommentId, DraftView, PixelPosition, Role};
use serde::Serialize;

/// Width of each editor button
const EDITOR_BUTTON_WIDTH: f32 = 72.0;

/// Gap between the editor text area and its buttons
const EDITOR_BUTTON_GAP: f32 = 4.0;

/// One comment badge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub comment_id: CommentId,
    pub bounds: Rect,
    /// Hovered or clicked open
    pub expanded: bool,
}

/// Whether the editor composes a new comment or rewrites one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Create,
    Edit,
}

/// Part of the draft editor under a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorHit {
    TextArea,
    Cancel,
    Confirm,
}

/// Text box plus Cancel/Done buttons at the draft position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftEditor {
    pub mode: EditorMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<CommentId>,
    pub position: PixelPosition,
    pub text: String,
    pub text_area: Rect,
    pub cancel_button: Rect,
    pub confirm_button: Rect,
}

impl DraftEditor {
    fn layout(draft: DraftView<'_>, config: &OverlayConfig) -> Self {
        let PixelPosition { x, y } = draft.position;
        let text_area = Rect::new(x, y, config.editor_width, config.editor_height);
        let button_y = text_area.bottom() + EDITOR_BUTTON_GAP;
        let confirm_button = Rect::new(
            text_area.right() - EDITOR_BUTTON_WIDTH,
            button_y,
            EDITOR_BUTTON_WIDTH,
            config.editor_button_height,
        );
        let cancel_button = Rect::new(
            confirm_button.x - EDITOR_BUTTON_GAP - EDITOR_BUTTON_WIDTH,
            button_y,
            EDITOR_BUTTON_WIDTH,
            config.editor_button_height,
        );

        Self {
            mode: if draft.editing.is_some() { EditorMode::Edit } else { EditorMode::Create },
            comment_id: draft.editing,
            position: draft.position,
            text: draft.text.to_string(),
            text_area,
            cancel_button,
            confirm_button,
        }
    }

    pub fn hit_test(&self, x: f32, y: f32) -> Option<EditorHit> {
        if self.confirm_button.contains(x, y) {
            Some(EditorHit::Confirm)
        } else if self.cancel_button.contains(x, y) {
            Some(EditorHit::Cancel)
        } else if self.text_area.contains(x, y) {
            Some(EditorHit::TextArea)
        } else {
            None
        }
    }

    fn scene_node(&self, config: &OverlayConfig) -> SceneNode {
        let mut node = SceneNode::new();
        node.add_primitive(Primitive::Rectangle {
            rect: self.text_area,
            color: config.editor_background,
        });
        node.add_primitive(Primitive::Text {
            origin: [self.text_area.x + config.padding, self.text_area.y + config.padding],
            content: self.text.clone(),
            size: config.line_height,
            color: config.marker_color,
        });
        node.add_primitive(Primitive::Rectangle {
            rect: self.cancel_button,
            color: config.cancel_color,
        });
        node.add_primitive(Primitive::Rectangle {
            rect: self.confirm_button,
            color: config.confirm_color,
        });
        node
    }
}

/// Everything the overlay shows for one state snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayFrame {
    pub markers: Vec<Marker>,
    pub popup: Option<CommentPopup>,
    pub editor: Option<DraftEditor>,
    /// Placement mode is waiting for the positioning click
    pub awaiting_click: bool,
}

impl OverlayFrame {
    /// Topmost marker under the point (later comments paint on top)
    pub fn marker_at(&self, x: f32, y: f32) -> Option<CommentId> {
        self.markers.iter().rev().find(|m| m.bounds.contains(x, y)).map(|m| m.comment_id)
    }

    pub fn popup_hit(&self, x: f32, y: f32) -> Option<(CommentId, PopupHit)> {
        let popup = self.popup.as_ref()?;
        popup.hit_test(x, y).map(|hit| (popup.comment_id(), hit))
    }

    pub fn editor_hit(&self, x: f32, y: f32) -> Option<EditorHit> {
        self.editor.as_ref()?.hit_test(x, y)
    }

    /// Build paint nodes: markers, then popup, then editor on top
    pub fn scene(&self, config: &OverlayConfig) -> SceneGraph {
        let mut graph = SceneGraph::new();
        let root = graph.root_mut();

        for marker in &self.markers {
            let mut node = SceneNode::new();
            let radius = marker.bounds.width / 2.0;
            node.add_primitive(Primitive::Circle {
                center: [marker.bounds.x + radius, marker.bounds.y + radius],
                radius,
                color: if marker.expanded {
                    config.marker_active_color
                } else {
                    config.marker_color
                },
            });
            root.add_child(node);
        }

        if let Some(popup) = &self.popup {
            root.add_child(popup.scene_node(config));
        }
        if let Some(editor) = &self.editor {
            root.add_child(editor.scene_node(config));
        }

        graph
    }
}

/// Pointer-driven view state over the comment list
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    config: OverlayConfig,
    hovered: Option<CommentId>,
    active: Option<CommentId>,
}

impl OverlayRenderer {
    pub fn new(config: OverlayConfig) -> Self {
        Self { config, hovered: None, active: None }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn hovered(&self) -> Option<CommentId> {
        self.hovered
    }

    pub fn active(&self) -> Option<CommentId> {
        self.active
    }

    pub fn set_hovered(&mut self, id: Option<CommentId>) -> bool {
        let changed = self.hovered != id;
        self.hovered = id;
        changed
    }

    /// Click on a marker: open it, or close it if it was already open
    pub fn toggle_active(&mut self, id: CommentId) {
        self.active = if self.active == Some(id) { None } else { Some(id) };
    }

    pub fn set_active(&mut self, id: Option<CommentId>) {
        self.active = id;
    }

    /// Forget hover/active ids that no longer exist
    pub fn prune(&mut self, comments: &[Comment]) {
        let exists = |id: &CommentId| comments.iter().any(|c| c.id() == *id);
        self.hovered = self.hovered.filter(exists);
        self.active = self.active.filter(exists);
    }

    pub fn marker_bounds(&self, comment: &Comment) -> Rect {
        let PixelPosition { x, y } = comment.position();
        Rect::new(x, y, self.config.marker_size, self.config.marker_size)
    }

    /// Lay out markers, popup and editor.
    ///
    /// The active (clicked) comment's card wins over the hovered one. Edit and
    /// delete affordances appear only for authoring roles.
    pub fn frame(
        &self,
        comments: &[Comment],
        role: Role,
        draft: Option<DraftView<'_>>,
        awaiting_click: bool,
    ) -> OverlayFrame {
        let expanded = |id: CommentId| self.active == Some(id) || self.hovered == Some(id);

        let markers = comments
            .iter()
            .map(|comment| Marker {
                comment_id: comment.id(),
                bounds: self.marker_bounds(comment),
                expanded: expanded(comment.id()),
            })
            .collect();

        let popup = self
            .active
            .or(self.hovered)
            .and_then(|id| comments.iter().find(|c| c.id() == id))
            .map(|comment| {
                CommentPopup::layout(
                    comment,
                    self.marker_bounds(comment),
                    can_author(role),
                    &self.config,
                )
            });

        let editor = draft.map(|draft| DraftEditor::layout(draft, &self.config));

        OverlayFrame { markers, popup, editor, awaiting_click }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comments() -> Vec<Comment> {
        vec![
            Comment::new(
                PixelPosition::new(550.0, 200.0),
                "Mais referências",
                Some("Carlos".into()),
            ),
            Comment::new(
                PixelPosition::new(550.0, 350.0),
                "Excelente abordagem",
                Some("Ana".into()),
            ),
        ]
    }

    #[test]
    fn test_markers_follow_stored_positions() {
        let renderer = OverlayRenderer::default();
        let comments = comments();
        let frame = renderer.frame(&comments, Role::ViewerOnly, None, false);

        assert_eq!(frame.markers.len(), 2);
        assert_eq!(frame.markers[0].bounds, Rect::new(550.0, 200.0, 32.0, 32.0));
        assert_eq!(frame.markers[1].bounds.y, 350.0);
        assert!(frame.markers.iter().all(|m| !m.expanded));
        assert!(frame.popup.is_none());
        assert!(frame.editor.is_none());
    }

    #[test]
    fn test_hover_shows_popup_without_actions_for_viewers() {
        let mut renderer = OverlayRenderer::default();
        let comments = comments();
        renderer.set_hovered(Some(comments[1].id()));

        let frame = renderer.frame(&comments, Role::ViewerOnly, None, false);
        let popup = frame.popup.as_ref().unwrap();
        assert_eq!(popup.comment_id(), comments[1].id());
        assert!(!popup.has_actions());
        assert!(frame.markers[1].expanded);

        let frame = renderer.frame(&comments, Role::AuthorCapable, None, false);
        assert!(frame.popup.unwrap().has_actions());
    }

    #[test]
    fn test_active_wins_over_hover() {
        let mut renderer = OverlayRenderer::default();
        let comments = comments();
        renderer.set_hovered(Some(comments[0].id()));
        renderer.toggle_active(comments[1].id());

        let frame = renderer.frame(&comments, Role::ViewerOnly, None, false);
        assert_eq!(frame.popup.map(|p| p.comment_id()), Some(comments[1].id()));

        renderer.toggle_active(comments[1].id());
        assert_eq!(renderer.active(), None);
    }

    #[test]
    fn test_marker_hit_prefers_topmost() {
        let renderer = OverlayRenderer::default();
        let a = Comment::new(PixelPosition::new(100.0, 100.0), "a", None);
        let b = Comment::new(PixelPosition::new(110.0, 110.0), "b", None);
        let (b_id, a_id) = (b.id(), a.id());
        let comments = vec![a, b];
        let frame = renderer.frame(&comments, Role::ViewerOnly, None, false);

        assert_eq!(frame.marker_at(120.0, 120.0), Some(b_id));
        assert_eq!(frame.marker_at(101.0, 101.0), Some(a_id));
        assert_eq!(frame.marker_at(10.0, 10.0), None);
    }

    #[test]
    fn test_editor_at_draft_position() {
        let renderer = OverlayRenderer::default();
        let draft =
            DraftView { position: PixelPosition::new(120.0, 340.0), text: "Needs", editing: None };
        let frame = renderer.frame(&[], Role::AuthorCapable, Some(draft), false);

        let editor = frame.editor.as_ref().unwrap();
        assert_eq!(editor.mode, EditorMode::Create);
        assert_eq!(editor.text_area.x, 120.0);
        assert_eq!(editor.text_area.y, 340.0);

        let confirm = editor.confirm_button;
        assert_eq!(frame.editor_hit(confirm.x + 1.0, confirm.y + 1.0), Some(EditorHit::Confirm));
        let cancel = editor.cancel_button;
        assert_eq!(frame.editor_hit(cancel.x + 1.0, cancel.y + 1.0), Some(EditorHit::Cancel));
        assert_eq!(frame.editor_hit(125.0, 345.0), Some(EditorHit::TextArea));
        assert_eq!(frame.editor_hit(0.0, 0.0), None);
    }

    #[test]
    fn test_prune_forgets_deleted_comments() {
        let mut renderer = OverlayRenderer::default();
        let comments = comments();
        renderer.set_hovered(Some(comments[0].id()));
        renderer.set_active(Some(comments[0].id()));

        renderer.prune(&comments[1..]);
        assert_eq!(renderer.hovered(), None);
        assert_eq!(renderer.active(), None);
    }

    #[test]
    fn test_scene_paint_order() {
        let mut renderer = OverlayRenderer::default();
        let comments = comments();
        renderer.set_hovered(Some(comments[0].id()));
        let draft = DraftView { position: PixelPosition::new(5.0, 5.0), text: "", editing: None };
        let frame = renderer.frame(&comments, Role::AuthorCapable, Some(draft), false);

        let scene = frame.scene(renderer.config());
        let children = scene.root().children();
        assert_eq!(children.len(), 4);
        assert!(matches!(children[0].primitives()[0], Primitive::Circle { .. }));
        assert!(!scene.collect_render_commands().is_empty());
    }

    #[test]
    fn test_frame_serializes() {
        let renderer = OverlayRenderer::default();
        let comments = comments();
        let frame = renderer.frame(&comments, Role::ViewerOnly, None, true);
        let json = serde_json::to_value(&frame).unwrap();

        assert_eq!(json["awaiting_click"], true);
        assert_eq!(json["markers"][0]["bounds"]["x"], 550.0);
        assert!(json["popup"].is_null());
    }
}
