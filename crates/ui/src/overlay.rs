//! Annotation overlay facade
//!
//! Wires the role policy, annotation store, placement controller and renderer
//! together for one document, and routes pointer input the way the portal's
//! comment layer does:
//! - in placement mode, the next click positions the draft
//! - editor buttons cancel or confirm the open draft/edit
//! - popup affordances start an edit or delete the comment
//! - a click on a marker toggles its card, a click elsewhere closes it
//!
//! The hosting page learns about changes through [`AnnotationOverlay::subscribe`]
//! and is responsible for persisting them.

use crate::config::OverlayConfig;
use crate::popup::PopupHit;
use crate::renderer::{EditorHit, OverlayFrame, OverlayRenderer};
use crate::scene::SceneGraph;
use bugwave_core::{
    AnnotationStore, Comment, CommentId, IgnoreReason, Outcome, PixelPosition,
    PlacementController, PlacementState, Role, SubscriptionId,
};
use serde::{Deserialize, Serialize};

/// The document surface the overlay sits on. Opaque to the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub url: String,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self { id: id.into(), url: url.into() }
    }
}

/// What a click ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// Positioned a new draft
    Placed,
    /// Committed a draft or saved an edit
    Confirmed,
    /// Closed the draft editor
    Cancelled,
    /// Landed inside the editor text area
    EditorFocused,
    /// Opened a comment for editing
    EditStarted(CommentId),
    /// Removed a comment
    Deleted(CommentId),
    /// Landed on a popup body
    PopupFocused(CommentId),
    /// Toggled a marker's card
    MarkerToggled(CommentId),
    /// Closed the open card by clicking elsewhere
    Dismissed,
    /// The click resolved to an operation that was ignored
    Ignored(IgnoreReason),
}

/// Comment overlay for one document and one viewer
#[derive(Debug)]
pub struct AnnotationOverlay {
    document: DocumentRef,
    store: AnnotationStore,
    placement: PlacementController,
    renderer: OverlayRenderer,
}

impl AnnotationOverlay {
    /// Create an overlay seeded with previously loaded comments
    pub fn new(document: DocumentRef, role: Role, initial: Vec<Comment>) -> Self {
        Self {
            document,
            store: AnnotationStore::with_comments(initial),
            placement: PlacementController::new(role),
            renderer: OverlayRenderer::new(OverlayConfig::default()),
        }
    }

    /// Attribute new comments to `author`
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.placement = self.placement.with_author(author);
        self
    }

    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.renderer = OverlayRenderer::new(config);
        self
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    pub fn role(&self) -> Role {
        self.placement.role()
    }

    pub fn comments(&self) -> &[Comment] {
        self.store.list()
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn placement_state(&self) -> &PlacementState {
        self.placement.state()
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    /// Register the `onCommentsChanged` callback
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[Comment]) + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn begin_placement(&mut self) -> Outcome {
        self.placement.begin_placement()
    }

    pub fn capture_click(&mut self, position: PixelPosition) -> Outcome {
        self.placement.capture_click(position)
    }

    pub fn set_draft_text(&mut self, text: impl Into<String>) -> Outcome {
        self.placement.set_draft_text(text)
    }

    pub fn commit(&mut self) -> Outcome<CommentId> {
        self.placement.commit(&mut self.store)
    }

    pub fn cancel(&mut self) {
        self.placement.cancel();
    }

    pub fn begin_edit(&mut self, comment_id: CommentId) -> Outcome {
        self.placement.begin_edit(&self.store, comment_id)
    }

    pub fn save_edit(&mut self) -> Outcome {
        self.placement.save_edit(&mut self.store)
    }

    pub fn delete(&mut self, comment_id: CommentId) -> Outcome {
        let outcome = self.placement.delete(&mut self.store, comment_id);
        if outcome.is_applied() {
            self.renderer.prune(self.store.list());
        }
        outcome
    }

    /// The editor's Done button: commit a draft or save an edit
    pub fn confirm(&mut self) -> Outcome {
        if matches!(self.placement.state(), PlacementState::Editing { .. }) {
            return self.save_edit();
        }
        match self.commit() {
            Outcome::Applied(_) => Outcome::Applied(()),
            Outcome::Ignored(reason) => Outcome::Ignored(reason),
        }
    }

    /// Track the pointer for hover cards. Returns whether the hovered marker changed.
    ///
    /// While the pointer is over the hovered comment's card the card stays open,
    /// so its affordances can be reached.
    pub fn pointer_moved(&mut self, position: PixelPosition) -> bool {
        let frame = self.frame();
        let PixelPosition { x, y } = position;

        let over_card = frame
            .popup_hit(x, y)
            .map(|(id, _)| id)
            .filter(|id| self.renderer.hovered() == Some(*id));
        let hovered = frame.marker_at(x, y).or(over_card);
        self.renderer.set_hovered(hovered)
    }

    /// Route a click on the overlay container
    pub fn clicked(&mut self, position: PixelPosition) -> ClickAction {
        if self.placement.is_awaiting_click() {
            return resolve(self.capture_click(position), ClickAction::Placed);
        }

        let frame = self.frame();
        let PixelPosition { x, y } = position;

        if let Some(hit) = frame.editor_hit(x, y) {
            return match hit {
                EditorHit::TextArea => ClickAction::EditorFocused,
                EditorHit::Cancel => {
                    self.cancel();
                    ClickAction::Cancelled
                }
                EditorHit::Confirm => resolve(self.confirm(), ClickAction::Confirmed),
            };
        }

        // Card buttons first, then markers: the open card overlaps its own
        // marker, and a second click there must still close it.
        let popup_hit = frame.popup_hit(x, y);
        match popup_hit {
            Some((id, PopupHit::Edit)) => {
                return resolve(self.begin_edit(id), ClickAction::EditStarted(id));
            }
            Some((id, PopupHit::Delete)) => {
                return resolve(self.delete(id), ClickAction::Deleted(id));
            }
            _ => {}
        }

        if let Some(id) = frame.marker_at(x, y) {
            self.renderer.toggle_active(id);
            return ClickAction::MarkerToggled(id);
        }

        if let Some((id, PopupHit::Body)) = popup_hit {
            return ClickAction::PopupFocused(id);
        }

        self.renderer.set_active(None);
        ClickAction::Dismissed
    }

    /// Snapshot for painting
    pub fn frame(&self) -> OverlayFrame {
        self.renderer.frame(
            self.store.list(),
            self.placement.role(),
            self.placement.draft(),
            self.placement.is_awaiting_click(),
        )
    }

    /// Paint nodes for the current frame
    pub fn scene(&self) -> SceneGraph {
        self.frame().scene(self.renderer.config())
    }

    /// Reveal a comment's card as if it had been clicked
    pub fn activate(&mut self, comment_id: CommentId) -> bool {
        if !self.store.contains(comment_id) {
            return false;
        }
        self.renderer.set_active(Some(comment_id));
        true
    }

    /// Hover a comment's marker without pointer coordinates
    pub fn hover(&mut self, comment_id: Option<CommentId>) -> bool {
        let comment_id = comment_id.filter(|id| self.store.contains(*id));
        self.renderer.set_hovered(comment_id)
    }
}

fn resolve(outcome: Outcome, action: ClickAction) -> ClickAction {
    match outcome {
        Outcome::Applied(()) => action,
        Outcome::Ignored(reason) => ClickAction::Ignored(reason),
    }
}
