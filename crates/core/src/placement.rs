//! Placement controller
//!
//! Ephemeral "composing a comment" state. A draft goes through
//! `Idle -> AwaitingClick -> Drafting -> Idle`, an edit through
//! `Idle -> Editing -> Idle`. Only one of them may be open at a time.
//!
//! Operations never fail loudly. Anything not allowed from the current state
//! (or by the role) leaves both the controller and the store untouched and
//! reports [`Outcome::Ignored`].

use crate::annotation::{has_content, Comment, CommentId, CommentPatch, PixelPosition};
use crate::role::{can_author, Role};
use crate::store::AnnotationStore;

/// Why an operation was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Role may not author comments
    Unauthorized,
    /// Another draft or edit is already open
    Busy,
    /// Click arrived while not waiting for one
    NotAwaitingClick,
    /// Draft already has a position
    AlreadyPositioned,
    /// Click position is negative or not finite
    InvalidPosition,
    /// No draft or edit is open
    NoDraft,
    /// Text is empty after trimming
    EmptyText,
    /// Comment id is not in the store
    UnknownComment,
}

impl IgnoreReason {
    pub fn describe(self) -> &'static str {
        match self {
            IgnoreReason::Unauthorized => "role cannot author comments",
            IgnoreReason::Busy => "another draft or edit is in progress",
            IgnoreReason::NotAwaitingClick => "not waiting for a placement click",
            IgnoreReason::AlreadyPositioned => "draft already has a position",
            IgnoreReason::InvalidPosition => "position must be finite and non-negative",
            IgnoreReason::NoDraft => "no draft or edit is open",
            IgnoreReason::EmptyText => "comment text is empty",
            IgnoreReason::UnknownComment => "comment does not exist",
        }
    }
}

/// Result of a controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    Applied(T),
    Ignored(IgnoreReason),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Ignored(_) => None,
        }
    }

    pub fn ignored(&self) -> Option<IgnoreReason> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Ignored(reason) => Some(*reason),
        }
    }
}

/// Current composing state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlacementState {
    #[default]
    Idle,
    /// Placement mode entered, waiting for the click that positions the draft
    AwaitingClick,
    /// New comment being typed at `position`
    Drafting { position: PixelPosition, text: String },
    /// Existing comment being rewritten
    Editing { comment_id: CommentId, position: PixelPosition, text: String },
}

/// Borrowed view of an open draft or edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftView<'a> {
    pub position: PixelPosition,
    pub text: &'a str,
    /// Target comment when editing, `None` for a new comment
    pub editing: Option<CommentId>,
}

/// State machine for creating and editing comments
#[derive(Debug, Clone)]
pub struct PlacementController {
    role: Role,
    author: Option<String>,
    state: PlacementState,
}

impl PlacementController {
    pub fn new(role: Role) -> Self {
        Self { role, author: None, state: PlacementState::Idle }
    }

    /// Attribute new comments to `author`
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, PlacementState::Idle)
    }

    pub fn is_awaiting_click(&self) -> bool {
        matches!(self.state, PlacementState::AwaitingClick)
    }

    /// The open draft or edit, once it has a position
    pub fn draft(&self) -> Option<DraftView<'_>> {
        match &self.state {
            PlacementState::Drafting { position, text } => {
                Some(DraftView { position: *position, text, editing: None })
            }
            PlacementState::Editing { comment_id, position, text } => {
                Some(DraftView { position: *position, text, editing: Some(*comment_id) })
            }
            PlacementState::Idle | PlacementState::AwaitingClick => None,
        }
    }

    /// Enter placement mode
    pub fn begin_placement(&mut self) -> Outcome {
        if let Err(reason) = self.check_author().and_then(|()| self.check_idle()) {
            return ignore("begin_placement", reason);
        }
        self.state = PlacementState::AwaitingClick;
        Outcome::Applied(())
    }

    /// Record the click that positions a new draft
    pub fn capture_click(&mut self, position: PixelPosition) -> Outcome {
        match self.state {
            PlacementState::AwaitingClick => {}
            PlacementState::Drafting { .. } => {
                return ignore("capture_click", IgnoreReason::AlreadyPositioned)
            }
            _ => return ignore("capture_click", IgnoreReason::NotAwaitingClick),
        }
        if !position.is_valid() {
            return ignore("capture_click", IgnoreReason::InvalidPosition);
        }
        self.state = PlacementState::Drafting { position, text: String::new() };
        Outcome::Applied(())
    }

    /// Replace the text of the open draft or edit
    pub fn set_draft_text(&mut self, new_text: impl Into<String>) -> Outcome {
        match &mut self.state {
            PlacementState::Drafting { text, .. } | PlacementState::Editing { text, .. } => {
                *text = new_text.into();
                Outcome::Applied(())
            }
            _ => ignore("set_draft_text", IgnoreReason::NoDraft),
        }
    }

    /// Turn the open draft into a stored comment
    ///
    /// Blank text leaves the draft open.
    pub fn commit(&mut self, store: &mut AnnotationStore) -> Outcome<CommentId> {
        let PlacementState::Drafting { position, text } = &self.state else {
            return ignore("commit", IgnoreReason::NoDraft);
        };
        if !has_content(text) {
            return ignore("commit", IgnoreReason::EmptyText);
        }

        let comment = Comment::new(*position, text.clone(), self.author.clone());
        let id = comment.id();
        store.add(comment);
        self.state = PlacementState::Idle;
        tracing::debug!(%id, "comment committed");
        Outcome::Applied(id)
    }

    /// Drop any open draft or edit
    pub fn cancel(&mut self) {
        self.state = PlacementState::Idle;
    }

    /// Open an existing comment for editing
    pub fn begin_edit(&mut self, store: &AnnotationStore, comment_id: CommentId) -> Outcome {
        if let Err(reason) = self.check_author().and_then(|()| self.check_idle()) {
            return ignore("begin_edit", reason);
        }
        let Some(comment) = store.get(comment_id) else {
            return ignore("begin_edit", IgnoreReason::UnknownComment);
        };
        self.state = PlacementState::Editing {
            comment_id,
            position: comment.position(),
            text: comment.text().to_string(),
        };
        Outcome::Applied(())
    }

    /// Write the edited text back, refreshing the timestamp
    ///
    /// If the target was removed behind the controller's back the edit stays
    /// open; only `cancel` closes it.
    pub fn save_edit(&mut self, store: &mut AnnotationStore) -> Outcome {
        let PlacementState::Editing { comment_id, text, .. } = &self.state else {
            return ignore("save_edit", IgnoreReason::NoDraft);
        };
        if !has_content(text) {
            return ignore("save_edit", IgnoreReason::EmptyText);
        }
        if !store.update(*comment_id, CommentPatch::edit_text(text.clone())) {
            return ignore("save_edit", IgnoreReason::UnknownComment);
        }

        self.state = PlacementState::Idle;
        Outcome::Applied(())
    }

    /// Remove a comment. An edit open on it is discarded.
    pub fn delete(&mut self, store: &mut AnnotationStore, comment_id: CommentId) -> Outcome {
        if let Err(reason) = self.check_author() {
            return ignore("delete", reason);
        }
        if store.remove(comment_id).is_none() {
            return ignore("delete", IgnoreReason::UnknownComment);
        }
        if let PlacementState::Editing { comment_id: editing, .. } = &self.state {
            if *editing == comment_id {
                self.state = PlacementState::Idle;
            }
        }
        Outcome::Applied(())
    }

    fn check_author(&self) -> Result<(), IgnoreReason> {
        if can_author(self.role) {
            Ok(())
        } else {
            Err(IgnoreReason::Unauthorized)
        }
    }

    fn check_idle(&self) -> Result<(), IgnoreReason> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(IgnoreReason::Busy)
        }
    }
}

fn ignore<T>(operation: &'static str, reason: IgnoreReason) -> Outcome<T> {
    tracing::debug!(operation, reason = reason.describe(), "placement operation ignored");
    Outcome::Ignored(reason)
}
