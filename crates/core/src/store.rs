//! Annotation store
//!
//! Holds the comments for one document in insertion order and notifies
//! subscribers with the full list after every mutation. Nothing is persisted
//! here; a subscriber does that.

use crate::annotation::{Comment, CommentId, CommentPatch};
use std::collections::HashSet;
use std::fmt;

/// Handle returned by [`AnnotationStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Comment])>;

/// Ordered comment collection with change notification
pub struct AnnotationStore {
    comments: Vec<Comment>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl AnnotationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self { comments: Vec::new(), listeners: Vec::new(), next_subscription: 0 }
    }

    /// Seed the store with previously persisted comments
    ///
    /// Duplicate ids keep their first occurrence. Records with an invalid
    /// position or blank text are dropped.
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        let mut seen = HashSet::with_capacity(comments.len());
        let comments = comments
            .into_iter()
            .filter(|comment| {
                if !comment.is_well_formed() {
                    tracing::warn!(
                        id = %comment.id(),
                        "dropping malformed comment from initial list"
                    );
                    return false;
                }
                let fresh = seen.insert(comment.id());
                if !fresh {
                    tracing::warn!(
                        id = %comment.id(),
                        "dropping duplicate comment from initial list"
                    );
                }
                fresh
            })
            .collect();

        Self { comments, listeners: Vec::new(), next_subscription: 0 }
    }

    /// All comments in insertion order
    pub fn list(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: CommentId) -> bool {
        self.get(id).is_some()
    }

    /// Append a comment. Returns `false` if it is malformed or its id is
    /// already present.
    pub fn add(&mut self, comment: Comment) -> bool {
        if !comment.is_well_formed() {
            tracing::debug!(id = %comment.id(), "ignoring add of malformed comment");
            return false;
        }
        if self.contains(comment.id()) {
            tracing::debug!(id = %comment.id(), "ignoring add of existing comment id");
            return false;
        }
        self.comments.push(comment);
        self.notify();
        true
    }

    /// Patch a comment in place. Returns `false` for unknown ids.
    pub fn update(&mut self, id: CommentId, patch: CommentPatch) -> bool {
        let Some(comment) = self.comments.iter_mut().find(|c| c.id() == id) else {
            return false;
        };
        comment.apply(patch);
        self.notify();
        true
    }

    /// Remove a comment by id
    pub fn remove(&mut self, id: CommentId) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id() == id)?;
        let removed = self.comments.remove(index);
        self.notify();
        Some(removed)
    }

    /// Comments attributed to exactly `author`
    pub fn by_author(&self, author: &str) -> Vec<&Comment> {
        self.comments.iter().filter(|c| c.author() == Some(author)).collect()
    }

    /// Case-insensitive substring search over comment text
    ///
    /// A blank query matches nothing.
    pub fn search_text(&self, query: &str) -> Vec<&Comment> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.comments.iter().filter(|c| c.text().to_lowercase().contains(&query)).collect()
    }

    /// Comments whose id is in `ids`, in store order
    pub fn get_many(&self, ids: &[CommentId]) -> Vec<&Comment> {
        self.comments.iter().filter(|c| ids.contains(&c.id())).collect()
    }

    /// Register a change listener, called with the full list after each mutation
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[Comment]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.comments);
        }
    }
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("comments", &self.comments)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
