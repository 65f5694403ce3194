//! File-backed comment service
//!
//! Every call reloads the document's list, so two repositories over the same
//! root observe each other's writes.

use crate::{CommentStorage, StorageError};
use bugwave_core::{
    has_content, AnnotationStore, Comment, CommentId, CommentPatch, PixelPosition,
};

/// Input for [`CommentRepository::create`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub position: PixelPosition,
    pub text: String,
    pub author: Option<String>,
}

impl NewComment {
    pub fn new(position: PixelPosition, text: impl Into<String>) -> Self {
        Self { position, text: text.into(), author: None }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct CommentRepository {
    storage: CommentStorage,
    document_id: String,
}

impl CommentRepository {
    pub fn new(storage: CommentStorage, document_id: impl Into<String>) -> Self {
        Self { storage, document_id: document_id.into() }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Every well-formed comment of the document, in saved order
    pub fn all(&self) -> Result<Vec<Comment>, StorageError> {
        Ok(self.load_store()?.list().to_vec())
    }

    pub fn get(&self, id: CommentId) -> Result<Option<Comment>, StorageError> {
        Ok(self.all()?.into_iter().find(|c| c.id() == id))
    }

    pub fn create(&self, draft: NewComment) -> Result<Comment, StorageError> {
        if !draft.position.is_valid() {
            return Err(StorageError::InvalidComment("position must be finite and non-negative"));
        }
        if !has_content(&draft.text) {
            return Err(StorageError::InvalidComment("text must not be blank"));
        }

        let comment = Comment::new(draft.position, draft.text, draft.author);
        let mut comments = self.all()?;
        comments.push(comment.clone());
        self.storage.save_comments(&self.document_id, &comments)?;
        Ok(comment)
    }

    /// Apply `patch` and return the updated comment, or `None` for an unknown id
    pub fn update(
        &self,
        id: CommentId,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, StorageError> {
        if patch.text.as_deref().is_some_and(|text| !has_content(text)) {
            return Err(StorageError::InvalidComment("text must not be blank"));
        }

        let mut store = self.load_store()?;
        if !store.update(id, patch) {
            return Ok(None);
        }
        self.storage.save_comments(&self.document_id, store.list())?;
        Ok(store.get(id).cloned())
    }

    pub fn delete(&self, id: CommentId) -> Result<bool, StorageError> {
        let mut store = self.load_store()?;
        if store.remove(id).is_none() {
            return Ok(false);
        }
        self.storage.save_comments(&self.document_id, store.list())?;
        Ok(true)
    }

    pub fn by_author(&self, author: &str) -> Result<Vec<Comment>, StorageError> {
        Ok(self.load_store()?.by_author(author).into_iter().cloned().collect())
    }

    pub fn search_text(&self, query: &str) -> Result<Vec<Comment>, StorageError> {
        Ok(self.load_store()?.search_text(query).into_iter().cloned().collect())
    }

    pub fn get_many(&self, ids: &[CommentId]) -> Result<Vec<Comment>, StorageError> {
        Ok(self.load_store()?.get_many(ids).into_iter().cloned().collect())
    }

    fn load_store(&self) -> Result<AnnotationStore, StorageError> {
        Ok(AnnotationStore::with_comments(self.storage.load_comments(&self.document_id)?))
    }
}
