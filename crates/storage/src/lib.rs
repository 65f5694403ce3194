//! Comment persistence
//!
//! Stores each document's comment list as a versioned JSON file under a data
//! root. The overlay never calls this directly: the hosting side subscribes a
//! [`persist_on_change`] listener to the store, and reseeds the store from
//! [`CommentStorage::load_comments`] on load.

mod repository;

pub use repository::{CommentRepository, NewComment};

use bugwave_core::Comment;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const COMMENTS_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("invalid document id: {0:?}")]
    InvalidDocumentId(String),
    #[error("invalid comment: {0}")]
    InvalidComment(&'static str),
    #[error("unsupported comment file version {0}")]
    UnsupportedVersion(u32),
    #[error("comment file belongs to document {found:?}, not {expected:?}")]
    DocumentMismatch { expected: String, found: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct CommentStorage {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommentsEnvelope {
    version: u32,
    document_id: String,
    comments: Vec<Comment>,
}

impl CommentStorage {
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("dev", "BugWave", "BugWave")
            .ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Comments saved for `document_id`, or none if nothing was saved yet
    pub fn load_comments(&self, document_id: &str) -> Result<Vec<Comment>, StorageError> {
        let path = self.comments_path(document_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }

        let bytes = fs::read(&path)?;
        let envelope: CommentsEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.version > COMMENTS_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion(envelope.version));
        }
        if envelope.document_id != document_id {
            return Err(StorageError::DocumentMismatch {
                expected: document_id.to_string(),
                found: envelope.document_id,
            });
        }

        Ok(envelope.comments)
    }

    /// Replace the saved list for `document_id`
    pub fn save_comments(
        &self,
        document_id: &str,
        comments: &[Comment],
    ) -> Result<(), StorageError> {
        let path = self.comments_path(document_id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let envelope = CommentsEnvelope {
            version: COMMENTS_SCHEMA_VERSION,
            document_id: document_id.to_string(),
            comments: comments.to_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;

        // Write through a temporary file so readers never see a partial list
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::info!(document_id, count = comments.len(), "comments saved");
        Ok(())
    }

    /// File holding the comments of `document_id`
    ///
    /// Bytes outside `[A-Za-z0-9_-]` are written as `%XX`, so distinct ids
    /// never share a file.
    pub fn comments_path(&self, document_id: &str) -> Result<PathBuf, StorageError> {
        if document_id.trim().is_empty() {
            return Err(StorageError::InvalidDocumentId(document_id.to_string()));
        }

        let mut stem = String::with_capacity(document_id.len());
        for byte in document_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                stem.push(char::from(byte));
            } else {
                let _ = write!(stem, "%{byte:02X}");
            }
        }

        Ok(self.root.join("comments").join(format!("{stem}.json")))
    }
}

/// Store listener that saves every change of `document_id`
///
/// Save failures are logged and swallowed; the in-memory list stays
/// authoritative until the next successful save.
pub fn persist_on_change(
    storage: CommentStorage,
    document_id: impl Into<String>,
) -> impl FnMut(&[Comment]) + 'static {
    let document_id = document_id.into();
    move |comments: &[Comment]| {
        if let Err(error) = storage.save_comments(&document_id, comments) {
            tracing::warn!(document_id = %document_id, %error, "failed to persist comments");
        }
    }
}
