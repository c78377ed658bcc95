//! Task comments recorded by the propose/reject protocol.

use super::{CommentId, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentAuthor {
    /// A human user wrote the comment (rejection rationale).
    Human,
    /// The AI agent wrote the comment (proposal rationale).
    AiAgent,
}

/// Free-text comment attached to a task.
///
/// Comments are created only as a side effect of the propose and reject
/// procedures, never directly by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    id: CommentId,
    task_id: TaskId,
    body: String,
    author: CommentAuthor,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCommentData {
    /// Persisted comment identifier.
    pub id: CommentId,
    /// Persisted owning task.
    pub task_id: TaskId,
    /// Persisted comment body.
    pub body: String,
    /// Persisted authorship.
    pub author: CommentAuthor,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskComment {
    /// Creates a new comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyCommentBody`] when the body is empty
    /// after trimming.
    pub fn create(
        task_id: TaskId,
        body: impl Into<String>,
        author: CommentAuthor,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        let trimmed = body.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyCommentBody);
        }
        Ok(Self {
            id: CommentId::new(),
            task_id,
            body: trimmed,
            author,
            created_at: timestamp,
        })
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            body: data.body,
            author: data.author,
            created_at: data.created_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the comment body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the authorship flag.
    #[must_use]
    pub const fn author(&self) -> CommentAuthor {
        self.author
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
