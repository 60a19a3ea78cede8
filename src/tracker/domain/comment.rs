//! Task comments.

use super::{CommentId, TaskId, TrackerDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty comment body, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentText(String);

impl CommentText {
    /// Creates validated comment text.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyCommentText`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TrackerDomainError::EmptyCommentText);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the text as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A note left by a team member on a task. The author never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    task_id: TaskId,
    author: UserId,
    text: CommentText,
    created_at: DateTime<Utc>,
    edited_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCommentData {
    /// Persisted comment identifier.
    pub id: CommentId,
    /// Persisted task the comment belongs to.
    pub task_id: TaskId,
    /// Persisted author.
    pub author: UserId,
    /// Persisted body.
    pub text: CommentText,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last edit timestamp.
    pub edited_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Creates a new comment.
    #[must_use]
    pub fn new(task_id: TaskId, author: UserId, text: CommentText, clock: &impl Clock) -> Self {
        Self {
            id: CommentId::new(),
            task_id,
            author,
            text,
            created_at: clock.utc(),
            edited_at: None,
        }
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            author: data.author,
            text: data.text,
            created_at: data.created_at,
            edited_at: data.edited_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the task the comment belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the body.
    #[must_use]
    pub const fn text(&self) -> &CommentText {
        &self.text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the body was last edited, if ever.
    #[must_use]
    pub const fn edited_at(&self) -> Option<DateTime<Utc>> {
        self.edited_at
    }

    /// Replaces the body.
    pub fn edit(&mut self, text: CommentText, clock: &impl Clock) {
        self.text = text;
        self.edited_at = Some(clock.utc());
    }
}
