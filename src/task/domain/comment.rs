//! Threaded comments on tasks and subtasks.

use super::{CommentId, SubTaskId, TaskDomainError, TaskId};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Trimmed, non-empty comment body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentText(String);

impl CommentText {
    /// Creates validated comment text.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyCommentText`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyCommentText);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the text as `str`.
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

/// Entity a comment is attached to.
///
/// Subtask comments carry the parent task too, so task-scoped cleanup never
/// needs to resolve subtasks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommentTarget {
    /// Comment on a task.
    Task {
        /// Commented task.
        task_id: TaskId,
    },
    /// Comment on a subtask.
    SubTask {
        /// Parent task of the subtask.
        task_id: TaskId,
        /// Commented subtask.
        sub_task_id: SubTaskId,
    },
}

impl CommentTarget {
    /// Returns the task the comment belongs to, directly or via a subtask.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        match self {
            Self::Task { task_id } | Self::SubTask { task_id, .. } => *task_id,
        }
    }

    /// Returns the subtask, for subtask comments.
    #[must_use]
    pub const fn sub_task_id(&self) -> Option<SubTaskId> {
        match self {
            Self::Task { .. } => None,
            Self::SubTask { sub_task_id, .. } => Some(*sub_task_id),
        }
    }
}

/// Comment or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    text: CommentText,
    author: UserId,
    target: CommentTarget,
    parent_id: Option<CommentId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCommentData {
    /// Comment identifier.
    pub id: CommentId,
    /// Body.
    pub text: CommentText,
    /// Author.
    pub author: UserId,
    /// Commented entity.
    pub target: CommentTarget,
    /// Parent comment for replies.
    pub parent_id: Option<CommentId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a top-level comment.
    #[must_use]
    pub fn new(
        author: UserId,
        target: CommentTarget,
        text: CommentText,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: CommentId::new(),
            text,
            author,
            target,
            parent_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Creates a reply inheriting the parent's target.
    #[must_use]
    pub fn reply_to(parent: &Self, author: UserId, text: CommentText, clock: &impl Clock) -> Self {
        let mut reply = Self::new(author, parent.target, text, clock);
        reply.parent_id = Some(parent.id);
        reply
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            text: data.text,
            author: data.author,
            target: data.target,
            parent_id: data.parent_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the body.
    #[must_use]
    pub const fn text(&self) -> &CommentText {
        &self.text
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> &UserId {
        &self.author
    }

    /// Returns the commented entity.
    #[must_use]
    pub const fn target(&self) -> CommentTarget {
        self.target
    }

    /// Returns the parent comment for replies.
    #[must_use]
    pub const fn parent_id(&self) -> Option<CommentId> {
        self.parent_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Comment with its nested replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentThread {
    /// Root of this thread.
    pub comment: Comment,
    /// Direct replies, oldest first.
    pub replies: Vec<CommentThread>,
}

impl CommentThread {
    /// Arranges a flat comment list into threads.
    ///
    /// Top-level threads are ordered newest first and replies oldest first.
    /// A comment whose parent is absent from `comments` becomes a top-level
    /// thread.
    #[must_use]
    pub fn build(comments: Vec<Comment>) -> Vec<Self> {
        let known: HashSet<CommentId> = comments.iter().map(Comment::id).collect();
        let mut roots = Vec::new();
        let mut children: HashMap<CommentId, Vec<Comment>> = HashMap::new();
        for comment in comments {
            match comment.parent_id.filter(|parent| known.contains(parent)) {
                Some(parent) => children.entry(parent).or_default().push(comment),
                None => roots.push(comment),
            }
        }

        roots.sort_by_key(|comment| Reverse(comment.created_at));
        roots
            .into_iter()
            .map(|root| Self::attach(root, &mut children))
            .collect()
    }

    fn attach(comment: Comment, children: &mut HashMap<CommentId, Vec<Comment>>) -> Self {
        let mut direct = children.remove(&comment.id).unwrap_or_default();
        direct.sort_by_key(|reply| reply.created_at);
        let replies = direct
            .into_iter()
            .map(|reply| Self::attach(reply, children))
            .collect();
        Self { comment, replies }
    }

    /// Returns the number of comments in the thread, root included.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        1 + self.replies.iter().map(Self::comment_count).sum::<usize>()
    }
}
