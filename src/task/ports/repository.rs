//! Repository ports for tasks, subtasks, comments and tags.

use super::TaskQuery;
use crate::task::domain::{
    Comment, CommentId, CommentTarget, SubTask, SubTaskId, Tag, TagName, Task, TaskId,
};
use crate::team::domain::TeamId;
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists, [`TaskRepositoryError::UserNotFound`] when the creator or an
    /// assignee is not a stored user, and [`TaskRepositoryError::TeamNotFound`]
    /// for an unknown team.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task, including its assignee and tag
    /// sets.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::UserNotFound`] for an unknown assignee.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task together with its subtasks and every comment on either.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks matching `query`, ordered and truncated as it asks.
    async fn find_many(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Moves every overdue task whose status is promotable to `BACKLOG` in
    /// one bulk operation, stamping `updated_at` with `now`.
    ///
    /// Returns the identifiers of the promoted tasks.
    async fn promote_overdue_to_backlog(
        &self,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<TaskId>>;
}

/// Subtask persistence contract.
#[async_trait]
pub trait SubTaskRepository: Send + Sync {
    /// Stores a new subtask.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the parent task does not
    /// exist and [`TaskRepositoryError::UserNotFound`] for an unknown
    /// assignee; nothing is written in either case.
    async fn store_sub_task(&self, sub_task: &SubTask) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing subtask.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::SubTaskNotFound`] when absent and
    /// [`TaskRepositoryError::UserNotFound`] for an unknown assignee.
    async fn update_sub_task(&self, sub_task: &SubTask) -> TaskRepositoryResult<()>;

    /// Deletes a subtask and its comments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::SubTaskNotFound`] when absent.
    async fn delete_sub_task(&self, id: SubTaskId) -> TaskRepositoryResult<()>;

    /// Finds a subtask by identifier.
    async fn find_sub_task(&self, id: SubTaskId) -> TaskRepositoryResult<Option<SubTask>>;

    /// Returns the subtasks of a task, oldest first.
    async fn find_sub_tasks(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<SubTask>>;
}

/// Comment persistence contract.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Stores a new comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateComment`] when the identifier
    /// already exists and [`TaskRepositoryError::UserNotFound`] when the
    /// author is not a stored user.
    async fn store_comment(&self, comment: &Comment) -> TaskRepositoryResult<()>;

    /// Deletes a comment and, transitively, every reply beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::CommentNotFound`] when absent.
    async fn delete_comment(&self, id: CommentId) -> TaskRepositoryResult<()>;

    /// Finds a comment by identifier.
    async fn find_comment(&self, id: CommentId) -> TaskRepositoryResult<Option<Comment>>;

    /// Returns every comment and reply attached exactly to `target`.
    async fn find_comments(&self, target: CommentTarget) -> TaskRepositoryResult<Vec<Comment>>;
}

/// Tag persistence contract.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Inserts `tag` unless a tag with the same name exists.
    ///
    /// Returns the stored tag, which is the existing one on a name clash.
    async fn upsert_tag(&self, tag: &Tag) -> TaskRepositoryResult<Tag>;

    /// Finds a tag by exact name.
    async fn find_tag_by_name(&self, name: &TagName) -> TaskRepositoryResult<Option<Tag>>;

    /// Returns all tags ordered by name.
    async fn list_tags(&self) -> TaskRepositoryResult<Vec<Tag>>;
}

/// Every port the task services need, implemented by one store.
pub trait TaskStore: TaskRepository + SubTaskRepository + CommentRepository + TagRepository {}

impl<T> TaskStore for T where T: TaskRepository + SubTaskRepository + CommentRepository + TagRepository
{}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A subtask with the same identifier already exists.
    #[error("duplicate sub-task identifier: {0}")]
    DuplicateSubTask(SubTaskId),

    /// A comment with the same identifier already exists.
    #[error("duplicate comment identifier: {0}")]
    DuplicateComment(CommentId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The subtask was not found.
    #[error("sub-task not found: {0}")]
    SubTaskNotFound(SubTaskId),

    /// The comment was not found.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// A creator, assignee or author does not name a stored user.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The task's team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns whether the error reports a missing entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::SubTaskNotFound(_)
                | Self::CommentNotFound(_)
                | Self::UserNotFound(_)
                | Self::TeamNotFound(_)
        )
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
