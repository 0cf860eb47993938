//! Threaded comments on tasks and subtasks.

use super::access::{accessible_sub_task, logged, visible_task};
use super::{TaskLifecycleError, TaskLifecycleResult};
use crate::task::{
    domain::{Comment, CommentId, CommentTarget, CommentText, CommentThread, SubTaskId, TaskId},
    ports::{TaskRepositoryError, TaskStore},
};
use crate::user::domain::UserId;
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Comment orchestration service.
///
/// Anyone who can see a task or subtask may comment on it; only authors may
/// delete their comments.
#[derive(Clone)]
pub struct CommentService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CommentService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new comment service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Adds a top-level comment to a task.
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::domain::TaskDomainError::EmptyCommentText`]
    /// before touching the store, or an authorisation or repository error.
    pub async fn comment_on_task(
        &self,
        actor: &UserId,
        task_id: TaskId,
        text: impl Into<String>,
    ) -> TaskLifecycleResult<Comment> {
        let text = CommentText::new(text)?;
        let target = CommentTarget::Task { task_id };
        self.authorize(actor, target).await?;
        self.store(Comment::new(actor.clone(), target, text, &*self.clock))
            .await
    }

    /// Adds a top-level comment to a subtask.
    ///
    /// # Errors
    ///
    /// Returns an empty-text validation error, an authorisation error or a
    /// repository error.
    pub async fn comment_on_sub_task(
        &self,
        actor: &UserId,
        sub_task_id: SubTaskId,
        text: impl Into<String>,
    ) -> TaskLifecycleResult<Comment> {
        let text = CommentText::new(text)?;
        let (task, _) = accessible_sub_task(&*self.repository, actor, sub_task_id).await?;
        let target = CommentTarget::SubTask {
            task_id: task.id(),
            sub_task_id,
        };
        self.store(Comment::new(actor.clone(), target, text, &*self.clock))
            .await
    }

    /// Replies to an existing comment, inheriting its target.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::CommentNotFound`] for an unknown parent,
    /// an empty-text validation error, an authorisation error or a repository
    /// error.
    pub async fn reply_to_comment(
        &self,
        actor: &UserId,
        parent_id: CommentId,
        text: impl Into<String>,
    ) -> TaskLifecycleResult<Comment> {
        let text = CommentText::new(text)?;
        let parent = self.load(parent_id).await?;
        self.authorize(actor, parent.target()).await?;
        self.store(Comment::reply_to(&parent, actor.clone(), text, &*self.clock))
            .await
    }

    /// Returns the task-level comment threads of a task.
    ///
    /// # Errors
    ///
    /// Returns an authorisation or repository error.
    pub async fn comments_on_task(
        &self,
        actor: &UserId,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Vec<CommentThread>> {
        let target = CommentTarget::Task { task_id };
        self.authorize(actor, target).await?;
        self.threads(target).await
    }

    /// Returns the comment threads of a subtask.
    ///
    /// # Errors
    ///
    /// Returns an authorisation or repository error.
    pub async fn comments_on_sub_task(
        &self,
        actor: &UserId,
        sub_task_id: SubTaskId,
    ) -> TaskLifecycleResult<Vec<CommentThread>> {
        let (task, _) = accessible_sub_task(&*self.repository, actor, sub_task_id).await?;
        self.threads(CommentTarget::SubTask {
            task_id: task.id(),
            sub_task_id,
        })
        .await
    }

    /// Deletes a comment and every reply beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotCommentAuthor`] unless `actor` wrote
    /// the comment, or a repository error.
    pub async fn delete_comment(&self, actor: &UserId, id: CommentId) -> TaskLifecycleResult<()> {
        let comment = self.load(id).await?;
        if comment.author() != actor {
            return Err(TaskLifecycleError::NotCommentAuthor {
                actor: actor.clone(),
                comment_id: id,
            });
        }
        logged(self.repository.delete_comment(id).await, "delete_comment")?;
        info!(comment_id = %id, actor = %actor, "deleted comment");
        Ok(())
    }

    async fn authorize(&self, actor: &UserId, target: CommentTarget) -> TaskLifecycleResult<()> {
        match target {
            CommentTarget::Task { task_id } => {
                visible_task(&*self.repository, actor, task_id).await?;
            }
            CommentTarget::SubTask { sub_task_id, .. } => {
                accessible_sub_task(&*self.repository, actor, sub_task_id).await?;
            }
        }
        Ok(())
    }

    async fn load(&self, id: CommentId) -> TaskLifecycleResult<Comment> {
        logged(self.repository.find_comment(id).await, "find_comment")?
            .ok_or(TaskLifecycleError::Repository(
                TaskRepositoryError::CommentNotFound(id),
            ))
    }

    async fn store(&self, comment: Comment) -> TaskLifecycleResult<Comment> {
        logged(self.repository.store_comment(&comment).await, "store_comment")?;
        info!(
            comment_id = %comment.id(),
            task_id = %comment.target().task_id(),
            "stored comment"
        );
        Ok(comment)
    }

    async fn threads(&self, target: CommentTarget) -> TaskLifecycleResult<Vec<CommentThread>> {
        let flat = logged(self.repository.find_comments(target).await, "find_comments")?;
        Ok(CommentThread::build(flat))
    }
}
