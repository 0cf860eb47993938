//! Service layer for task creation, retrieval, updates and status changes.

use super::access::{load_task, logged, visible_task};
use super::{CreateTaskRequest, TaskDetails};
use crate::task::{
    domain::{
        CommentId, CommentTarget, CommentThread, Tag, TagColor, TagName, Task, TaskDomainError,
        TaskId, TaskPatch, TaskStatus, WorkItemRef,
    },
    ports::{TaskIncludes, TaskQuery, TaskRepositoryError, TaskStore},
};
use crate::user::domain::UserId;
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The actor is neither creator nor assignee of the item.
    #[error("user {actor} is not allowed to act on {item}")]
    Unauthorized {
        /// Acting user.
        actor: UserId,
        /// Target item.
        item: WorkItemRef,
    },
    /// Only the creator may delete a task.
    #[error("user {actor} did not create task {task_id}")]
    NotCreator {
        /// Acting user.
        actor: UserId,
        /// Target task.
        task_id: TaskId,
    },
    /// Only the author may delete a comment.
    #[error("user {actor} did not write comment {comment_id}")]
    NotCommentAuthor {
        /// Acting user.
        actor: UserId,
        /// Target comment.
        comment_id: CommentId,
    },
}

impl TaskLifecycleError {
    /// Returns whether the error reports a missing entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_not_found())
    }
}

/// Result type for task service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every operation except [`Self::list_tasks`] and the backlog promotion takes
/// the acting user explicitly.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    pub(super) repository: Arc<R>,
    pub(super) clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a `TODO` task owned by `actor`.
    ///
    /// Validation runs before any store call; referenced tags are created
    /// with the default color when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an empty title, invalid
    /// hours or tags, or a start date after the deadline, and
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(
        &self,
        actor: &UserId,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let draft = request.into_draft()?;
        let task = Task::new(actor.clone(), draft, &*self.clock)?;
        self.upsert_tags(task.tags()).await?;
        logged(self.repository.store(&task).await, "store_task")?;
        info!(task_id = %task.id(), actor = %actor, "created task");
        Ok(task)
    }

    /// Loads a task with the requested relations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] unless `actor` created or
    /// is assigned to the task, or a repository error.
    pub async fn get_task(
        &self,
        actor: &UserId,
        id: TaskId,
        includes: TaskIncludes,
    ) -> TaskLifecycleResult<TaskDetails> {
        let task = visible_task(&*self.repository, actor, id).await?;

        let sub_tasks = if includes.sub_tasks {
            Some(logged(self.repository.find_sub_tasks(id).await, "find_sub_tasks")?)
        } else {
            None
        };
        let comments = if includes.comments {
            let flat = logged(
                self.repository
                    .find_comments(CommentTarget::Task { task_id: id })
                    .await,
                "find_comments",
            )?;
            Some(CommentThread::build(flat))
        } else {
            None
        };

        Ok(TaskDetails {
            task,
            sub_tasks,
            comments,
        })
    }

    /// Lists tasks matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_tasks(&self, query: &TaskQuery) -> TaskLifecycleResult<Vec<Task>> {
        Ok(logged(self.repository.find_many(query).await, "find_tasks")?)
    }

    /// Applies field changes to a task visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`],
    /// [`TaskDomainError::StartAfterDeadline`] or a repository error.
    pub async fn update_task(
        &self,
        actor: &UserId,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskLifecycleResult<Task> {
        let mut task = visible_task(&*self.repository, actor, id).await?;
        if patch.is_empty() {
            return Ok(task);
        }
        if let Some(tags) = &patch.tags {
            self.upsert_tags(tags).await?;
        }
        task.apply_patch(patch, &*self.clock)?;
        logged(self.repository.update(&task).await, "update_task")?;
        Ok(task)
    }

    /// Adds assignees to a task visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyAssigneeList`] when `users` is empty,
    /// [`TaskLifecycleError::Unauthorized`] or a repository error.
    pub async fn assign_users(
        &self,
        actor: &UserId,
        id: TaskId,
        users: Vec<UserId>,
    ) -> TaskLifecycleResult<Task> {
        if users.is_empty() {
            return Err(TaskDomainError::EmptyAssigneeList.into());
        }
        let mut task = visible_task(&*self.repository, actor, id).await?;
        if task.assign(users, &*self.clock) > 0 {
            logged(self.repository.update(&task).await, "update_task")?;
        }
        Ok(task)
    }

    /// Removes one assignee from a task visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] or a repository error.
    pub async fn unassign_user(
        &self,
        actor: &UserId,
        id: TaskId,
        user: &UserId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = visible_task(&*self.repository, actor, id).await?;
        if task.unassign(user, &*self.clock) {
            logged(self.repository.update(&task).await, "update_task")?;
        }
        Ok(task)
    }

    /// Deletes a task with its subtasks and comments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotCreator`] unless `actor` created the
    /// task, or a repository error.
    pub async fn delete_task(&self, actor: &UserId, id: TaskId) -> TaskLifecycleResult<()> {
        let task = load_task(&*self.repository, id).await?;
        if !task.is_creator(actor) {
            return Err(TaskLifecycleError::NotCreator {
                actor: actor.clone(),
                task_id: id,
            });
        }
        logged(self.repository.delete(id).await, "delete_task")?;
        info!(task_id = %id, actor = %actor, "deleted task");
        Ok(())
    }

    /// Moves a task to `status` following the transition table.
    ///
    /// Entering `COMPLETED` stamps the completion time and leaving it clears
    /// the stamp. A same-status request returns the task unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`],
    /// [`TaskDomainError::InvalidStatusTransition`] or a repository error.
    pub async fn set_task_status(
        &self,
        actor: &UserId,
        id: TaskId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let mut task = visible_task(&*self.repository, actor, id).await?;
        let from = task.status();
        if task.transition_to(status, &*self.clock)? {
            logged(self.repository.update(&task).await, "update_task")?;
            info!(task_id = %id, %from, to = %status, "task status changed");
        }
        Ok(task)
    }

    /// Reopens a completed or cancelled task into `TODO` or `IN_PROGRESS`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotReopenable`],
    /// [`TaskDomainError::InvalidReopenTarget`],
    /// [`TaskLifecycleError::Unauthorized`] or a repository error.
    pub async fn reopen_task(
        &self,
        actor: &UserId,
        id: TaskId,
        target: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let mut task = visible_task(&*self.repository, actor, id).await?;
        let from = task.status();
        task.reopen(target, &*self.clock)?;
        logged(self.repository.update(&task).await, "update_task")?;
        info!(task_id = %id, %from, to = %target, "task reopened");
        Ok(task)
    }

    async fn upsert_tags(&self, names: &BTreeSet<TagName>) -> TaskLifecycleResult<()> {
        for name in names {
            let tag = Tag::new(name.clone(), TagColor::default(), &*self.clock);
            logged(self.repository.upsert_tag(&tag).await, "upsert_tag")?;
        }
        Ok(())
    }
}
