//! Subtask operations on [`TaskLifecycleService`].

use super::access::{accessible_sub_task, load_task, logged, unauthorized};
use super::{CreateSubTaskRequest, TaskLifecycleResult, TaskLifecycleService};
use crate::task::{
    domain::{SubTask, SubTaskId, SubTaskPatch, TaskId, TaskStatus, WorkItemRef},
    ports::TaskStore,
};
use crate::user::domain::UserId;
use mockable::Clock;
use tracing::info;

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a `TODO` subtask under a task visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns a not-found repository error when the parent task is missing,
    /// in which case nothing is stored.
    pub async fn create_sub_task(
        &self,
        actor: &UserId,
        task_id: TaskId,
        request: CreateSubTaskRequest,
    ) -> TaskLifecycleResult<SubTask> {
        let draft = request.into_draft()?;
        let task = load_task(&*self.repository, task_id).await?;
        if !task.is_visible_to(actor) {
            return Err(unauthorized(actor, WorkItemRef::Task(task_id)));
        }
        let sub_task = SubTask::new(task_id, draft, &*self.clock);
        logged(
            self.repository.store_sub_task(&sub_task).await,
            "store_sub_task",
        )?;
        info!(sub_task_id = %sub_task.id(), %task_id, "created sub-task");
        Ok(sub_task)
    }

    /// Loads a subtask.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::Unauthorized`] unless `actor` can
    /// see the parent task or is the subtask assignee.
    pub async fn get_sub_task(&self, actor: &UserId, id: SubTaskId) -> TaskLifecycleResult<SubTask> {
        let (_, sub_task) = accessible_sub_task(&*self.repository, actor, id).await?;
        Ok(sub_task)
    }

    /// Applies field changes to a subtask.
    ///
    /// # Errors
    ///
    /// Returns an authorisation or repository error.
    pub async fn update_sub_task(
        &self,
        actor: &UserId,
        id: SubTaskId,
        patch: SubTaskPatch,
    ) -> TaskLifecycleResult<SubTask> {
        let (_, mut sub_task) = accessible_sub_task(&*self.repository, actor, id).await?;
        if patch == SubTaskPatch::default() {
            return Ok(sub_task);
        }
        sub_task.apply_patch(patch, &*self.clock);
        logged(
            self.repository.update_sub_task(&sub_task).await,
            "update_sub_task",
        )?;
        Ok(sub_task)
    }

    /// Deletes a subtask and its comments.
    ///
    /// # Errors
    ///
    /// Returns an authorisation or repository error.
    pub async fn delete_sub_task(&self, actor: &UserId, id: SubTaskId) -> TaskLifecycleResult<()> {
        accessible_sub_task(&*self.repository, actor, id).await?;
        logged(
            self.repository.delete_sub_task(id).await,
            "delete_sub_task",
        )?;
        info!(sub_task_id = %id, actor = %actor, "deleted sub-task");
        Ok(())
    }

    /// Moves a subtask to `status` following the transition table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::domain::TaskDomainError::InvalidStatusTransition`],
    /// an authorisation error or a repository error.
    pub async fn set_sub_task_status(
        &self,
        actor: &UserId,
        id: SubTaskId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<SubTask> {
        let (_, mut sub_task) = accessible_sub_task(&*self.repository, actor, id).await?;
        let from = sub_task.status();
        if sub_task.transition_to(status, &*self.clock)? {
            logged(
                self.repository.update_sub_task(&sub_task).await,
                "update_sub_task",
            )?;
            info!(sub_task_id = %id, %from, to = %status, "sub-task status changed");
        }
        Ok(sub_task)
    }

    /// Reopens a completed or cancelled subtask.
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::domain::TaskDomainError::NotReopenable`],
    /// [`crate::task::domain::TaskDomainError::InvalidReopenTarget`], an
    /// authorisation error or a repository error.
    pub async fn reopen_sub_task(
        &self,
        actor: &UserId,
        id: SubTaskId,
        target: TaskStatus,
    ) -> TaskLifecycleResult<SubTask> {
        let (_, mut sub_task) = accessible_sub_task(&*self.repository, actor, id).await?;
        sub_task.reopen(target, &*self.clock)?;
        logged(
            self.repository.update_sub_task(&sub_task).await,
            "update_sub_task",
        )?;
        Ok(sub_task)
    }
}
