//! Lookup and authorisation helpers shared by task services.

use super::{TaskLifecycleError, TaskLifecycleResult};
use crate::task::{
    domain::{SubTask, SubTaskId, Task, TaskId, WorkItemRef},
    ports::{SubTaskRepository, TaskRepository, TaskRepositoryError},
};
use crate::user::domain::UserId;
use tracing::{error, warn};

/// Logs store failures before they propagate.
pub(super) fn logged<T>(
    result: Result<T, TaskRepositoryError>,
    operation: &'static str,
) -> Result<T, TaskRepositoryError> {
    result.inspect_err(|err| {
        if matches!(err, TaskRepositoryError::Persistence(_)) {
            error!(operation, error = %err, "task store operation failed");
        }
    })
}

pub(super) async fn load_task<R>(repository: &R, id: TaskId) -> TaskLifecycleResult<Task>
where
    R: TaskRepository + ?Sized,
{
    logged(repository.find_by_id(id).await, "find_task")?
        .ok_or(TaskLifecycleError::Repository(TaskRepositoryError::NotFound(id)))
}

/// Loads a task the actor created or is assigned to.
pub(super) async fn visible_task<R>(
    repository: &R,
    actor: &UserId,
    id: TaskId,
) -> TaskLifecycleResult<Task>
where
    R: TaskRepository + ?Sized,
{
    let task = load_task(repository, id).await?;
    if !task.is_visible_to(actor) {
        return Err(unauthorized(actor, WorkItemRef::Task(id)));
    }
    Ok(task)
}

/// Loads a subtask and its parent when the actor can see the parent or is
/// the subtask assignee.
pub(super) async fn accessible_sub_task<R>(
    repository: &R,
    actor: &UserId,
    id: SubTaskId,
) -> TaskLifecycleResult<(Task, SubTask)>
where
    R: TaskRepository + SubTaskRepository + ?Sized,
{
    let sub_task = logged(repository.find_sub_task(id).await, "find_sub_task")?
        .ok_or(TaskLifecycleError::Repository(
            TaskRepositoryError::SubTaskNotFound(id),
        ))?;
    let task = load_task(repository, sub_task.task_id()).await?;
    if !task.is_visible_to(actor) && !sub_task.is_assigned_to(actor) {
        return Err(unauthorized(actor, WorkItemRef::SubTask(id)));
    }
    Ok((task, sub_task))
}

pub(super) fn unauthorized(actor: &UserId, item: WorkItemRef) -> TaskLifecycleError {
    warn!(actor = %actor, %item, "rejected unauthorised task access");
    TaskLifecycleError::Unauthorized {
        actor: actor.clone(),
        item,
    }
}
