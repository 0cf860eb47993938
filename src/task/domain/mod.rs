//! Domain model for tasks, subtasks, comments and tags.
//!
//! Status changes for both tasks and subtasks flow through
//! [`StatusLifecycle`], which owns the transition table and keeps the
//! completion timestamp consistent with the status.

mod comment;
mod error;
mod ids;
mod lifecycle;
mod priority;
mod status;
mod sub_task;
mod tag;
mod task;

pub use comment::{Comment, CommentTarget, CommentText, CommentThread, PersistedCommentData};
pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{CommentId, Hours, SubTaskId, TagId, TaskId, Title, WorkItemRef};
pub use lifecycle::StatusLifecycle;
pub use priority::TaskPriority;
pub use status::TaskStatus;
pub use sub_task::{PersistedSubTaskData, SubTask, SubTaskDraft, SubTaskPatch};
pub use tag::{Tag, TagColor, TagName};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskPatch};
