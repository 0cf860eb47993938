//! Application services for task management.

mod access;
mod backlog;
mod comments;
mod lifecycle;
mod requests;
mod sub_task;

pub use backlog::{BacklogJob, BacklogPromotion};
pub use comments::CommentService;
pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
pub use requests::{CreateSubTaskRequest, CreateTaskRequest, TaskDetails};
