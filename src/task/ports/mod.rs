//! Port contracts for task management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod query;
pub mod repository;

pub use query::{TaskFilter, TaskIncludes, TaskOrder, TaskQuery};
pub use repository::{
    CommentRepository, SubTaskRepository, TagRepository, TaskRepository, TaskRepositoryError,
    TaskRepositoryResult, TaskStore,
};
