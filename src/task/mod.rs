//! Tasks, subtasks, threaded comments and tags.
//!
//! Status changes go through an explicit transition table, with completed
//! and cancelled work left only by reopening it. Overdue open tasks are
//! moved to the backlog in bulk by [`services::BacklogJob`]. Every service
//! call names the acting user, and access is granted to a task's creator
//! and assignees. The module is split into:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
