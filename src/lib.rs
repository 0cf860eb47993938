//! Taskboard: team task tracking with a status lifecycle, automatic backlog
//! promotion and a lane-grouped timeline.
//!
//! # Architecture
//!
//! Entity modules follow hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration with an explicit acting user
//!
//! # Modules
//!
//! - [`task`]: Tasks, subtasks, threaded comments, tags and the backlog job
//! - [`user`]: Users mirrored from the identity provider
//! - [`team`]: Teams and their members
//! - [`timeline`]: Row assignment for the Gantt-style view
//! - [`board`]: Kanban lanes, dashboard figures and the optimistic cache
//! - [`api`]: HTTP routes
//! - [`settings`] and [`telemetry`]: Runtime configuration and logging

pub mod api;
pub mod board;
pub mod settings;
pub mod task;
pub mod team;
pub mod telemetry;
pub mod timeline;
pub mod user;

#[cfg(test)]
mod test_support;
