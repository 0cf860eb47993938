//! Kanban board read models and the optimistic board cache.

mod kanban;
mod optimistic;
mod stats;

pub use kanban::{BoardCard, KanbanBoard, KanbanLane};
pub use optimistic::OptimisticBoard;
pub use stats::BoardStats;
