//! Diesel row models for task persistence.

use super::schema::{comments, sub_tasks, tags, task_assignees, task_related, task_tags, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Task row, used for both reads and writes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Status storage string.
    pub status: String,
    /// Priority storage string.
    pub priority: String,
    /// Deadline.
    pub deadline: DateTime<Utc>,
    /// Optional planned start.
    pub start_date: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creating user.
    pub creator_id: String,
    /// Owning team.
    pub team_id: Option<Uuid>,
    /// Estimated effort.
    pub estimated_hours: Option<f64>,
    /// Actual effort.
    pub actual_hours: Option<f64>,
    /// Archived flag.
    pub archived: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Subtask row, used for both reads and writes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = sub_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct SubTaskRow {
    /// Subtask identifier.
    pub id: Uuid,
    /// Parent task.
    pub task_id: Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Status storage string.
    pub status: String,
    /// Priority storage string.
    pub priority: String,
    /// Optional assignee.
    pub assignee_id: Option<String>,
    /// Estimated effort.
    pub estimated_hours: Option<f64>,
    /// Actual effort.
    pub actual_hours: Option<f64>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Comment row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Comment identifier.
    pub id: Uuid,
    /// Body.
    pub text: String,
    /// Author.
    pub author_id: String,
    /// Task, direct or via subtask.
    pub task_id: Uuid,
    /// Subtask for subtask comments.
    pub sub_task_id: Option<Uuid>,
    /// Parent comment.
    pub parent_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Tag row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TagRow {
    /// Tag identifier.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Color.
    pub color: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Assignee link row.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = task_assignees)]
pub struct TaskAssigneeRow {
    /// Task.
    pub task_id: Uuid,
    /// Assigned user.
    pub user_id: String,
}

/// Tag link row.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = task_tags)]
pub struct TaskTagRow {
    /// Task.
    pub task_id: Uuid,
    /// Tag name.
    pub tag_name: String,
}

/// Related-task link row.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = task_related)]
pub struct TaskRelatedRow {
    /// Task.
    pub task_id: Uuid,
    /// Related task.
    pub related_id: Uuid,
}
