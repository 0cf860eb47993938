//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{
        CommentRow, SubTaskRow, TagRow, TaskAssigneeRow, TaskRelatedRow, TaskRow, TaskTagRow,
    },
    schema::{comments, sub_tasks, tags, task_assignees, task_related, task_tags, tasks},
};
use crate::task::{
    domain::{
        Comment, CommentId, CommentTarget, CommentText, Hours, PersistedCommentData,
        PersistedSubTaskData, PersistedTaskData, SubTask, SubTaskId, Tag, TagColor, TagId,
        TagName, Task, TaskId, TaskPriority, TaskStatus, Title,
    },
    ports::{
        CommentRepository, SubTaskRepository, TagRepository, TaskOrder, TaskQuery,
        TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    },
};
use crate::team::domain::TeamId;
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
///
/// Assignee, tag and related-task sets live in link tables that are rewritten
/// in the same transaction as the task row. Deletes rely on `ON DELETE
/// CASCADE` foreign keys for subtasks, comments and reply trees.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_task_row(task);
        let links = TaskLinks::from_task(task);
        let creator = vec![task.creator().clone()];

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                diesel::insert_into(tasks::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id)
                        }
                        _ => map_reference_violation(err, &creator, row.team_id),
                    })?;
                links.insert(tx)
            })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_task_row(task);
        let links = TaskLinks::from_task(task);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                    .set(&row)
                    .execute(tx)
                    .map_err(|err| map_reference_violation(err, &[], row.team_id))?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                TaskLinks::clear(tx, task_id.into_inner())?;
                links.insert(tx)
            })
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            let Some(found) = row else {
                return Ok(None);
            };
            let mut hydrated = hydrate_tasks(connection, vec![found])?;
            Ok(hydrated.pop())
        })
        .await
    }

    async fn find_many(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let lookup = query.clone();
        self.run_blocking(move |connection| {
            let rows = load_task_rows(connection, &lookup)?;
            hydrate_tasks(connection, rows)
        })
        .await
    }

    async fn promote_overdue_to_backlog(
        &self,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<TaskId>> {
        let excluded: Vec<&'static str> = TaskStatus::ALL
            .into_iter()
            .filter(|status| !status.is_promotable())
            .map(TaskStatus::as_str)
            .collect();

        self.run_blocking(move |connection| {
            let mut promoted: Vec<TaskId> = diesel::update(
                tasks::table
                    .filter(tasks::deadline.lt(now))
                    .filter(tasks::status.ne_all(excluded)),
            )
            .set((
                tasks::status.eq(TaskStatus::Backlog.as_str()),
                tasks::completed_at.eq(None::<DateTime<Utc>>),
                tasks::updated_at.eq(now),
            ))
            .returning(tasks::id)
            .get_results::<Uuid>(connection)?
            .into_iter()
            .map(TaskId::from_uuid)
            .collect();
            promoted.sort();
            Ok(promoted)
        })
        .await
    }
}

#[async_trait]
impl SubTaskRepository for PostgresTaskRepository {
    async fn store_sub_task(&self, sub_task: &SubTask) -> TaskRepositoryResult<()> {
        let sub_task_id = sub_task.id();
        let task_id = sub_task.task_id();
        let row = to_sub_task_row(sub_task);
        let assignee: Vec<UserId> = sub_task.assignee().cloned().into_iter().collect();

        self.run_blocking(move |connection| {
            diesel::insert_into(sub_tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
                        if is_parent_task_violation(info.as_ref()) =>
                    {
                        TaskRepositoryError::NotFound(task_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateSubTask(sub_task_id)
                    }
                    _ => map_reference_violation(err, &assignee, None),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_sub_task(&self, sub_task: &SubTask) -> TaskRepositoryResult<()> {
        let sub_task_id = sub_task.id();
        let row = to_sub_task_row(sub_task);
        let assignee: Vec<UserId> = sub_task.assignee().cloned().into_iter().collect();

        self.run_blocking(move |connection| {
            let updated = diesel::update(sub_tasks::table.find(sub_task_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(|err| map_reference_violation(err, &assignee, None))?;
            if updated == 0 {
                return Err(TaskRepositoryError::SubTaskNotFound(sub_task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_sub_task(&self, id: SubTaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(sub_tasks::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::SubTaskNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_sub_task(&self, id: SubTaskId) -> TaskRepositoryResult<Option<SubTask>> {
        self.run_blocking(move |connection| {
            let row = sub_tasks::table
                .find(id.into_inner())
                .select(SubTaskRow::as_select())
                .first::<SubTaskRow>(connection)
                .optional()?;
            row.map(row_to_sub_task).transpose()
        })
        .await
    }

    async fn find_sub_tasks(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<SubTask>> {
        self.run_blocking(move |connection| {
            let rows = sub_tasks::table
                .filter(sub_tasks::task_id.eq(task_id.into_inner()))
                .order((sub_tasks::created_at.asc(), sub_tasks::id.asc()))
                .select(SubTaskRow::as_select())
                .load::<SubTaskRow>(connection)?;
            rows.into_iter().map(row_to_sub_task).collect()
        })
        .await
    }
}

#[async_trait]
impl CommentRepository for PostgresTaskRepository {
    async fn store_comment(&self, comment: &Comment) -> TaskRepositoryResult<()> {
        let comment_id = comment.id();
        let row = to_comment_row(comment);
        let author = vec![comment.author().clone()];

        self.run_blocking(move |connection| {
            diesel::insert_into(comments::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateComment(comment_id)
                    }
                    _ => map_reference_violation(err, &author, None),
                })?;
            Ok(())
        })
        .await
    }

    async fn delete_comment(&self, id: CommentId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(comments::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::CommentNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_comment(&self, id: CommentId) -> TaskRepositoryResult<Option<Comment>> {
        self.run_blocking(move |connection| {
            let row = comments::table
                .find(id.into_inner())
                .select(CommentRow::as_select())
                .first::<CommentRow>(connection)
                .optional()?;
            row.map(row_to_comment).transpose()
        })
        .await
    }

    async fn find_comments(&self, target: CommentTarget) -> TaskRepositoryResult<Vec<Comment>> {
        self.run_blocking(move |connection| {
            let mut statement = comments::table
                .filter(comments::task_id.eq(target.task_id().into_inner()))
                .into_boxed();
            statement = match target.sub_task_id() {
                Some(sub_task_id) => {
                    statement.filter(comments::sub_task_id.eq(sub_task_id.into_inner()))
                }
                None => statement.filter(comments::sub_task_id.is_null()),
            };
            let rows = statement
                .order((comments::created_at.asc(), comments::id.asc()))
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)?;
            rows.into_iter().map(row_to_comment).collect()
        })
        .await
    }
}

#[async_trait]
impl TagRepository for PostgresTaskRepository {
    async fn upsert_tag(&self, tag: &Tag) -> TaskRepositoryResult<Tag> {
        let row = TagRow {
            id: tag.id().into_inner(),
            name: tag.name().as_str().to_owned(),
            color: tag.color().as_str().to_owned(),
            created_at: tag.created_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(tags::table)
                .values(&row)
                .on_conflict(tags::name)
                .do_nothing()
                .execute(connection)?;
            let stored = tags::table
                .filter(tags::name.eq(&row.name))
                .select(TagRow::as_select())
                .first::<TagRow>(connection)?;
            row_to_tag(stored)
        })
        .await
    }

    async fn find_tag_by_name(&self, name: &TagName) -> TaskRepositoryResult<Option<Tag>> {
        let lookup = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tags::table
                .filter(tags::name.eq(lookup))
                .select(TagRow::as_select())
                .first::<TagRow>(connection)
                .optional()?;
            row.map(row_to_tag).transpose()
        })
        .await
    }

    async fn list_tags(&self) -> TaskRepositoryResult<Vec<Tag>> {
        self.run_blocking(move |connection| {
            let rows = tags::table
                .order(tags::name.asc())
                .select(TagRow::as_select())
                .load::<TagRow>(connection)?;
            rows.into_iter().map(row_to_tag).collect()
        })
        .await
    }
}

/// Link-table rows for one task.
struct TaskLinks {
    task_id: Uuid,
    touched_at: DateTime<Utc>,
    users: Vec<UserId>,
    assignees: Vec<TaskAssigneeRow>,
    tags: Vec<TaskTagRow>,
    related: Vec<TaskRelatedRow>,
}

impl TaskLinks {
    fn from_task(task: &Task) -> Self {
        let task_id = task.id().into_inner();
        Self {
            task_id,
            touched_at: task.updated_at(),
            users: task.assignees().iter().cloned().collect(),
            assignees: task
                .assignees()
                .iter()
                .map(|user| TaskAssigneeRow {
                    task_id,
                    user_id: user.as_str().to_owned(),
                })
                .collect(),
            tags: task
                .tags()
                .iter()
                .map(|tag| TaskTagRow {
                    task_id,
                    tag_name: tag.as_str().to_owned(),
                })
                .collect(),
            related: task
                .related()
                .iter()
                .map(|related| TaskRelatedRow {
                    task_id,
                    related_id: related.into_inner(),
                })
                .collect(),
        }
    }

    fn clear(connection: &mut PgConnection, task_id: Uuid) -> TaskRepositoryResult<()> {
        diesel::delete(task_assignees::table.filter(task_assignees::task_id.eq(task_id)))
            .execute(connection)?;
        diesel::delete(task_tags::table.filter(task_tags::task_id.eq(task_id)))
            .execute(connection)?;
        diesel::delete(task_related::table.filter(task_related::task_id.eq(task_id)))
            .execute(connection)?;
        Ok(())
    }

    /// Inserts link rows, creating default-colored tags on first use.
    fn insert(&self, connection: &mut PgConnection) -> TaskRepositoryResult<()> {
        if !self.tags.is_empty() {
            let default_color = TagColor::default();
            let tag_rows: Vec<TagRow> = self
                .tags
                .iter()
                .map(|link| TagRow {
                    id: TagId::new().into_inner(),
                    name: link.tag_name.clone(),
                    color: default_color.as_str().to_owned(),
                    created_at: self.touched_at,
                })
                .collect();
            diesel::insert_into(tags::table)
                .values(&tag_rows)
                .on_conflict(tags::name)
                .do_nothing()
                .execute(connection)?;
            diesel::insert_into(task_tags::table)
                .values(&self.tags)
                .execute(connection)?;
        }
        if !self.assignees.is_empty() {
            diesel::insert_into(task_assignees::table)
                .values(&self.assignees)
                .execute(connection)
                .map_err(|err| map_reference_violation(err, &self.users, None))?;
        }
        if !self.related.is_empty() {
            diesel::insert_into(task_related::table)
                .values(&self.related)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRepositoryError::persistence(std::io::Error::other(format!(
                            "task {} references an unknown related task",
                            self.task_id
                        )))
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
        }
        Ok(())
    }
}

fn load_task_rows(
    connection: &mut PgConnection,
    query: &TaskQuery,
) -> TaskRepositoryResult<Vec<TaskRow>> {
    let filter = &query.filter;
    let mut statement = tasks::table.into_boxed();

    if let Some(user) = &filter.visible_to {
        let assigned = task_assignees::table
            .filter(task_assignees::user_id.eq(user.as_str().to_owned()))
            .select(task_assignees::task_id);
        statement = statement.filter(
            tasks::creator_id
                .eq(user.as_str().to_owned())
                .or(tasks::id.eq_any(assigned)),
        );
    }
    if let Some(user) = &filter.assignee {
        let assigned = task_assignees::table
            .filter(task_assignees::user_id.eq(user.as_str().to_owned()))
            .select(task_assignees::task_id);
        statement = statement.filter(tasks::id.eq_any(assigned));
    }
    if let Some(user) = &filter.creator {
        statement = statement.filter(tasks::creator_id.eq(user.as_str().to_owned()));
    }
    if let Some(statuses) = &filter.statuses {
        let allowed: Vec<&'static str> = statuses.iter().copied().map(TaskStatus::as_str).collect();
        statement = statement.filter(tasks::status.eq_any(allowed));
    }
    if let Some(team) = filter.team {
        statement = statement.filter(tasks::team_id.eq(team.into_inner()));
    }
    if let Some(from) = filter.deadline_from {
        statement = statement.filter(tasks::deadline.ge(from));
    }
    if let Some(before) = filter.deadline_before {
        statement = statement.filter(tasks::deadline.lt(before));
    }
    if !filter.include_archived {
        statement = statement.filter(tasks::archived.eq(false));
    }

    statement = match query.order {
        TaskOrder::DeadlineAsc => statement.order((tasks::deadline.asc(), tasks::id.asc())),
        TaskOrder::CreatedDesc => statement.order((tasks::created_at.desc(), tasks::id.asc())),
        TaskOrder::UpdatedDesc => statement.order((tasks::updated_at.desc(), tasks::id.asc())),
    };
    if let Some(take) = query.take {
        let limit = i64::try_from(take).map_err(TaskRepositoryError::persistence)?;
        statement = statement.limit(limit);
    }

    Ok(statement
        .select(TaskRow::as_select())
        .load::<TaskRow>(connection)?)
}

/// Loads link rows for `rows` and assembles aggregates in the same order.
fn hydrate_tasks(
    connection: &mut PgConnection,
    rows: Vec<TaskRow>,
) -> TaskRepositoryResult<Vec<Task>> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let mut assignees: HashMap<Uuid, BTreeSet<UserId>> = HashMap::new();
    for link in task_assignees::table
        .filter(task_assignees::task_id.eq_any(&ids))
        .load::<TaskAssigneeRow>(connection)?
    {
        let user = UserId::new(link.user_id).map_err(TaskRepositoryError::persistence)?;
        assignees.entry(link.task_id).or_default().insert(user);
    }

    let mut tag_names: HashMap<Uuid, BTreeSet<TagName>> = HashMap::new();
    for link in task_tags::table
        .filter(task_tags::task_id.eq_any(&ids))
        .load::<TaskTagRow>(connection)?
    {
        let name = TagName::new(link.tag_name).map_err(TaskRepositoryError::persistence)?;
        tag_names.entry(link.task_id).or_default().insert(name);
    }

    let mut related: HashMap<Uuid, BTreeSet<TaskId>> = HashMap::new();
    for link in task_related::table
        .filter(task_related::task_id.eq_any(&ids))
        .load::<TaskRelatedRow>(connection)?
    {
        related
            .entry(link.task_id)
            .or_default()
            .insert(TaskId::from_uuid(link.related_id));
    }

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            row_to_task(
                row,
                assignees.remove(&id).unwrap_or_default(),
                tag_names.remove(&id).unwrap_or_default(),
                related.remove(&id).unwrap_or_default(),
            )
        })
        .collect()
}

fn to_task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        deadline: task.deadline(),
        start_date: task.start_date(),
        completed_at: task.completed_at(),
        creator_id: task.creator().as_str().to_owned(),
        team_id: task.team().map(TeamId::into_inner),
        estimated_hours: task.estimated_hours().map(Hours::value),
        actual_hours: task.actual_hours().map(Hours::value),
        archived: task.is_archived(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(
    row: TaskRow,
    assignees: BTreeSet<UserId>,
    tags: BTreeSet<TagName>,
    related: BTreeSet<TaskId>,
) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status,
        priority,
        deadline,
        start_date,
        completed_at,
        creator_id,
        team_id,
        estimated_hours,
        actual_hours,
        archived,
        created_at,
        updated_at,
    } = row;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: Title::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        status: parse_status(&status)?,
        completed_at,
        priority: parse_priority(&priority)?,
        deadline,
        start_date,
        creator: UserId::new(creator_id).map_err(TaskRepositoryError::persistence)?,
        assignees,
        team: team_id.map(TeamId::from_uuid),
        tags,
        related,
        estimated_hours: estimated_hours.map(parse_hours).transpose()?,
        actual_hours: actual_hours.map(parse_hours).transpose()?,
        archived,
        created_at,
        updated_at,
    }))
}

fn to_sub_task_row(sub_task: &SubTask) -> SubTaskRow {
    SubTaskRow {
        id: sub_task.id().into_inner(),
        task_id: sub_task.task_id().into_inner(),
        title: sub_task.title().as_str().to_owned(),
        description: sub_task.description().map(str::to_owned),
        status: sub_task.status().as_str().to_owned(),
        priority: sub_task.priority().as_str().to_owned(),
        assignee_id: sub_task.assignee().map(|user| user.as_str().to_owned()),
        estimated_hours: sub_task.estimated_hours().map(Hours::value),
        actual_hours: sub_task.actual_hours().map(Hours::value),
        completed_at: sub_task.completed_at(),
        created_at: sub_task.created_at(),
        updated_at: sub_task.updated_at(),
    }
}

fn row_to_sub_task(row: SubTaskRow) -> TaskRepositoryResult<SubTask> {
    let SubTaskRow {
        id,
        task_id,
        title,
        description,
        status,
        priority,
        assignee_id,
        estimated_hours,
        actual_hours,
        completed_at,
        created_at,
        updated_at,
    } = row;

    Ok(SubTask::from_persisted(PersistedSubTaskData {
        id: SubTaskId::from_uuid(id),
        task_id: TaskId::from_uuid(task_id),
        title: Title::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        status: parse_status(&status)?,
        completed_at,
        priority: parse_priority(&priority)?,
        assignee: assignee_id
            .map(UserId::new)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        estimated_hours: estimated_hours.map(parse_hours).transpose()?,
        actual_hours: actual_hours.map(parse_hours).transpose()?,
        created_at,
        updated_at,
    }))
}

fn to_comment_row(comment: &Comment) -> CommentRow {
    let target = comment.target();
    CommentRow {
        id: comment.id().into_inner(),
        text: comment.text().as_str().to_owned(),
        author_id: comment.author().as_str().to_owned(),
        task_id: target.task_id().into_inner(),
        sub_task_id: target.sub_task_id().map(SubTaskId::into_inner),
        parent_id: comment.parent_id().map(CommentId::into_inner),
        created_at: comment.created_at(),
        updated_at: comment.updated_at(),
    }
}

fn row_to_comment(row: CommentRow) -> TaskRepositoryResult<Comment> {
    let task_id = TaskId::from_uuid(row.task_id);
    let target = match row.sub_task_id {
        Some(sub_task_id) => CommentTarget::SubTask {
            task_id,
            sub_task_id: SubTaskId::from_uuid(sub_task_id),
        },
        None => CommentTarget::Task { task_id },
    };

    Ok(Comment::from_persisted(PersistedCommentData {
        id: CommentId::from_uuid(row.id),
        text: CommentText::new(row.text).map_err(TaskRepositoryError::persistence)?,
        author: UserId::new(row.author_id).map_err(TaskRepositoryError::persistence)?,
        target,
        parent_id: row.parent_id.map(CommentId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_tag(row: TagRow) -> TaskRepositoryResult<Tag> {
    Ok(Tag::from_persisted(
        TagId::from_uuid(row.id),
        TagName::new(row.name).map_err(TaskRepositoryError::persistence)?,
        TagColor::new(row.color).map_err(TaskRepositoryError::persistence)?,
        row.created_at,
    ))
}

fn is_parent_task_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "sub_tasks_task_id_fkey")
}

/// Foreign keys from task-side tables into `users`.
const USER_FOREIGN_KEYS: [&str; 4] = [
    "tasks_creator_id_fkey",
    "task_assignees_user_id_fkey",
    "sub_tasks_assignee_id_fkey",
    "comments_author_id_fkey",
];

/// Maps user and team foreign-key violations to typed not-found errors.
///
/// `candidates` are the user identifiers the statement wrote. The offending
/// one is picked from the violation detail, which names the missing key.
fn map_reference_violation(
    err: DieselError,
    candidates: &[UserId],
    team: Option<Uuid>,
) -> TaskRepositoryError {
    missing_reference(&err, candidates, team)
        .unwrap_or_else(|| TaskRepositoryError::persistence(err))
}

fn missing_reference(
    err: &DieselError,
    candidates: &[UserId],
    team: Option<Uuid>,
) -> Option<TaskRepositoryError> {
    let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) = err else {
        return None;
    };
    match info.constraint_name()? {
        name if USER_FOREIGN_KEYS.contains(&name) => {
            let detail = info.details().unwrap_or_default();
            candidates
                .iter()
                .find(|user| detail.contains(&format!("=({})", user.as_str())))
                .or_else(|| candidates.first())
                .cloned()
                .map(TaskRepositoryError::UserNotFound)
        }
        "tasks_team_id_fkey" => {
            team.map(|id| TaskRepositoryError::TeamNotFound(TeamId::from_uuid(id)))
        }
        _ => None,
    }
}

fn parse_status(value: &str) -> TaskRepositoryResult<TaskStatus> {
    TaskStatus::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn parse_priority(value: &str) -> TaskRepositoryResult<TaskPriority> {
    TaskPriority::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn parse_hours(value: f64) -> TaskRepositoryResult<Hours> {
    Hours::new(value).map_err(TaskRepositoryError::persistence)
}
