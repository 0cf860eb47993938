//! `PostgreSQL` integration tests for the task store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{Comment, CommentTarget, CommentText, SubTaskId, TagName, TaskId, TaskStatus},
    ports::{
        CommentRepository, SubTaskRepository, TagRepository, TaskQuery, TaskRepository,
        TaskRepositoryError,
    },
    services::{
        CommentService, CreateSubTaskRequest, CreateTaskRequest, TaskLifecycleError,
        TaskLifecycleService,
    },
};
use taskboard::team::domain::TeamId;
use taskboard::user::domain::UserId;

use crate::postgres::helpers::{BoxError, PgContext, context, seed_user};

type Service = TaskLifecycleService<PostgresTaskRepository, DefaultClock>;

fn service(context: &PgContext) -> Service {
    TaskLifecycleService::new(Arc::clone(&context.tasks), Arc::new(DefaultClock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn task_links_survive_a_round_trip() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let grace = seed_user(&context, "grace").await?;
    let tasks = service(&context);

    let created = tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Patch servers", Utc::now() + Duration::days(3))
                .with_assignees([grace.clone()])
                .with_tags(["ops".to_owned()]),
        )
        .await?;

    let visible = tasks.list_tasks(&TaskQuery::visible_to(grace.clone())).await?;
    let found = visible.first().ok_or("assignee should see the task")?;
    assert_eq!(found.id(), created.id());
    assert!(found.assignees().contains(&grace));
    assert!(found.tags().contains(&TagName::new("ops")?));
    assert!(
        context
            .tasks
            .find_tag_by_name(&TagName::new("ops")?)
            .await?
            .is_some()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn bulk_promotion_skips_terminal_and_backlogged_tasks() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let tasks = service(&context);
    let past = Utc::now() - Duration::hours(1);

    let open = tasks
        .create_task(&ada, CreateTaskRequest::new("Open", past))
        .await?;
    let done = tasks
        .create_task(&ada, CreateTaskRequest::new("Done", past))
        .await?;
    tasks
        .set_task_status(&ada, done.id(), TaskStatus::Completed)
        .await?;

    let first = tasks.promote_overdue_tasks_to_backlog(Utc::now()).await?;
    let second = tasks.promote_overdue_tasks_to_backlog(Utc::now()).await?;

    assert_eq!(first.promoted, vec![open.id()]);
    assert!(second.promoted.is_empty());
    let stored = tasks.list_tasks(&TaskQuery::backlog_for(ada)).await?;
    assert_eq!(stored.len(), 1);
    assert!(stored.iter().all(|task| task.completed_at().is_none()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn deleting_a_task_cascades_to_children() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let tasks = service(&context);
    let comments = CommentService::new(Arc::clone(&context.tasks), Arc::new(DefaultClock));

    let task = tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Decommission", Utc::now() + Duration::days(1)),
        )
        .await?;
    let sub_task = tasks
        .create_sub_task(&ada, task.id(), CreateSubTaskRequest::new("Drain traffic"))
        .await?;
    let root = comments
        .comment_on_sub_task(&ada, sub_task.id(), "Starting now")
        .await?;
    let reply = comments.reply_to_comment(&ada, root.id(), "Done").await?;

    tasks.delete_task(&ada, task.id()).await?;

    assert!(context.tasks.find_sub_task(sub_task.id()).await?.is_none());
    assert!(context.tasks.find_comment(root.id()).await?.is_none());
    assert!(context.tasks.find_comment(reply.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn subtask_for_missing_parent_is_not_found() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let tasks = service(&context);

    let result = tasks
        .create_sub_task(&ada, TaskId::new(), CreateSubTaskRequest::new("Orphan"))
        .await;

    assert!(matches!(result, Err(ref err) if err.is_not_found()));
    assert!(context.tasks.find_sub_task(SubTaskId::new()).await?.is_none());
    Ok(())
}

fn missing_user<T>(result: &Result<T, TaskLifecycleError>) -> Option<&UserId> {
    match result {
        Err(TaskLifecycleError::Repository(TaskRepositoryError::UserNotFound(id))) => Some(id),
        _ => None,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn unknown_creator_is_a_missing_user() -> Result<(), BoxError> {
    let context = context()?;
    let ghost = UserId::new("ghost")?;
    let tasks = service(&context);

    let result = tasks
        .create_task(&ghost, CreateTaskRequest::new("Haunt", Utc::now() + Duration::days(1)))
        .await;

    assert_eq!(missing_user(&result), Some(&ghost));
    assert!(context.tasks.find_many(&TaskQuery::default()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn unknown_assignee_is_named_and_rolled_back() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let grace = seed_user(&context, "grace").await?;
    let ghost = UserId::new("ghost")?;
    let tasks = service(&context);

    let result = tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Review", Utc::now() + Duration::days(1))
                .with_assignees([grace, ghost.clone()]),
        )
        .await;

    assert_eq!(missing_user(&result), Some(&ghost));
    assert!(context.tasks.find_many(&TaskQuery::default()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn unknown_assignee_is_not_added_on_update() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let ghost = UserId::new("ghost")?;
    let tasks = service(&context);
    let task = tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Review", Utc::now() + Duration::days(1)),
        )
        .await?;

    let result = tasks.assign_users(&ada, task.id(), vec![ghost.clone()]).await;

    assert_eq!(missing_user(&result), Some(&ghost));
    let stored = context
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or("task should survive")?;
    assert!(stored.assignees().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn unknown_sub_task_assignee_is_a_missing_user() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let ghost = UserId::new("ghost")?;
    let tasks = service(&context);
    let task = tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Release", Utc::now() + Duration::days(1)),
        )
        .await?;

    let result = tasks
        .create_sub_task(
            &ada,
            task.id(),
            CreateSubTaskRequest::new("Tag build").with_assignee(ghost.clone()),
        )
        .await;

    assert_eq!(missing_user(&result), Some(&ghost));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn unknown_comment_author_is_a_missing_user() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let ghost = UserId::new("ghost")?;
    let task = service(&context)
        .create_task(
            &ada,
            CreateTaskRequest::new("Release", Utc::now() + Duration::days(1)),
        )
        .await?;
    let comment = Comment::new(
        ghost.clone(),
        CommentTarget::Task { task_id: task.id() },
        CommentText::new("boo")?,
        &DefaultClock,
    );

    let result = context.tasks.store_comment(&comment).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::UserNotFound(ref id)) if *id == ghost
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn unknown_team_is_reported() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let team = TeamId::new();

    let result = service(&context)
        .create_task(
            &ada,
            CreateTaskRequest::new("Orphaned", Utc::now() + Duration::days(1)).with_team(team),
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Repository(TaskRepositoryError::TeamNotFound(id))) if id == team
    ));
    Ok(())
}
