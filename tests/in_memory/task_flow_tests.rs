//! In-memory integration tests for the task workflow across services.

use super::helpers::{App, app, user};
use chrono::{Duration, Utc};
use rstest::rstest;
use taskboard::task::{
    domain::{TagName, TaskStatus},
    ports::{TagRepository, TaskIncludes, TaskQuery},
    services::{CreateSubTaskRequest, CreateTaskRequest, TaskLifecycleError},
};
use taskboard::team::services::CreateTeamRequest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_task_is_shared_with_assignees(app: App) -> Result<(), eyre::Report> {
    let ada = user("ada")?;
    let grace = user("grace")?;
    let team = app
        .teams
        .create_team(
            &ada,
            CreateTeamRequest::new("Platform")
                .with_members([grace.clone()])
                .with_tags(["infra".to_owned()]),
        )
        .await?;

    let task = app
        .tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Rotate certificates", Utc::now() + Duration::days(5))
                .with_team(team.id())
                .with_tags(["infra".to_owned(), "security".to_owned()]),
        )
        .await?;

    let before = app.tasks.list_tasks(&TaskQuery::visible_to(grace.clone())).await?;
    eyre::ensure!(before.is_empty(), "grace should not see an unassigned task");

    app.tasks
        .assign_users(&ada, task.id(), vec![grace.clone()])
        .await?;
    let moved = app
        .tasks
        .set_task_status(&grace, task.id(), TaskStatus::InProgress)
        .await?;
    eyre::ensure!(moved.status() == TaskStatus::InProgress, "assignee moves the task");

    let for_team = app.tasks.list_tasks(&TaskQuery::for_team(team.id())).await?;
    eyre::ensure!(for_team.len() == 1, "team listing holds the task");
    let security = app
        .store
        .find_tag_by_name(&TagName::new("security")?)
        .await?;
    eyre::ensure!(security.is_some(), "task tags are created on demand");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_removes_its_subtasks_and_comments(app: App) -> Result<(), eyre::Report> {
    let ada = user("ada")?;
    let task = app
        .tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Migrate database", Utc::now() + Duration::days(2)),
        )
        .await?;
    let sub_task = app
        .tasks
        .create_sub_task(&ada, task.id(), CreateSubTaskRequest::new("Back up"))
        .await?;
    let root = app
        .comments
        .comment_on_task(&ada, task.id(), "Scheduled for Friday")
        .await?;
    app.comments
        .reply_to_comment(&ada, root.id(), "Confirmed with ops")
        .await?;

    let details = app.tasks.get_task(&ada, task.id(), TaskIncludes::all()).await?;
    eyre::ensure!(
        details.sub_tasks.as_ref().map(Vec::len) == Some(1),
        "subtask is included"
    );
    let threads = details.comments.unwrap_or_default();
    eyre::ensure!(
        threads.first().map(|thread| thread.comment_count()) == Some(2),
        "reply is nested under its root"
    );

    app.tasks.delete_task(&ada, task.id()).await?;

    let missing = app.tasks.get_sub_task(&ada, sub_task.id()).await;
    eyre::ensure!(
        matches!(missing, Err(ref err) if err.is_not_found()),
        "subtask should be gone, got {missing:?}"
    );
    let after = app.comments.comments_on_task(&ada, task.id()).await;
    eyre::ensure!(
        matches!(after, Err(ref err) if err.is_not_found()),
        "comments should be gone with their task, got {after:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_creator_deletes_a_task(app: App) -> Result<(), eyre::Report> {
    let ada = user("ada")?;
    let grace = user("grace")?;
    let task = app
        .tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Plan offsite", Utc::now() + Duration::days(9))
                .with_assignees([grace.clone()]),
        )
        .await?;

    let result = app.tasks.delete_task(&grace, task.id()).await;

    eyre::ensure!(
        matches!(result, Err(TaskLifecycleError::NotCreator { .. })),
        "assignee must not delete, got {result:?}"
    );
    Ok(())
}
