//! `PostgreSQL` integration tests for teams.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::TagName,
    ports::TaskQuery,
    services::{CreateTaskRequest, TaskLifecycleService},
};
use taskboard::team::{
    adapters::postgres::PostgresTeamRepository,
    ports::{TeamRepository, TeamRepositoryError},
    services::{CreateTeamRequest, TeamService, TeamServiceError},
};
use taskboard::user::domain::UserId;

use crate::postgres::helpers::{BoxError, PgContext, context, seed_user};

type Teams = TeamService<PostgresTeamRepository, PostgresTaskRepository, DefaultClock>;

fn teams(context: &PgContext) -> Teams {
    TeamService::new(
        Arc::clone(&context.teams),
        Arc::clone(&context.tasks),
        Arc::new(DefaultClock),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn team_members_and_tags_survive_a_round_trip() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let grace = seed_user(&context, "grace").await?;
    let service = teams(&context);

    let created = service
        .create_team(
            &ada,
            CreateTeamRequest::new("Platform")
                .with_description("Keeps the lights on")
                .with_members([grace.clone()])
                .with_tags(["ops".to_owned()]),
        )
        .await?;

    let stored = context
        .teams
        .find_by_id(created.id())
        .await?
        .ok_or("team should be stored")?;
    assert_eq!(stored.name(), created.name());
    assert_eq!(stored.description(), Some("Keeps the lights on"));
    assert_eq!(stored.members(), created.members());
    assert!(stored.has_member(&grace));
    assert!(stored.tags().contains(&TagName::new("ops")?));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn membership_listing_is_ordered_by_name() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let grace = seed_user(&context, "grace").await?;
    let service = teams(&context);

    service
        .create_team(&ada, CreateTeamRequest::new("Zeta"))
        .await?;
    service
        .create_team(&ada, CreateTeamRequest::new("Alpha"))
        .await?;
    service
        .create_team(&grace, CreateTeamRequest::new("Elsewhere"))
        .await?;

    let names: Vec<String> = service
        .teams_for(&ada)
        .await?
        .iter()
        .map(|team| team.name().as_str().to_owned())
        .collect();
    assert_eq!(names, ["Alpha", "Zeta"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn added_members_and_archive_flag_are_persisted() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let grace = seed_user(&context, "grace").await?;
    let service = teams(&context);
    let team = service
        .create_team(&ada, CreateTeamRequest::new("Research"))
        .await?;

    service.add_members(&ada, team.id(), [grace.clone()]).await?;
    service.archive_team(&ada, team.id()).await?;

    let stored = context
        .teams
        .find_by_id(team.id())
        .await?
        .ok_or("team should be stored")?;
    assert!(stored.has_member(&grace));
    assert!(stored.is_archived());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn unknown_member_is_a_missing_user() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let ghost = UserId::new("ghost")?;

    let result = teams(&context)
        .create_team(
            &ada,
            CreateTeamRequest::new("Haunted").with_members([ghost.clone()]),
        )
        .await;

    assert!(matches!(
        result,
        Err(TeamServiceError::Repository(TeamRepositoryError::UserNotFound(ref id))) if *id == ghost
    ));
    assert!(context.teams.find_by_member(&ada).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn tasks_filter_by_stored_team() -> Result<(), BoxError> {
    let context = context()?;
    let ada = seed_user(&context, "ada").await?;
    let team = teams(&context)
        .create_team(&ada, CreateTeamRequest::new("Platform"))
        .await?;
    let tasks = TaskLifecycleService::new(Arc::clone(&context.tasks), Arc::new(DefaultClock));
    let deadline = Utc::now() + Duration::days(2);

    let owned = tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Rotate keys", deadline).with_team(team.id()),
        )
        .await?;
    tasks
        .create_task(&ada, CreateTaskRequest::new("Personal", deadline))
        .await?;

    let found = tasks.list_tasks(&TaskQuery::for_team(team.id())).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found.first().map(|task| task.id()), Some(owned.id()));
    Ok(())
}
