//! Unknown creators, assignees and authors are reported as missing users.

use std::sync::Arc;

use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Comment, CommentTarget, CommentText},
    ports::{CommentRepository, TaskQuery, TaskRepository, TaskRepositoryError},
    services::{CreateSubTaskRequest, CreateTaskRequest, TaskLifecycleError, TaskLifecycleService},
};
use crate::test_support::{FixedClock, day};
use crate::user::domain::UserId;
use rstest::{fixture, rstest};

struct Harness {
    repository: Arc<InMemoryTaskRepository>,
    clock: Arc<FixedClock>,
    service: TaskLifecycleService<InMemoryTaskRepository, FixedClock>,
}

fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryTaskRepository::with_known_users([
        user("ada"),
        user("grace"),
    ]));
    let clock = Arc::new(FixedClock::at(day(0)));
    let service = TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock));
    Harness {
        repository,
        clock,
        service,
    }
}

fn missing_user<T>(result: &Result<T, TaskLifecycleError>) -> Option<&UserId> {
    match result {
        Err(TaskLifecycleError::Repository(TaskRepositoryError::UserNotFound(id))) => Some(id),
        _ => None,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_creator_is_rejected(harness: Harness) {
    let result = harness
        .service
        .create_task(&user("ghost"), CreateTaskRequest::new("Haunt", day(1)))
        .await;

    assert_eq!(missing_user(&result), Some(&user("ghost")));
    assert!(result.as_ref().is_err_and(TaskLifecycleError::is_not_found));
    let stored = harness
        .repository
        .find_many(&TaskQuery::default())
        .await
        .expect("listing should succeed");
    assert!(stored.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_assignee_on_create_is_rejected(harness: Harness) {
    let request = CreateTaskRequest::new("Review", day(1)).with_assignees([user("ghost")]);

    let result = harness.service.create_task(&user("ada"), request).await;

    assert_eq!(missing_user(&result), Some(&user("ghost")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_assignee_is_not_added_to_existing_task(harness: Harness) {
    let task = harness
        .service
        .create_task(&user("ada"), CreateTaskRequest::new("Review", day(1)))
        .await
        .expect("task creation should succeed");

    let result = harness
        .service
        .assign_users(&user("ada"), task.id(), vec![user("grace"), user("ghost")])
        .await;

    assert_eq!(missing_user(&result), Some(&user("ghost")));
    let stored = harness
        .repository
        .find_by_id(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should still exist");
    assert!(stored.assignees().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_sub_task_assignee_is_rejected(harness: Harness) {
    let task = harness
        .service
        .create_task(&user("ada"), CreateTaskRequest::new("Release", day(3)))
        .await
        .expect("task creation should succeed");

    let result = harness
        .service
        .create_sub_task(
            &user("ada"),
            task.id(),
            CreateSubTaskRequest::new("Tag build").with_assignee(user("ghost")),
        )
        .await;

    assert_eq!(missing_user(&result), Some(&user("ghost")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_comment_author_is_rejected(harness: Harness) {
    let task = harness
        .service
        .create_task(&user("ada"), CreateTaskRequest::new("Release", day(3)))
        .await
        .expect("task creation should succeed");
    let comment = Comment::new(
        user("ghost"),
        CommentTarget::Task { task_id: task.id() },
        CommentText::new("boo").expect("valid text"),
        &*harness.clock,
    );

    let result = harness.repository.store_comment(&comment).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::UserNotFound(ref id)) if *id == user("ghost")
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_user_becomes_assignable(harness: Harness) {
    harness
        .repository
        .register_user(user("linus"))
        .expect("registration should succeed");

    let created = harness
        .service
        .create_task(
            &user("ada"),
            CreateTaskRequest::new("Merge", day(2)).with_assignees([user("linus")]),
        )
        .await
        .expect("task creation should succeed");

    assert!(created.assignees().contains(&user("linus")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unrestricted_store_accepts_any_user() {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let service =
        TaskLifecycleService::new(Arc::clone(&repository), Arc::new(FixedClock::at(day(0))));

    let created = service
        .create_task(
            &user("anyone"),
            CreateTaskRequest::new("Free", day(1)).with_assignees([user("someone")]),
        )
        .await;

    assert!(created.is_ok());
}
