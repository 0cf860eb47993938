//! In-memory integration tests for the dashboard read models.

use std::sync::Arc;

use super::helpers::{App, app, user};
use chrono::{Duration, Utc};
use rstest::rstest;
use taskboard::board::{BoardStats, KanbanBoard, OptimisticBoard};
use taskboard::task::{domain::TaskStatus, ports::TaskQuery, services::CreateTaskRequest};
use taskboard::timeline::{TimelineView, TimelineWindow};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_and_timeline_agree_on_lanes(app: App) -> Result<(), eyre::Report> {
    let ada = user("ada")?;
    let now = Utc::now();
    let first = app
        .tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Draft agenda", now + Duration::days(2)),
        )
        .await?;
    let second = app
        .tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Book venue", now + Duration::days(4)),
        )
        .await?;
    app.tasks
        .set_task_status(&ada, second.id(), TaskStatus::Completed)
        .await?;

    let tasks = app.tasks.list_tasks(&TaskQuery::visible_to(ada)).await?;
    let board = KanbanBoard::from_tasks(tasks.clone());
    let view = TimelineView::build(&tasks, TimelineWindow::starting(now.date_naive()))?;
    let stats = BoardStats::compute(&tasks, now);

    eyre::ensure!(board.card_count() == 2, "both tasks are on the board");
    eyre::ensure!(
        board.card(first.id()).map(|card| card.status()) == Some(TaskStatus::Todo),
        "first task stays in TODO"
    );
    let completed = view
        .lane(TaskStatus::Completed)
        .ok_or_else(|| eyre::eyre!("completed lane should exist"))?;
    eyre::ensure!(
        completed.layout.placement(&second.id()).is_some(),
        "completed task has a bar in its lane"
    );
    eyre::ensure!(
        stats
            == BoardStats {
                total: 2,
                completed: 1,
                upcoming: 1,
                overdue: 0,
                progress_percent: 50,
            },
        "unexpected stats {stats:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn optimistic_board_reflects_committed_moves(app: App) -> Result<(), eyre::Report> {
    let ada = user("ada")?;
    let task = app
        .tasks
        .create_task(
            &ada,
            CreateTaskRequest::new("Review budget", Utc::now() + Duration::days(3)),
        )
        .await?;
    let board = OptimisticBoard::load(
        Arc::clone(&app.tasks),
        ada.clone(),
        TaskQuery::visible_to(ada),
    )
    .await?;

    let skipped = board.move_task(task.id(), TaskStatus::InReview).await;
    eyre::ensure!(skipped.is_err(), "TODO cannot jump straight to review");
    board.move_task(task.id(), TaskStatus::InProgress).await?;
    board.move_task(task.id(), TaskStatus::InReview).await?;

    let snapshot = board.snapshot();
    eyre::ensure!(
        snapshot.card(task.id()).map(|card| card.status()) == Some(TaskStatus::InReview),
        "card lands in review"
    );
    eyre::ensure!(board.pending_count() == 0, "no move is left pending");
    Ok(())
}
