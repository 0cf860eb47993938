//! Shared helpers for unit tests.

use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Comment, CommentId, CommentTarget, SubTask, SubTaskId, Tag, TagName, Task, TaskId},
    ports::{
        CommentRepository, SubTaskRepository, TagRepository, TaskQuery, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Clock frozen at a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self
            .now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self
            .now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Midnight UTC on 2025-03-10 plus `days`.
pub fn day(days: i64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2025, 3, 10, 0, 0, 0)
        .single()
        .unwrap_or_default();
    base + Duration::days(days)
}

/// Task store that can be switched to fail every task update.
#[derive(Debug, Default)]
pub struct FlakyTaskStore {
    inner: InMemoryTaskRepository,
    fail_updates: AtomicBool,
}

impl FlakyTaskStore {
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Direct access to the backing store, bypassing the failure switch.
    pub const fn inner(&self) -> &InMemoryTaskRepository {
        &self.inner
    }
}

#[derive(Debug, thiserror::Error)]
#[error("injected update failure")]
struct InjectedFailure;

#[async_trait]
impl TaskRepository for FlakyTaskStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.inner.store(task).await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(TaskRepositoryError::persistence(InjectedFailure));
        }
        self.inner.update(task).await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.inner.delete(id).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn find_many(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.find_many(query).await
    }

    async fn promote_overdue_to_backlog(
        &self,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<TaskId>> {
        self.inner.promote_overdue_to_backlog(now).await
    }
}

#[async_trait]
impl SubTaskRepository for FlakyTaskStore {
    async fn store_sub_task(&self, sub_task: &SubTask) -> TaskRepositoryResult<()> {
        self.inner.store_sub_task(sub_task).await
    }

    async fn update_sub_task(&self, sub_task: &SubTask) -> TaskRepositoryResult<()> {
        self.inner.update_sub_task(sub_task).await
    }

    async fn delete_sub_task(&self, id: SubTaskId) -> TaskRepositoryResult<()> {
        self.inner.delete_sub_task(id).await
    }

    async fn find_sub_task(&self, id: SubTaskId) -> TaskRepositoryResult<Option<SubTask>> {
        self.inner.find_sub_task(id).await
    }

    async fn find_sub_tasks(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<SubTask>> {
        self.inner.find_sub_tasks(task_id).await
    }
}

#[async_trait]
impl CommentRepository for FlakyTaskStore {
    async fn store_comment(&self, comment: &Comment) -> TaskRepositoryResult<()> {
        self.inner.store_comment(comment).await
    }

    async fn delete_comment(&self, id: CommentId) -> TaskRepositoryResult<()> {
        self.inner.delete_comment(id).await
    }

    async fn find_comment(&self, id: CommentId) -> TaskRepositoryResult<Option<Comment>> {
        self.inner.find_comment(id).await
    }

    async fn find_comments(&self, target: CommentTarget) -> TaskRepositoryResult<Vec<Comment>> {
        self.inner.find_comments(target).await
    }
}

#[async_trait]
impl TagRepository for FlakyTaskStore {
    async fn upsert_tag(&self, tag: &Tag) -> TaskRepositoryResult<Tag> {
        self.inner.upsert_tag(tag).await
    }

    async fn find_tag_by_name(&self, name: &TagName) -> TaskRepositoryResult<Option<Tag>> {
        self.inner.find_tag_by_name(name).await
    }

    async fn list_tags(&self) -> TaskRepositoryResult<Vec<Tag>> {
        self.inner.list_tags().await
    }
}
