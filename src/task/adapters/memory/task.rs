//! In-memory store for tasks, subtasks, comments and tags.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Comment, CommentId, CommentTarget, SubTask, SubTaskId, Tag, TagName, Task, TaskId},
    ports::{
        CommentRepository, SubTaskRepository, TagRepository, TaskQuery, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};
use crate::user::domain::UserId;

/// Thread-safe in-memory task store.
///
/// By default any user identifier is accepted. Once users are registered
/// through [`Self::with_known_users`] or [`Self::register_user`], creators,
/// assignees and comment authors must be among them, matching the foreign
/// keys of the `PostgreSQL` schema.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    sub_tasks: HashMap<SubTaskId, SubTask>,
    comments: HashMap<CommentId, Comment>,
    tags: BTreeMap<TagName, Tag>,
    known_users: Option<HashSet<UserId>>,
}

impl InMemoryTaskState {
    fn ensure_known_users<'a>(
        &self,
        users: impl IntoIterator<Item = &'a UserId>,
    ) -> TaskRepositoryResult<()> {
        let Some(known) = &self.known_users else {
            return Ok(());
        };
        users
            .into_iter()
            .find(|user| !known.contains(*user))
            .map_or(Ok(()), |missing| {
                Err(TaskRepositoryError::UserNotFound(missing.clone()))
            })
    }

    fn ensure_task_users(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.ensure_known_users(std::iter::once(task.creator()).chain(task.assignees()))
    }

    fn remove_comments_where(&mut self, predicate: impl Fn(&Comment) -> bool) {
        self.comments.retain(|_, comment| !predicate(comment));
    }

    /// Removes `root` and every comment transitively replying to it.
    fn remove_comment_tree(&mut self, root: CommentId) {
        let mut doomed = HashSet::from([root]);
        loop {
            let before = doomed.len();
            let replies: Vec<CommentId> = self
                .comments
                .values()
                .filter(|comment| comment.parent_id().is_some_and(|p| doomed.contains(&p)))
                .map(Comment::id)
                .collect();
            doomed.extend(replies);
            if doomed.len() == before {
                break;
            }
        }
        self.comments.retain(|id, _| !doomed.contains(id));
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository that only accepts the given users.
    #[must_use]
    pub fn with_known_users(users: impl IntoIterator<Item = UserId>) -> Self {
        let state = InMemoryTaskState {
            known_users: Some(users.into_iter().collect()),
            ..InMemoryTaskState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Records `user` as stored, switching on user checks if they were off.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn register_user(&self, user: UserId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.known_users.get_or_insert_with(HashSet::new).insert(user);
        Ok(())
    }

    fn read(&self) -> TaskRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.ensure_task_users(task)?;
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.ensure_task_users(task)?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.sub_tasks.retain(|_, sub_task| sub_task.task_id() != id);
        state.remove_comments_where(|comment| comment.target().task_id() == id);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_many(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(query.apply(state.tasks.values().cloned()))
    }

    async fn promote_overdue_to_backlog(
        &self,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<TaskId>> {
        let mut state = self.write()?;
        let mut promoted: Vec<TaskId> = state
            .tasks
            .values_mut()
            .filter_map(|task| task.promote_to_backlog(now).then(|| task.id()))
            .collect();
        promoted.sort();
        Ok(promoted)
    }
}

#[async_trait]
impl SubTaskRepository for InMemoryTaskRepository {
    async fn store_sub_task(&self, sub_task: &SubTask) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&sub_task.task_id()) {
            return Err(TaskRepositoryError::NotFound(sub_task.task_id()));
        }
        if state.sub_tasks.contains_key(&sub_task.id()) {
            return Err(TaskRepositoryError::DuplicateSubTask(sub_task.id()));
        }
        state.ensure_known_users(sub_task.assignee())?;
        state.sub_tasks.insert(sub_task.id(), sub_task.clone());
        Ok(())
    }

    async fn update_sub_task(&self, sub_task: &SubTask) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.sub_tasks.contains_key(&sub_task.id()) {
            return Err(TaskRepositoryError::SubTaskNotFound(sub_task.id()));
        }
        state.ensure_known_users(sub_task.assignee())?;
        let slot = state
            .sub_tasks
            .get_mut(&sub_task.id())
            .ok_or(TaskRepositoryError::SubTaskNotFound(sub_task.id()))?;
        *slot = sub_task.clone();
        Ok(())
    }

    async fn delete_sub_task(&self, id: SubTaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.sub_tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::SubTaskNotFound(id));
        }
        state.remove_comments_where(|comment| comment.target().sub_task_id() == Some(id));
        Ok(())
    }

    async fn find_sub_task(&self, id: SubTaskId) -> TaskRepositoryResult<Option<SubTask>> {
        let state = self.read()?;
        Ok(state.sub_tasks.get(&id).cloned())
    }

    async fn find_sub_tasks(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<SubTask>> {
        let state = self.read()?;
        let mut found: Vec<SubTask> = state
            .sub_tasks
            .values()
            .filter(|sub_task| sub_task.task_id() == task_id)
            .cloned()
            .collect();
        found.sort_by_key(|sub_task| (sub_task.created_at(), sub_task.id()));
        Ok(found)
    }
}

#[async_trait]
impl CommentRepository for InMemoryTaskRepository {
    async fn store_comment(&self, comment: &Comment) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.comments.contains_key(&comment.id()) {
            return Err(TaskRepositoryError::DuplicateComment(comment.id()));
        }
        state.ensure_known_users([comment.author()])?;
        state.comments.insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.comments.contains_key(&id) {
            return Err(TaskRepositoryError::CommentNotFound(id));
        }
        state.remove_comment_tree(id);
        Ok(())
    }

    async fn find_comment(&self, id: CommentId) -> TaskRepositoryResult<Option<Comment>> {
        let state = self.read()?;
        Ok(state.comments.get(&id).cloned())
    }

    async fn find_comments(&self, target: CommentTarget) -> TaskRepositoryResult<Vec<Comment>> {
        let state = self.read()?;
        let mut found: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| comment.target() == target)
            .cloned()
            .collect();
        found.sort_by_key(|comment| (comment.created_at(), comment.id()));
        Ok(found)
    }
}

#[async_trait]
impl TagRepository for InMemoryTaskRepository {
    async fn upsert_tag(&self, tag: &Tag) -> TaskRepositoryResult<Tag> {
        let mut state = self.write()?;
        let stored = state
            .tags
            .entry(tag.name().clone())
            .or_insert_with(|| tag.clone());
        Ok(stored.clone())
    }

    async fn find_tag_by_name(&self, name: &TagName) -> TaskRepositoryResult<Option<Tag>> {
        let state = self.read()?;
        Ok(state.tags.get(name).cloned())
    }

    async fn list_tags(&self) -> TaskRepositoryResult<Vec<Tag>> {
        let state = self.read()?;
        Ok(state.tags.values().cloned().collect())
    }
}
