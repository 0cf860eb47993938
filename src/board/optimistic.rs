//! Board cache applying status moves before the store confirms them.

use super::{BoardCard, KanbanBoard};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskQuery, TaskStore},
    services::{TaskLifecycleResult, TaskLifecycleService},
};
use crate::user::domain::UserId;
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct CacheEntry {
    committed: Task,
    pending: Option<TaskStatus>,
}

/// Client-side board cache with explicit `{committed, pending}` entries.
///
/// A move is shown immediately as pending. Success commits the task the
/// store returned; failure discards the pending state and reloads the whole
/// board from the store. The cache lock is never held across an await.
pub struct OptimisticBoard<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    service: Arc<TaskLifecycleService<R, C>>,
    actor: UserId,
    query: TaskQuery,
    entries: Mutex<BTreeMap<TaskId, CacheEntry>>,
}

impl<R, C> OptimisticBoard<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Loads the board for `actor` from the tasks matching `query`.
    ///
    /// # Errors
    ///
    /// Returns the listing error.
    pub async fn load(
        service: Arc<TaskLifecycleService<R, C>>,
        actor: UserId,
        query: TaskQuery,
    ) -> TaskLifecycleResult<Self> {
        let board = Self {
            service,
            actor,
            query,
            entries: Mutex::new(BTreeMap::new()),
        };
        board.refresh().await?;
        Ok(board)
    }

    /// Replaces the cache with the store's current state.
    ///
    /// # Errors
    ///
    /// Returns the listing error; the cache is left unchanged.
    pub async fn refresh(&self) -> TaskLifecycleResult<()> {
        let tasks = self.service.list_tasks(&self.query).await?;
        let fresh = tasks
            .into_iter()
            .map(|task| {
                (
                    task.id(),
                    CacheEntry {
                        committed: task,
                        pending: None,
                    },
                )
            })
            .collect();
        *self.lock() = fresh;
        Ok(())
    }

    /// Moves a card to `target`, showing the move until the store answers.
    ///
    /// # Errors
    ///
    /// Returns the service error after rolling the cache back by reloading
    /// it. A failed reload is logged and the original error still returned.
    pub async fn move_task(&self, id: TaskId, target: TaskStatus) -> TaskLifecycleResult<Task> {
        if let Some(entry) = self.lock().get_mut(&id) {
            entry.pending = Some(target);
        }

        match self.service.set_task_status(&self.actor, id, target).await {
            Ok(task) => {
                self.lock().insert(
                    id,
                    CacheEntry {
                        committed: task.clone(),
                        pending: None,
                    },
                );
                debug!(task_id = %id, status = %target, "board move committed");
                Ok(task)
            }
            Err(err) => {
                if let Some(entry) = self.lock().get_mut(&id) {
                    entry.pending = None;
                }
                warn!(task_id = %id, error = %err, "board move failed; reloading");
                if let Err(reload) = self.refresh().await {
                    warn!(error = %reload, "board reload failed");
                }
                Err(err)
            }
        }
    }

    /// Current board, pending moves included.
    #[must_use]
    pub fn snapshot(&self) -> KanbanBoard {
        let cards: Vec<BoardCard> = self
            .lock()
            .values()
            .map(|entry| BoardCard {
                task: entry.committed.clone(),
                pending: entry.pending,
            })
            .collect();
        KanbanBoard::from_cards(cards)
    }

    /// Number of moves awaiting confirmation.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock()
            .values()
            .filter(|entry| entry.pending.is_some())
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<TaskId, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
