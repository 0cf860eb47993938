//! Tasks grouped into status lanes.

use crate::task::domain::{Task, TaskId, TaskStatus};
use serde::Serialize;

/// Task on the board, with a status change awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardCard {
    /// Last confirmed state.
    pub task: Task,
    /// Requested status not yet confirmed by the store.
    pub pending: Option<TaskStatus>,
}

impl BoardCard {
    /// Card without pending changes.
    #[must_use]
    pub const fn settled(task: Task) -> Self {
        Self {
            task,
            pending: None,
        }
    }

    /// Status the card is shown under.
    #[must_use]
    pub fn status(&self) -> TaskStatus {
        self.pending.unwrap_or_else(|| self.task.status())
    }
}

/// One lane of the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanbanLane {
    /// Lane status.
    pub status: TaskStatus,
    /// Cards ordered by deadline.
    pub cards: Vec<BoardCard>,
}

/// Board with one lane per status, in lane order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanbanBoard {
    lanes: Vec<KanbanLane>,
}

impl KanbanBoard {
    /// Groups confirmed tasks by status.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self::from_cards(tasks.into_iter().map(BoardCard::settled))
    }

    /// Groups cards by their displayed status.
    ///
    /// Every status gets a lane, empty or not. Cards within a lane are
    /// ordered by deadline, then by task identifier.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = BoardCard>) -> Self {
        let mut lanes: Vec<KanbanLane> = TaskStatus::ALL
            .into_iter()
            .map(|status| KanbanLane {
                status,
                cards: Vec::new(),
            })
            .collect();
        for card in cards {
            let status = card.status();
            if let Some(lane) = lanes.iter_mut().find(|lane| lane.status == status) {
                lane.cards.push(card);
            }
        }
        for lane in &mut lanes {
            lane.cards
                .sort_by_key(|card| (card.task.deadline(), card.task.id()));
        }
        Self { lanes }
    }

    /// Lanes in status order.
    #[must_use]
    pub fn lanes(&self) -> &[KanbanLane] {
        &self.lanes
    }

    /// Lane for `status`.
    #[must_use]
    pub fn lane(&self, status: TaskStatus) -> Option<&KanbanLane> {
        self.lanes.iter().find(|lane| lane.status == status)
    }

    /// Finds a card anywhere on the board.
    #[must_use]
    pub fn card(&self, id: TaskId) -> Option<&BoardCard> {
        self.lanes
            .iter()
            .flat_map(|lane| lane.cards.iter())
            .find(|card| card.task.id() == id)
    }

    /// Number of cards on the board.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.lanes.iter().map(|lane| lane.cards.len()).sum()
    }
}
