//! View history.
//!
//! Every successful lookup by id leaves a copy of the item here. The log is
//! a bounded FIFO: once full, recording drops the oldest entry first.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Entity, Status, TaskId, TaskKind};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Copy of an item taken when it was viewed. Detached from the live item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: TaskId,
    pub kind: TaskKind,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub viewed_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn capture(entity: &Entity) -> Self {
        let task = entity.task();
        Self {
            id: task.id,
            kind: entity.kind(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            viewed_at: Utc::now(),
        }
    }
}

/// Storage for viewed items.
pub trait ViewHistory {
    fn record(&mut self, entity: &Entity);

    /// Oldest first.
    fn snapshot(&self) -> Vec<HistoryEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl InMemoryHistory {
    /// A zero capacity is treated as one; config validation rejects zero
    /// before it gets here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl ViewHistory for InMemoryHistory {
    fn record(&mut self, entity: &Entity) {
        while self.entries.len() >= self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::trace!(id = evicted.id, "history full, evicting oldest entry");
            }
        }
        self.entries.push_back(HistoryEntry::capture(entity));
    }

    fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    fn task(id: TaskId) -> Entity {
        Entity::Task(Task::new(format!("task {id}"), "", Status::New).with_id(id))
    }

    #[test]
    fn record_appends_in_order() {
        let mut history = InMemoryHistory::default();
        history.record(&task(1));
        history.record(&task(2));
        let ids: Vec<_> = history.snapshot().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut history = InMemoryHistory::new(3);
        for id in 1..=5 {
            history.record(&task(id));
        }
        let ids: Vec<_> = history.snapshot().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let mut history = InMemoryHistory::new(0);
        history.record(&task(1));
        history.record(&task(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.snapshot()[0].id, 2);
    }

    #[test]
    fn repeated_views_are_all_kept() {
        let mut history = InMemoryHistory::default();
        history.record(&task(1));
        history.record(&task(1));
        assert_eq!(history.len(), 2);
    }
}
