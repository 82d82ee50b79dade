//! In-memory task store.
//!
//! Holds tasks, epics and subtasks in three keyed tables. Subtasks point at
//! their epic by id and epics list their subtask ids; the store keeps both
//! sides in step and recomputes an epic's status whenever one of its
//! subtasks is added, updated or removed.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::history::{HistoryEntry, InMemoryHistory, ViewHistory};
use crate::model::{
    derive_epic_status, Entity, Epic, Subtask, Task, TaskId, TaskKind, UNASSIGNED_ID,
};

/// Keyed table that remembers insertion order.
#[derive(Debug, Clone)]
struct Table<T> {
    items: HashMap<TaskId, T>,
    order: Vec<TaskId>,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn contains(&self, id: TaskId) -> bool {
        self.items.contains_key(&id)
    }

    fn get(&self, id: TaskId) -> Option<&T> {
        self.items.get(&id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    /// Replacing an existing id keeps its original position.
    fn insert(&mut self, id: TaskId, item: T) {
        if self.items.insert(id, item).is_none() {
            self.order.push(id);
        }
    }

    fn remove(&mut self, id: TaskId) -> Option<T> {
        let item = self.items.remove(&id)?;
        self.order.retain(|entry| *entry != id);
        Some(item)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone)]
pub struct TaskStore<H = InMemoryHistory> {
    tasks: Table<Task>,
    epics: Table<Epic>,
    subtasks: Table<Subtask>,
    history: H,
    /// `None` once the last id has been handed out.
    next_id: Option<TaskId>,
}

impl TaskStore<InMemoryHistory> {
    /// Store with default settings: ids from 1, history of 10.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self::with_history(config, InMemoryHistory::new(config.history.max_entries))
    }
}

impl Default for TaskStore<InMemoryHistory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ViewHistory> TaskStore<H> {
    pub fn with_history(config: &Config, history: H) -> Self {
        Self {
            tasks: Table::new(),
            epics: Table::new(),
            subtasks: Table::new(),
            history,
            next_id: Some(config.ids.first.max(1)),
        }
    }

    /// Hand out a fresh id. Ids are never reissued, not even after
    /// `delete_all`, so the counter can run out.
    pub fn generate_id(&mut self) -> Result<TaskId> {
        let id = self.next_id.ok_or(Error::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.kind_of(id).is_some()
    }

    pub fn kind_of(&self, id: TaskId) -> Option<TaskKind> {
        if self.tasks.contains(id) {
            Some(TaskKind::Task)
        } else if self.subtasks.contains(id) {
            Some(TaskKind::Subtask)
        } else if self.epics.contains(id) {
            Some(TaskKind::Epic)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len() + self.epics.len() + self.subtasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a new item and return its id.
    ///
    /// An id of 0 gets a generated one. An explicit id must not be in use.
    /// Subtasks must name an epic already in the store, and are appended to
    /// it. Nothing is changed when an error is returned.
    pub fn add(&mut self, entity: impl Into<Entity>) -> Result<TaskId> {
        let mut entity = entity.into();
        let requested = entity.id();
        let explicit = requested != UNASSIGNED_ID;

        if let Entity::Subtask(subtask) = &entity {
            if explicit && requested == subtask.epic_id() {
                return Err(Error::SelfParent(requested));
            }
        }
        if explicit && self.contains(requested) {
            return Err(Error::DuplicateId(requested));
        }
        if let Entity::Subtask(subtask) = &entity {
            if !self.epics.contains(subtask.epic_id()) {
                return Err(Error::EpicNotFound(subtask.epic_id()));
            }
        }

        let id = if explicit {
            if self.next_id.is_some_and(|next| requested >= next) {
                self.next_id = requested.checked_add(1);
            }
            requested
        } else {
            self.generate_id()?
        };
        entity.task_mut().id = id;

        match entity {
            Entity::Task(task) => self.tasks.insert(id, task),
            Entity::Epic(mut epic) => {
                epic.set_subtask_ids(Vec::new());
                epic.task.status = derive_epic_status(Vec::new());
                self.epics.insert(id, epic);
            }
            Entity::Subtask(subtask) => {
                let epic_id = subtask.epic_id();
                self.subtasks.insert(id, subtask);
                if let Some(epic) = self.epics.get_mut(epic_id) {
                    epic.attach(id);
                }
                self.refresh_epic_status(epic_id);
            }
        }

        tracing::debug!(id, "added task");
        Ok(id)
    }

    /// Look an item up by id and record the view in the history.
    pub fn get_by_id(&mut self, id: TaskId) -> Option<Entity> {
        let entity = self.peek(id)?;
        self.history.record(&entity);
        Some(entity)
    }

    /// Look an item up by id without recording a view.
    pub fn peek(&self, id: TaskId) -> Option<Entity> {
        if let Some(task) = self.tasks.get(id) {
            Some(Entity::Task(task.clone()))
        } else if let Some(subtask) = self.subtasks.get(id) {
            Some(Entity::Subtask(subtask.clone()))
        } else {
            self.epics.get(id).cloned().map(Entity::Epic)
        }
    }

    /// Tasks, then epics, then subtasks, each in insertion order.
    pub fn get_all(&self) -> Vec<Entity> {
        self.tasks
            .values()
            .cloned()
            .map(Entity::Task)
            .chain(self.epics.values().cloned().map(Entity::Epic))
            .chain(self.subtasks.values().cloned().map(Entity::Subtask))
            .collect()
    }

    pub fn get_all_tasks(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    pub fn get_all_epics(&self) -> Vec<Epic> {
        self.epics.values().cloned().collect()
    }

    pub fn get_all_subtasks(&self) -> Vec<Subtask> {
        self.subtasks.values().cloned().collect()
    }

    /// Copies of an epic's subtasks in the order they were added. Unknown
    /// epics have none.
    pub fn get_subtasks_of_epic(&self, epic_id: TaskId) -> Vec<Subtask> {
        self.epics
            .get(epic_id)
            .map(|epic| {
                epic.subtask_ids()
                    .iter()
                    .filter_map(|id| self.subtasks.get(*id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Replace a stored item with the same id and kind.
    ///
    /// Epics keep their subtask list and get their status recomputed, so
    /// whatever status the caller set is overwritten. Subtasks cannot move
    /// to another epic.
    pub fn update(&mut self, entity: impl Into<Entity>) -> Result<()> {
        let entity = entity.into();
        let id = entity.id();
        let found = self.kind_of(id).ok_or(Error::TaskNotFound(id))?;
        if found != entity.kind() {
            return Err(Error::KindMismatch {
                id,
                expected: entity.kind(),
                found,
            });
        }

        match entity {
            Entity::Task(task) => self.tasks.insert(id, task),
            Entity::Epic(mut epic) => {
                let subtask_ids = self
                    .epics
                    .get(id)
                    .map(|stored| stored.subtask_ids().to_vec())
                    .unwrap_or_default();
                epic.set_subtask_ids(subtask_ids);
                self.epics.insert(id, epic);
                self.refresh_epic_status(id);
            }
            Entity::Subtask(subtask) => {
                let stored_epic = self
                    .subtasks
                    .get(id)
                    .map(Subtask::epic_id)
                    .ok_or(Error::TaskNotFound(id))?;
                if stored_epic != subtask.epic_id() {
                    return Err(Error::ParentChanged {
                        id,
                        from: stored_epic,
                        to: subtask.epic_id(),
                    });
                }
                self.subtasks.insert(id, subtask);
                self.refresh_epic_status(stored_epic);
            }
        }

        tracing::debug!(id, kind = %found, "updated task");
        Ok(())
    }

    /// Remove an item. Removing an epic removes its subtasks too. Unknown
    /// ids are ignored.
    pub fn delete_by_id(&mut self, id: TaskId) -> Option<Entity> {
        if let Some(task) = self.tasks.remove(id) {
            tracing::debug!(id, "deleted task");
            return Some(Entity::Task(task));
        }

        if let Some(subtask) = self.subtasks.remove(id) {
            let epic_id = subtask.epic_id();
            if let Some(epic) = self.epics.get_mut(epic_id) {
                epic.detach(id);
            }
            self.refresh_epic_status(epic_id);
            tracing::debug!(id, epic_id, "deleted subtask");
            return Some(Entity::Subtask(subtask));
        }

        let mut epic = self.epics.remove(id)?;
        let subtask_ids = epic.take_subtask_ids();
        for subtask_id in &subtask_ids {
            self.subtasks.remove(*subtask_id);
        }
        tracing::debug!(id, cascaded = subtask_ids.len(), "deleted epic");
        Some(Entity::Epic(epic))
    }

    /// Remove every item. The history and the id counter are kept.
    pub fn delete_all(&mut self) {
        self.tasks.clear();
        self.epics.clear();
        self.subtasks.clear();
        tracing::debug!("deleted all tasks");
    }

    /// Viewed items, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.snapshot()
    }

    pub fn history_log(&self) -> &H {
        &self.history
    }

    fn refresh_epic_status(&mut self, epic_id: TaskId) {
        let Some(epic) = self.epics.get(epic_id) else {
            return;
        };
        let status = derive_epic_status(
            epic.subtask_ids()
                .iter()
                .filter_map(|id| self.subtasks.get(*id))
                .map(Subtask::status),
        );
        if let Some(epic) = self.epics.get_mut(epic_id) {
            if epic.task.status != status {
                tracing::debug!(epic_id, from = %epic.task.status, to = %status, "epic status changed");
            }
            epic.task.status = status;
        }
    }
}
