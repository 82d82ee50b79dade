//! Work item model: tasks, epics and subtasks.
//!
//! Identity is the numeric id alone. Two items with the same id compare
//! equal whatever their titles or statuses say.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type TaskId = u64;

/// Reserved id meaning "let the store assign one". Never issued.
pub const UNASSIGNED_ID: TaskId = 0;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    #[serde(alias = "new")]
    New,
    #[serde(alias = "in_progress", alias = "in-progress")]
    InProgress,
    #[serde(alias = "done")]
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "NEW",
            Status::InProgress => "IN_PROGRESS",
            Status::Done => "DONE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "NEW" => Ok(Status::New),
            "IN_PROGRESS" => Ok(Status::InProgress),
            "DONE" => Ok(Status::Done),
            _ => Err(Error::InvalidArgument(format!(
                "unknown status '{value}' (expected new, in_progress or done)"
            ))),
        }
    }
}

/// Kind tag the store dispatches on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Task,
    Epic,
    Subtask,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Task => "task",
            TaskKind::Epic => "epic",
            TaskKind::Subtask => "subtask",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: Status,
}

impl Task {
    pub fn new(title: impl Into<String>, description: impl Into<String>, status: Status) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: title.into(),
            description: description.into(),
            status,
        }
    }

    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [{}] {}", self.id, self.status, self.title)
    }
}

/// Container task. Its status follows its subtasks and is recomputed by the
/// store on every subtask change.
#[derive(Debug, Clone, Serialize)]
pub struct Epic {
    #[serde(flatten)]
    pub task: Task,
    subtask_ids: Vec<TaskId>,
}

impl Epic {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task: Task::new(title, description, Status::New),
            subtask_ids: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: TaskId) -> Self {
        self.task.id = id;
        self
    }

    pub fn id(&self) -> TaskId {
        self.task.id
    }

    pub fn status(&self) -> Status {
        self.task.status
    }

    /// Ids of the subtasks this epic owns, in the order they were added.
    pub fn subtask_ids(&self) -> &[TaskId] {
        &self.subtask_ids
    }

    pub(crate) fn attach(&mut self, subtask_id: TaskId) {
        if !self.subtask_ids.contains(&subtask_id) {
            self.subtask_ids.push(subtask_id);
        }
    }

    pub(crate) fn detach(&mut self, subtask_id: TaskId) {
        self.subtask_ids.retain(|id| *id != subtask_id);
    }

    pub(crate) fn take_subtask_ids(&mut self) -> Vec<TaskId> {
        std::mem::take(&mut self.subtask_ids)
    }

    pub(crate) fn set_subtask_ids(&mut self, ids: Vec<TaskId>) {
        self.subtask_ids = ids;
    }
}

impl PartialEq for Epic {
    fn eq(&self, other: &Self) -> bool {
        self.task == other.task
    }
}

impl Eq for Epic {}

/// Task bound to one parent epic for its whole life.
#[derive(Debug, Clone, Serialize)]
pub struct Subtask {
    #[serde(flatten)]
    pub task: Task,
    epic_id: TaskId,
}

impl Subtask {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: Status,
        epic_id: TaskId,
    ) -> Self {
        Self {
            task: Task::new(title, description, status),
            epic_id,
        }
    }

    pub fn with_id(mut self, id: TaskId) -> Self {
        self.task.id = id;
        self
    }

    pub fn id(&self) -> TaskId {
        self.task.id
    }

    pub fn status(&self) -> Status {
        self.task.status
    }

    pub fn epic_id(&self) -> TaskId {
        self.epic_id
    }
}

impl PartialEq for Subtask {
    fn eq(&self, other: &Self) -> bool {
        self.task == other.task
    }
}

impl Eq for Subtask {}

/// Any stored work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Task(Task),
    Epic(Epic),
    Subtask(Subtask),
}

impl Entity {
    pub fn kind(&self) -> TaskKind {
        match self {
            Entity::Task(_) => TaskKind::Task,
            Entity::Epic(_) => TaskKind::Epic,
            Entity::Subtask(_) => TaskKind::Subtask,
        }
    }

    pub fn task(&self) -> &Task {
        match self {
            Entity::Task(task) => task,
            Entity::Epic(epic) => &epic.task,
            Entity::Subtask(subtask) => &subtask.task,
        }
    }

    pub fn task_mut(&mut self) -> &mut Task {
        match self {
            Entity::Task(task) => task,
            Entity::Epic(epic) => &mut epic.task,
            Entity::Subtask(subtask) => &mut subtask.task,
        }
    }

    pub fn id(&self) -> TaskId {
        self.task().id
    }

    pub fn status(&self) -> Status {
        self.task().status
    }

    pub fn as_epic(&self) -> Option<&Epic> {
        match self {
            Entity::Epic(epic) => Some(epic),
            _ => None,
        }
    }

    pub fn as_subtask(&self) -> Option<&Subtask> {
        match self {
            Entity::Subtask(subtask) => Some(subtask),
            _ => None,
        }
    }
}

impl From<Task> for Entity {
    fn from(task: Task) -> Self {
        Entity::Task(task)
    }
}

impl From<Epic> for Entity {
    fn from(epic: Epic) -> Self {
        Entity::Epic(epic)
    }
}

impl From<Subtask> for Entity {
    fn from(subtask: Subtask) -> Self {
        Entity::Subtask(subtask)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Task(task) => write!(f, "task {task}"),
            Entity::Epic(epic) => write!(
                f,
                "epic {} ({} subtasks)",
                epic.task,
                epic.subtask_ids.len()
            ),
            Entity::Subtask(subtask) => {
                write!(f, "subtask {} (epic #{})", subtask.task, subtask.epic_id)
            }
        }
    }
}

/// Epic status for the given subtask statuses: NEW when empty or all new,
/// DONE when all done, IN_PROGRESS otherwise.
pub fn derive_epic_status<I>(statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    let mut all_new = true;
    let mut all_done = true;
    for status in statuses {
        if status != Status::New {
            all_new = false;
        }
        if status != Status::Done {
            all_done = false;
        }
        if !all_new && !all_done {
            return Status::InProgress;
        }
    }
    if all_new {
        Status::New
    } else if all_done {
        Status::Done
    } else {
        Status::InProgress
    }
}
