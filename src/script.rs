//! Scripted store sessions.
//!
//! A script is a TOML file of `[[step]]` tables, each tagged with an `op`:
//!
//! ```toml
//! [[step]]
//! op = "add_epic"
//! title = "Release 1.0"
//!
//! [[step]]
//! op = "add_subtask"
//! epic = 1
//! title = "Write changelog"
//!
//! [[step]]
//! op = "update"
//! id = 2
//! status = "done"
//! ```
//!
//! Steps run in order against one store. The first failing step stops the
//! run.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::history::{HistoryEntry, ViewHistory};
use crate::model::{Entity, Epic, Status, Subtask, Task, TaskId, TaskKind, UNASSIGNED_ID};
use crate::store::TaskStore;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddTask {
        #[serde(default)]
        id: TaskId,
        title: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        status: Status,
    },
    AddEpic {
        #[serde(default)]
        id: TaskId,
        title: String,
        #[serde(default)]
        description: String,
    },
    AddSubtask {
        #[serde(default)]
        id: TaskId,
        epic: TaskId,
        title: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        status: Status,
    },
    /// Changes only the fields given. A status on an epic is ignored, with
    /// a warning in the report, since the store derives it.
    Update {
        id: TaskId,
        title: Option<String>,
        description: Option<String>,
        status: Option<Status>,
    },
    Get {
        id: TaskId,
    },
    Delete {
        id: TaskId,
    },
    DeleteAll,
    Subtasks {
        epic: TaskId,
    },
    List,
    History,
}

/// What a step did.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepOutcome {
    Added { id: TaskId },
    Updated { entity: Entity },
    Found { entity: Entity },
    NotFound { id: TaskId },
    Deleted { entity: Entity },
    Cleared,
    Subtasks { epic: TaskId, subtasks: Vec<Subtask> },
    Listed { entities: Vec<Entity> },
    History { entries: Vec<HistoryEntry> },
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Added { id } => write!(f, "added #{id}"),
            StepOutcome::Updated { entity } => write!(f, "updated {entity}"),
            StepOutcome::Found { entity } => write!(f, "found {entity}"),
            StepOutcome::NotFound { id } => write!(f, "#{id} not found"),
            StepOutcome::Deleted { entity } => write!(f, "deleted {entity}"),
            StepOutcome::Cleared => f.write_str("deleted everything"),
            StepOutcome::Subtasks { epic, subtasks } => {
                let ids: Vec<String> = subtasks.iter().map(|s| format!("#{}", s.id())).collect();
                write!(f, "epic #{epic} subtasks: [{}]", ids.join(", "))
            }
            StepOutcome::Listed { entities } => write!(f, "{} stored", entities.len()),
            StepOutcome::History { entries } => {
                let ids: Vec<String> = entries.iter().map(|e| format!("#{}", e.id)).collect();
                write!(f, "history: [{}]", ids.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub steps: Vec<StepReport>,
    /// Steps that ran but did not do everything they asked for.
    pub warnings: Vec<String>,
    pub entities: Vec<Entity>,
    pub history: Vec<HistoryEntry>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Run every step against `store`. Step numbers start at 1.
    pub fn run<H: ViewHistory>(&self, store: &mut TaskStore<H>) -> Result<ScriptReport> {
        let mut steps = Vec::with_capacity(self.steps.len());
        let mut warnings = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            let number = index + 1;
            if let Some(id) = epic_status_update(store, step) {
                tracing::warn!(step = number, id, "status update on epic ignored");
                warnings.push(format!(
                    "step {number}: status of epic #{id} is derived from its subtasks; ignored"
                ));
            }
            let outcome = apply(store, step).map_err(|source| Error::ScriptStep {
                step: number,
                source: Box::new(source),
            })?;
            tracing::debug!(step = number, %outcome, "script step done");
            steps.push(StepReport {
                step: number,
                outcome,
            });
        }

        Ok(ScriptReport {
            steps,
            warnings,
            entities: store.get_all(),
            history: store.history(),
        })
    }
}

/// Id of the epic an `update` step tries to set a status on.
fn epic_status_update<H: ViewHistory>(store: &TaskStore<H>, step: &Step) -> Option<TaskId> {
    match step {
        Step::Update {
            id,
            status: Some(_),
            ..
        } if store.kind_of(*id) == Some(TaskKind::Epic) => Some(*id),
        _ => None,
    }
}

fn apply<H: ViewHistory>(store: &mut TaskStore<H>, step: &Step) -> Result<StepOutcome> {
    match step {
        Step::AddTask {
            id,
            title,
            description,
            status,
        } => {
            let task = Task::new(title.as_str(), description.as_str(), *status).with_id(*id);
            let id = store.add(task)?;
            Ok(StepOutcome::Added { id })
        }
        Step::AddEpic {
            id,
            title,
            description,
        } => {
            let epic = Epic::new(title.as_str(), description.as_str()).with_id(*id);
            let id = store.add(epic)?;
            Ok(StepOutcome::Added { id })
        }
        Step::AddSubtask {
            id,
            epic,
            title,
            description,
            status,
        } => {
            let subtask =
                Subtask::new(title.as_str(), description.as_str(), *status, *epic).with_id(*id);
            let id = store.add(subtask)?;
            Ok(StepOutcome::Added { id })
        }
        Step::Update {
            id,
            title,
            description,
            status,
        } => {
            if *id == UNASSIGNED_ID {
                return Err(Error::InvalidArgument(
                    "update needs the id of a stored task".to_string(),
                ));
            }
            let mut entity = store.peek(*id).ok_or(Error::TaskNotFound(*id))?;
            let task = entity.task_mut();
            if let Some(title) = title {
                task.title = title.clone();
            }
            if let Some(description) = description {
                task.description = description.clone();
            }
            if let Some(status) = status {
                task.status = *status;
            }
            store.update(entity)?;
            let entity = store.peek(*id).ok_or(Error::TaskNotFound(*id))?;
            Ok(StepOutcome::Updated { entity })
        }
        Step::Get { id } => Ok(match store.get_by_id(*id) {
            Some(entity) => StepOutcome::Found { entity },
            None => StepOutcome::NotFound { id: *id },
        }),
        Step::Delete { id } => Ok(match store.delete_by_id(*id) {
            Some(entity) => StepOutcome::Deleted { entity },
            None => StepOutcome::NotFound { id: *id },
        }),
        Step::DeleteAll => {
            store.delete_all();
            Ok(StepOutcome::Cleared)
        }
        Step::Subtasks { epic } => Ok(StepOutcome::Subtasks {
            epic: *epic,
            subtasks: store.get_subtasks_of_epic(*epic),
        }),
        Step::List => Ok(StepOutcome::Listed {
            entities: store.get_all(),
        }),
        Step::History => Ok(StepOutcome::History {
            entries: store.history(),
        }),
    }
}
