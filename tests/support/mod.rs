#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracker::model::{Epic, Status, Subtask, Task, TaskId};
use tracker::store::TaskStore;

/// A store holding one epic with the given subtask statuses.
pub struct Board {
    pub store: TaskStore,
    pub epic: TaskId,
    pub subtasks: Vec<TaskId>,
}

impl Board {
    pub fn with_subtasks(statuses: &[Status]) -> Self {
        let mut store = TaskStore::new();
        let epic = store.add(Epic::new("Epic", "epic under test")).expect("add epic");
        let subtasks = statuses
            .iter()
            .enumerate()
            .map(|(index, status)| {
                store
                    .add(Subtask::new(format!("Subtask {index}"), "", *status, epic))
                    .expect("add subtask")
            })
            .collect();
        Self {
            store,
            epic,
            subtasks,
        }
    }

    pub fn epic_status(&self) -> Status {
        self.store.peek(self.epic).expect("epic present").status()
    }

    pub fn set_subtask_status(&mut self, id: TaskId, status: Status) {
        let mut subtask = self
            .store
            .peek(id)
            .and_then(|entity| entity.as_subtask().cloned())
            .expect("subtask present");
        subtask.task.status = status;
        self.store.update(subtask).expect("update subtask");
    }
}

pub fn plain_task(title: &str) -> Task {
    Task::new(title, format!("{title} description"), Status::New)
}

pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}
