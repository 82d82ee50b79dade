//! tracker demo command implementation
//!
//! Builds a small board (one epic with two subtasks, two plain tasks),
//! then views, updates and deletes items, reporting the view history after
//! each step.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::history::ViewHistory;
use crate::model::{Entity, Epic, Status, Subtask, Task, TaskId};
use crate::output::{emit_success, CommandOutput, OutputOptions};
use crate::store::TaskStore;

#[derive(serde::Serialize)]
struct DemoStep {
    action: String,
    history: Vec<TaskId>,
}

#[derive(serde::Serialize)]
struct DemoReport {
    steps: Vec<DemoStep>,
    entities: Vec<Entity>,
    epic_subtasks: Vec<Subtask>,
}

pub fn run(config: &Config, options: OutputOptions) -> Result<()> {
    let mut store = TaskStore::with_config(config);
    let mut steps = Vec::new();

    let epic_id = store.add(Epic::new("Epic 1", "Epic 1 description"))?;
    let first = store.add(Subtask::new(
        "Subtask 1",
        "Subtask 1 description",
        Status::New,
        epic_id,
    ))?;
    let second = store.add(Subtask::new(
        "Subtask 2",
        "Subtask 2 description",
        Status::New,
        epic_id,
    ))?;
    record(
        &mut steps,
        &store,
        format!("added epic #{epic_id} with subtasks #{first}, #{second}"),
    );

    let task_one = store.add(Task::new("Task 1", "Task 1 description", Status::New))?;
    let task_two = store.add(Task::new("Task 2", "Task 2 description", Status::New))?;
    record(
        &mut steps,
        &store,
        format!("added tasks #{task_one}, #{task_two}"),
    );

    let viewed = store
        .get_by_id(task_one)
        .ok_or(Error::TaskNotFound(task_one))?;
    record(&mut steps, &store, format!("viewed {viewed}"));

    let mut updated = viewed;
    updated.task_mut().status = Status::Done;
    store.update(updated)?;
    record(&mut steps, &store, format!("marked task #{task_one} DONE"));

    store.delete_by_id(task_two);
    record(&mut steps, &store, format!("deleted task #{task_two}"));

    let entities = store.get_all();
    record(
        &mut steps,
        &store,
        format!("listed {} items", entities.len()),
    );

    let epic_subtasks = store.get_subtasks_of_epic(epic_id);
    record(
        &mut steps,
        &store,
        format!("listed {} subtasks of epic #{epic_id}", epic_subtasks.len()),
    );

    let mut output = CommandOutput::new("tracker demo");
    output.field("stored", entities.len());
    output.field("history", store.history_log().len());
    for step in &steps {
        let ids: Vec<String> = step.history.iter().map(|id| format!("#{id}")).collect();
        output.line(format!("{} (history: [{}])", step.action, ids.join(", ")));
    }
    for entity in &entities {
        output.line(entity.to_string());
    }

    let report = DemoReport {
        steps,
        entities,
        epic_subtasks,
    };
    emit_success(options, "demo", &report, &output)
}

fn record<H: ViewHistory>(steps: &mut Vec<DemoStep>, store: &TaskStore<H>, action: String) {
    tracing::info!(%action, "demo step");
    steps.push(DemoStep {
        action,
        history: store.history().iter().map(|entry| entry.id).collect(),
    });
}
