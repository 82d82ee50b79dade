mod support;

use support::plain_task;
use tracker::config::Config;
use tracker::history::{HistoryEntry, InMemoryHistory, ViewHistory};
use tracker::model::{Entity, Epic, Status, Subtask, TaskKind};
use tracker::store::TaskStore;

#[test]
fn eleven_views_evict_the_first() {
    let mut store = TaskStore::new();
    let ids: Vec<_> = (0..11)
        .map(|n| store.add(plain_task(&format!("task {n}"))).unwrap())
        .collect();

    for id in &ids {
        store.get_by_id(*id).expect("present");
    }

    let history: Vec<_> = store.history().iter().map(|entry| entry.id).collect();
    assert_eq!(history.len(), 10);
    assert!(!history.contains(&ids[0]));
    assert_eq!(history, ids[1..].to_vec());
}

#[test]
fn recorded_entry_ignores_later_mutation() {
    let mut store = TaskStore::new();
    let id = store.add(plain_task("before")).unwrap();

    let mut viewed = store.get_by_id(id).unwrap();
    viewed.task_mut().title = "after".to_string();
    viewed.task_mut().status = Status::Done;
    store.update(viewed).unwrap();

    let history = store.history();
    let entry = &history[0];
    assert_eq!(entry.title, "before");
    assert_eq!(entry.status, Status::New);
    assert_eq!(store.peek(id).unwrap().task().title, "after");
}

#[test]
fn misses_leave_no_trace() {
    let mut store = TaskStore::new();
    assert!(store.get_by_id(1).is_none());
    assert!(store.history().is_empty());
}

#[test]
fn entries_remember_kind() {
    let mut store = TaskStore::new();
    let epic = store.add(Epic::new("epic", "")).unwrap();
    let sub = store
        .add(Subtask::new("sub", "", Status::InProgress, epic))
        .unwrap();

    store.get_by_id(sub);
    store.get_by_id(epic);

    let kinds: Vec<_> = store.history().iter().map(|entry| entry.kind).collect();
    assert_eq!(kinds, vec![TaskKind::Subtask, TaskKind::Epic]);
    assert_eq!(store.history()[1].status, Status::InProgress);
}

#[test]
fn capacity_comes_from_config() {
    let mut config = Config::default();
    config.history.max_entries = 2;
    let mut store = TaskStore::with_config(&config);
    let ids: Vec<_> = (0..3)
        .map(|n| store.add(plain_task(&format!("t{n}"))).unwrap())
        .collect();
    for id in &ids {
        store.get_by_id(*id);
    }

    assert_eq!(store.history_log().capacity(), 2);
    let history: Vec<_> = store.history().iter().map(|entry| entry.id).collect();
    assert_eq!(history, vec![ids[1], ids[2]]);
}

/// History that keeps only ids, to check the store works with any log.
#[derive(Default)]
struct IdsOnly(Vec<u64>);

impl ViewHistory for IdsOnly {
    fn record(&mut self, entity: &Entity) {
        self.0.push(entity.id());
    }

    fn snapshot(&self) -> Vec<HistoryEntry> {
        Vec::new()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[test]
fn store_accepts_custom_history() {
    let mut store = TaskStore::with_history(&Config::default(), IdsOnly::default());
    let id = store.add(plain_task("custom")).unwrap();
    store.get_by_id(id);
    store.get_by_id(id);

    assert_eq!(store.history_log().0, vec![id, id]);
    assert!(!store.history_log().is_empty());
}

#[test]
fn default_history_holds_ten() {
    let history = InMemoryHistory::default();
    assert_eq!(history.capacity(), 10);
    assert!(history.is_empty());
}
