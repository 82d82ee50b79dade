//! tracker - in-memory task tracking library
//!
//! This library provides the core of the tracker CLI: a store for tasks,
//! epics and subtasks with a bounded history of viewed items.
//!
//! # Core Concepts
//!
//! - **Tasks**: standalone work items with a title, description and status
//! - **Epics**: container tasks whose status is derived from their subtasks
//! - **Subtasks**: tasks bound to exactly one parent epic
//! - **View History**: the last few items looked up by id, oldest first
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.tracker.toml`
//! - `error`: Error types and result aliases
//! - `history`: Bounded view history
//! - `model`: Task, epic and subtask types
//! - `output`: Human and JSON output for commands
//! - `script`: TOML scripts of store operations
//! - `store`: The in-memory task store
//!
//! # Example
//!
//! ```
//! use tracker::model::{Epic, Status, Subtask};
//! use tracker::store::TaskStore;
//!
//! let mut store = TaskStore::new();
//! let epic = store.add(Epic::new("Release", "ship 1.0")).unwrap();
//! let sub = store
//!     .add(Subtask::new("Changelog", "", Status::Done, epic))
//!     .unwrap();
//!
//! assert_eq!(store.get_by_id(epic).unwrap().status(), Status::Done);
//! assert_eq!(store.get_subtasks_of_epic(epic)[0].id(), sub);
//! assert_eq!(store.history().len(), 1);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod output;
pub mod script;
pub mod store;

pub use error::{Error, Result};
pub use store::TaskStore;
