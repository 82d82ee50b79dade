//! Error types for tracker
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad ids, broken parent links, bad config)
//! - 4: Operation failed (io, serialization)

use thiserror::Error;

use crate::model::{TaskId, TaskKind};

/// Exit codes for the tracker CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tracker operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Task with id {0} already exists")]
    DuplicateId(TaskId),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Epic not found: {0}")]
    EpicNotFound(TaskId),

    #[error("Subtask {0} cannot be its own epic")]
    SelfParent(TaskId),

    #[error("Subtask {id} belongs to epic {from}, cannot move it to epic {to}")]
    ParentChanged { id: TaskId, from: TaskId, to: TaskId },

    #[error("Task {id} is a {found}, not a {expected}")]
    KindMismatch {
        id: TaskId,
        expected: TaskKind,
        found: TaskKind,
    },

    #[error("No ids left to assign")]
    IdsExhausted,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Step {step} failed: {source}")]
    ScriptStep {
        step: usize,
        #[source]
        source: Box<Error>,
    },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ScriptStep { source, .. } => source.exit_code(),

            Error::DuplicateId(_)
            | Error::TaskNotFound(_)
            | Error::EpicNotFound(_)
            | Error::SelfParent(_)
            | Error::ParentChanged { .. }
            | Error::KindMismatch { .. }
            | Error::IdsExhausted
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured fields for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        use serde_json::json;

        match self {
            Error::DuplicateId(id)
            | Error::TaskNotFound(id)
            | Error::EpicNotFound(id)
            | Error::SelfParent(id) => Some(json!({ "id": id })),
            Error::ParentChanged { id, from, to } => {
                Some(json!({ "id": id, "from": from, "to": to }))
            }
            Error::KindMismatch {
                id,
                expected,
                found,
            } => Some(json!({ "id": id, "expected": expected, "found": found })),
            Error::InvalidConfig(message) | Error::InvalidArgument(message) => {
                Some(json!({ "message": message }))
            }
            Error::ScriptStep { step, source } => Some(json!({
                "step": step,
                "cause": source.to_string(),
                "cause_details": source.details(),
            })),
            _ => None,
        }
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
