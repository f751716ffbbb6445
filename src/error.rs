//! Error types for store and board operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the store and the commands built on it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No task with this id exists in the document.
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// The task exists but has no subtask with this id.
    #[error("subtask {subtask_id} not found on task {task_id}")]
    SubtaskNotFound { task_id: String, subtask_id: String },

    #[error("project not found: {id}")]
    ProjectNotFound { id: String },

    #[error("category not found: {id}")]
    CategoryNotFound { id: String },

    /// A name that is empty once trimmed.
    #[error("{what} name cannot be empty")]
    InvalidName { what: &'static str },

    #[error("could not understand date '{input}' (use YYYY-MM-DD, today, tomorrow or in Nd)")]
    InvalidDate { input: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The board UI could not drive the terminal.
    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("malformed store document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::TaskNotFound { id: id.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
