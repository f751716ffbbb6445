//! Task data structures.
//!
//! A `Task` belongs to one project, sits in one status column and carries
//! its own subtasks and embedded category snapshots. Ordering inside a column
//! is given by `rank`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::fields::Status;

/// Person a task can be assigned to. Stored inline on the task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
}

impl User {
    /// Build an assignee from a free-text name.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        User {
            id: format!("user-{}", crate::ids::slugify(name)),
            name: name.to_string(),
            avatar_url: format!(
                "https://placehold.co/32x32?text={}",
                urlencoding::encode(&name.chars().next().map(String::from).unwrap_or_default())
            ),
        }
    }
}

/// A checklist item owned by exactly one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(text: &str) -> Self {
        Subtask {
            id: crate::ids::subtask_id(),
            text: text.trim().to_string(),
            completed: false,
        }
    }
}

/// A unit of work on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Empty for records written before tasks belonged to a project.
    #[serde(default)]
    pub project_id: String,
    /// Order within the status column; lower sorts first.
    #[serde(default)]
    pub rank: i64,
}

impl Task {
    /// Number of completed subtasks and total subtasks.
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }

    pub fn has_category(&self, category_id: &str) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }
}

/// Everything needed to create a task; the store assigns `id` and `rank`.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub assignee: Option<User>,
    pub due_date: Option<DateTime<Utc>>,
    pub categories: Vec<Category>,
    pub subtasks: Vec<Subtask>,
    /// Empty for records written before tasks belonged to a project.
    pub project_id: String,
}

impl TaskDraft {
    /// A pending task with no optional fields set.
    pub fn new(project_id: &str, title: &str) -> Self {
        TaskDraft {
            title: title.to_string(),
            description: String::new(),
            status: Status::Pending,
            assignee: None,
            due_date: None,
            categories: Vec::new(),
            subtasks: Vec::new(),
            project_id: project_id.to_string(),
        }
    }

    pub fn into_task(self, id: String, rank: i64) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            assignee: self.assignee,
            due_date: self.due_date,
            categories: self.categories,
            subtasks: self.subtasks,
            project_id: self.project_id,
            rank,
        }
    }
}
