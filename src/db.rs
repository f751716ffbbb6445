//! JSON document store.
//!
//! All state lives in one JSON document with three collections: `projects`,
//! `tasks` and `categories`. Every operation reads the whole document from
//! disk; every mutation then writes the whole document back. There is no
//! locking, so two writers racing on the same file lose one of the updates.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::category::Category;
use crate::config::{ReadPolicy, StoreConfig};
use crate::error::{Result, StoreError};
use crate::ids;
use crate::project::Project;
use crate::reorder::{sort_board, tail_rank};
use crate::task::{Subtask, Task, TaskDraft};

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Document {
    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }
}

/// Handle on the document file. Open one per process and pass it by reference.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    read_policy: ReadPolicy,
}

impl Store {
    /// Open the store described by `config`, creating parent directories as needed.
    /// The document itself is created on the first write.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }
        debug!(path = %config.path.display(), policy = ?config.read_policy, "store opened");
        Ok(Store {
            path: config.path,
            read_policy: config.read_policy,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document. A missing file is an empty document.
    pub fn read_document(&self) -> Result<Document> {
        match self.try_read() {
            Ok(doc) => Ok(doc),
            Err(e) => match self.read_policy {
                ReadPolicy::Strict => Err(e),
                ReadPolicy::Lenient => {
                    warn!(error = %e, "could not read store, continuing with an empty document");
                    Ok(Document::default())
                }
            },
        }
    }

    fn try_read(&self) -> Result<Document> {
        let buf = match fs::read_to_string(&self.path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        serde_json::from_str(&buf).map_err(|e| StoreError::json(&self.path, e))
    }

    /// Write the whole document via a temp file and rename.
    pub fn write_document(&self, doc: &Document) -> Result<()> {
        let mut data =
            serde_json::to_string_pretty(doc).map_err(|e| StoreError::json(&self.path, e))?;
        data.push('\n');
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(|e| StoreError::io(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&self.path, e));
        }
        Ok(())
    }

    // --- Projects ---

    pub fn get_projects(&self) -> Result<Vec<Project>> {
        Ok(self.read_document()?.projects)
    }

    pub fn create_project(&self, name: &str) -> Result<Project> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidName { what: "project" });
        }
        let mut doc = self.read_document()?;
        let project = Project::new(name);
        doc.projects.push(project.clone());
        self.write_document(&doc)?;
        info!(id = %project.id, name = %project.name, "project created");
        Ok(project)
    }

    pub fn get_project_by_id(&self, id: &str) -> Result<Option<Project>> {
        Ok(self.read_document()?.projects.into_iter().find(|p| p.id == id))
    }

    // --- Tasks ---

    /// Tasks of one project in board order.
    pub fn get_project_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .read_document()?
            .tasks
            .into_iter()
            .filter(|t| t.project_id == project_id)
            .collect();
        sort_board(&mut tasks);
        debug!(project = project_id, count = tasks.len(), "loaded project tasks");
        Ok(tasks)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.read_document()?.tasks.into_iter().find(|t| t.id == id))
    }

    /// Replace the stored task with the same id.
    pub fn update_task(&self, task: Task) -> Result<Task> {
        let mut doc = self.read_document()?;
        let slot = doc
            .task_mut(&task.id)
            .ok_or_else(|| StoreError::task_not_found(&task.id))?;
        *slot = task.clone();
        self.write_document(&doc)?;
        info!(id = %task.id, status = %task.status, "task updated");
        Ok(task)
    }

    /// Replace every stored task that matches an input by id.
    /// Inputs with no stored counterpart are skipped; nothing is inserted.
    pub fn update_tasks(&self, tasks: Vec<Task>) -> Result<Vec<Task>> {
        let mut doc = self.read_document()?;
        let mut replaced = 0;
        for task in &tasks {
            match doc.task_mut(&task.id) {
                Some(slot) => {
                    *slot = task.clone();
                    replaced += 1;
                }
                None => debug!(id = %task.id, "bulk update skipped unknown task"),
            }
        }
        self.write_document(&doc)?;
        info!(requested = tasks.len(), replaced, "tasks updated");
        Ok(tasks)
    }

    /// Append a new task at the end of its column and bump the project's counter.
    pub fn create_task(&self, draft: TaskDraft) -> Result<Task> {
        let mut doc = self.read_document()?;
        let rank = tail_rank(
            doc.tasks
                .iter()
                .filter(|t| t.project_id == draft.project_id && t.status == draft.status)
                .map(|t| t.rank),
        );
        let task = draft.into_task(ids::task_id(), rank);
        doc.tasks.push(task.clone());
        match doc.project_mut(&task.project_id) {
            Some(project) => project.task_count += 1,
            None => warn!(project = %task.project_id, "task created for unknown project"),
        }
        self.write_document(&doc)?;
        info!(id = %task.id, project = %task.project_id, "task created");
        Ok(task)
    }

    // --- Subtasks ---

    pub fn add_subtask(&self, task_id: &str, text: &str) -> Result<Subtask> {
        if text.trim().is_empty() {
            return Err(StoreError::InvalidName { what: "subtask" });
        }
        let mut doc = self.read_document()?;
        let task = doc
            .task_mut(task_id)
            .ok_or_else(|| StoreError::task_not_found(task_id))?;
        let subtask = Subtask::new(text);
        task.subtasks.push(subtask.clone());
        self.write_document(&doc)?;
        info!(task = task_id, id = %subtask.id, "subtask added");
        Ok(subtask)
    }

    pub fn set_subtask_completed(
        &self,
        task_id: &str,
        subtask_id: &str,
        completed: bool,
    ) -> Result<Task> {
        let mut doc = self.read_document()?;
        let task = doc
            .task_mut(task_id)
            .ok_or_else(|| StoreError::task_not_found(task_id))?;
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| StoreError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            })?;
        subtask.completed = completed;
        let task = task.clone();
        self.write_document(&doc)?;
        info!(task = task_id, subtask = subtask_id, completed, "subtask toggled");
        Ok(task)
    }

    // --- Categories ---

    pub fn get_categories(&self) -> Result<Vec<Category>> {
        Ok(self.read_document()?.categories)
    }

    pub fn create_category(&self, name: &str, color: &str) -> Result<Category> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidName { what: "category" });
        }
        let mut doc = self.read_document()?;
        let category = Category {
            id: ids::category_id(),
            name: name.to_string(),
            color: color.to_string(),
        };
        doc.categories.push(category.clone());
        self.write_document(&doc)?;
        info!(id = %category.id, name, "category created");
        Ok(category)
    }

    /// Remove a category and every embedded copy of it. Unknown ids are a no-op.
    pub fn delete_category(&self, id: &str) -> Result<()> {
        let mut doc = self.read_document()?;
        doc.categories.retain(|c| c.id != id);
        let mut stripped = 0;
        for task in doc.tasks.iter_mut().filter(|t| t.has_category(id)) {
            task.categories.retain(|c| c.id != id);
            stripped += 1;
        }
        self.write_document(&doc)?;
        info!(id, stripped, "category deleted");
        Ok(())
    }
}
