//! Client-side board state with optimistic updates.
//!
//! The board holds one project's task sequence. Local changes (drops, edits)
//! are applied at once and the touched tasks are marked pending. `commit`
//! sends the pending tasks to the store; on success they become confirmed,
//! on failure the whole sequence reverts to its last confirmed form.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::db::Store;
use crate::error::{Result, StoreError};
use crate::fields::Status;
use crate::reorder::DragSession;
use crate::task::Task;

/// Sync state of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Confirmed,
    Pending,
}

#[derive(Debug, Clone)]
pub struct BoardState {
    project_id: String,
    tasks: Vec<Task>,
    /// Sequence as last confirmed by the store.
    confirmed: Vec<Task>,
    pending: HashSet<String>,
}

impl BoardState {
    /// Load a project's tasks; everything starts confirmed.
    pub fn load(store: &Store, project_id: &str) -> Result<Self> {
        let tasks = store.get_project_tasks(project_id)?;
        Ok(Self::from_tasks(project_id, tasks))
    }

    pub fn from_tasks(project_id: &str, tasks: Vec<Task>) -> Self {
        BoardState {
            project_id: project_id.to_string(),
            confirmed: tasks.clone(),
            tasks,
            pending: HashSet::new(),
        }
    }

    /// Replace the board with the store's current tasks, dropping pending changes.
    pub fn reload(&mut self, store: &Store) -> Result<()> {
        *self = Self::load(store, &self.project_id)?;
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn sync_state(&self, id: &str) -> SyncState {
        if self.pending.contains(id) {
            SyncState::Pending
        } else {
            SyncState::Confirmed
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Tasks grouped by column, each column in sequence order.
    pub fn columns(&self) -> Vec<(Status, Vec<&Task>)> {
        Status::ALL
            .iter()
            .map(|&status| {
                let tasks = self.tasks.iter().filter(|t| t.status == status).collect();
                (status, tasks)
            })
            .collect()
    }

    /// Complete a drag by dropping into `column`, before `target` if given.
    /// Returns the tasks that changed, now pending.
    pub fn drop_task(
        &mut self,
        session: &mut DragSession,
        column: Status,
        target: Option<&str>,
    ) -> Vec<Task> {
        let Some(outcome) = session.drop(&mut self.tasks, column, target) else {
            return Vec::new();
        };
        self.pending.extend(outcome.changed.iter().cloned());
        debug!(index = outcome.index, changed = outcome.changed.len(), "drop applied locally");
        outcome
            .changed
            .iter()
            .filter_map(|id| self.task(id).cloned())
            .collect()
    }

    /// Apply a local edit to a task already on the board.
    pub fn replace_task(&mut self, task: Task) -> Result<()> {
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| StoreError::task_not_found(&task.id))?;
        self.pending.insert(task.id.clone());
        *slot = task;
        Ok(())
    }

    /// Persist every pending task. On failure the board rolls back to the
    /// last confirmed sequence and the store error is returned.
    pub fn commit(&mut self, store: &Store) -> Result<usize> {
        if !self.has_pending() {
            return Ok(0);
        }
        let batch: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| self.pending.contains(&t.id))
            .cloned()
            .collect();
        let count = batch.len();
        match store.update_tasks(batch) {
            Ok(_) => {
                self.confirmed = self.tasks.clone();
                self.pending.clear();
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, pending = count, "commit failed, rolling back");
                self.rollback();
                Err(e)
            }
        }
    }

    /// Discard every pending change.
    pub fn rollback(&mut self) {
        self.tasks = self.confirmed.clone();
        self.pending.clear();
    }
}
