//! The task store: single source of truth for tasks, filter selection, and
//! remote-load status.
//!
//! The store is constructed explicitly from a [`Storage`] handle and passed to
//! whichever surface needs it; there is no ambient global state. Every
//! completed mutation mirrors the aggregate back to storage synchronously.
//! A failed mirror is logged and swallowed: the in-memory mutation stands and
//! the previously saved snapshot stays intact.
//!
//! `overdue` is a cached derived flag. `set_overdue_for_all` recomputes it
//! for every task and must run before any filtered read that depends on its
//! freshness; `toggle_complete` and `edit_task` recompute it for the task
//! they touch; `add_task` and `remote_load_succeeded` leave it as given.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::task::{Filter, LoadStatus, Task, TodosState};

/// Fallback message when a remote load fails without a more specific cause.
pub const REMOTE_LOAD_FALLBACK_MESSAGE: &str = "Failed to fetch todos";

#[derive(Debug)]
pub struct TodoStore {
    storage: Storage,
    state: TodosState,
}

impl TodoStore {
    /// Open the store, pre-populated from the persisted snapshot when one
    /// decodes; otherwise empty. Never fails on corrupted storage.
    pub fn open(storage: Storage) -> Self {
        let state = storage.load_state().unwrap_or_default();
        Self { storage, state }
    }

    /// Build a store over an explicit initial snapshot.
    pub fn with_state(storage: Storage, state: TodosState) -> Self {
        Self { storage, state }
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    /// The current aggregate snapshot.
    pub fn state(&self) -> &TodosState {
        &self.state
    }

    /// All tasks, in stored order.
    pub fn tasks(&self) -> &[Task] {
        &self.state.items
    }

    /// Look up a single task by id.
    pub fn task_by_id(&self, id: &str) -> Option<&Task> {
        self.state.items.iter().find(|task| task.id == id)
    }

    /// The current filter selection.
    pub fn filter(&self) -> Filter {
        self.state.filter
    }

    /// Tasks matching the current filter, in stored order. Never mutates
    /// `overdue`; call [`TodoStore::set_overdue_for_all`] first when the
    /// read depends on overdue freshness.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        let filter = self.state.filter;
        self.state
            .items
            .iter()
            .filter(|task| filter.matches(task))
            .collect()
    }

    /// Outcome of the last remote load.
    pub fn status(&self) -> LoadStatus {
        self.state.status
    }

    /// Message from the last remote-load failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a task to the end of the list.
    ///
    /// The id must not already exist; duplicates are rejected and the list is
    /// left untouched. Flags start cleared regardless of the deadline.
    pub fn add_task(&mut self, mut task: Task) -> Result<()> {
        task.validate()?;
        if self.task_by_id(&task.id).is_some() {
            return Err(Error::DuplicateTask(task.id));
        }

        task.completed = false;
        task.overdue = false;
        self.state.items.push(task);
        self.mirror();
        Ok(())
    }

    /// Flip the completed flag of the task with `id`.
    ///
    /// A task becoming incomplete gets its `overdue` flag recomputed
    /// immediately; a task becoming complete is forced not-overdue. Returns
    /// false (a no-op) when the id is unknown.
    pub fn toggle_complete(&mut self, id: &str) -> bool {
        self.toggle_complete_at(id, Utc::now())
    }

    pub fn toggle_complete_at(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let Some(task) = self.state.items.iter_mut().find(|task| task.id == id) else {
            tracing::debug!(id, "toggle_complete: task not found");
            return false;
        };

        task.completed = !task.completed;
        if task.completed {
            task.overdue = false;
        } else {
            task.refresh_overdue(now);
        }
        self.mirror();
        true
    }

    /// Remove the task with `id`, preserving the relative order of the rest.
    /// Returns false (a no-op) when the id is unknown.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.state.items.len();
        self.state.items.retain(|task| task.id != id);
        if self.state.items.len() == before {
            tracing::debug!(id, "delete_task: task not found");
            return false;
        }
        self.mirror();
        true
    }

    /// Replace the stored task sharing `updated.id` with the given fields,
    /// recomputing `overdue` from the merged record. Returns Ok(false) when
    /// the id is unknown.
    pub fn edit_task(&mut self, updated: Task) -> Result<bool> {
        self.edit_task_at(updated, Utc::now())
    }

    pub fn edit_task_at(&mut self, updated: Task, now: DateTime<Utc>) -> Result<bool> {
        updated.validate()?;
        let Some(task) = self
            .state
            .items
            .iter_mut()
            .find(|task| task.id == updated.id)
        else {
            tracing::debug!(id = %updated.id, "edit_task: task not found");
            return Ok(false);
        };

        *task = updated;
        task.refresh_overdue(now);
        self.mirror();
        Ok(true)
    }

    /// Recompute `overdue` for every task. Idempotent for a fixed clock.
    pub fn set_overdue_for_all(&mut self) {
        self.set_overdue_for_all_at(Utc::now());
    }

    pub fn set_overdue_for_all_at(&mut self, now: DateTime<Utc>) {
        for task in &mut self.state.items {
            task.refresh_overdue(now);
        }
        self.mirror();
    }

    /// Select which subset of tasks reads should surface.
    pub fn set_filter(&mut self, filter: Filter) {
        self.state.filter = filter;
        self.mirror();
    }

    /// Reorder the list to match `ids`, which must be a permutation of the
    /// current item ids. Mismatches (unknown, missing, or duplicated ids) are
    /// rejected and leave the list untouched.
    pub fn replace_order(&mut self, ids: &[String]) -> Result<()> {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(Error::InvalidOrder(format!("duplicate id: {id}")));
            }
            if self.task_by_id(id).is_none() {
                return Err(Error::InvalidOrder(format!("unknown id: {id}")));
            }
        }
        if ids.len() != self.state.items.len() {
            return Err(Error::InvalidOrder(format!(
                "expected {} ids, got {}",
                self.state.items.len(),
                ids.len()
            )));
        }

        let mut remaining: Vec<Task> = std::mem::take(&mut self.state.items);
        let mut reordered = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(position) = remaining.iter().position(|task| &task.id == id) {
                reordered.push(remaining.remove(position));
            }
        }
        self.state.items = reordered;
        self.mirror();
        Ok(())
    }

    // =========================================================================
    // Remote-load transitions
    // =========================================================================

    /// Mark a remote load as in flight.
    pub fn begin_remote_load(&mut self) {
        self.state.status = LoadStatus::Loading;
        self.state.error = None;
    }

    /// Replace the list wholesale with a fetched result.
    pub fn remote_load_succeeded(&mut self, tasks: Vec<Task>) {
        self.state.items = tasks;
        self.state.status = LoadStatus::Succeeded;
        self.state.error = None;
        self.mirror();
    }

    /// Record a remote-load failure for user-visible display.
    pub fn remote_load_failed(&mut self, message: impl Into<String>) {
        self.state.status = LoadStatus::Failed;
        self.state.error = Some(message.into());
    }

    // =========================================================================
    // Persistence mirror
    // =========================================================================

    fn mirror(&self) {
        if let Err(err) = self.storage.save_state(&self.state) {
            tracing::warn!(%err, "failed to mirror state to storage");
        }
    }
}
