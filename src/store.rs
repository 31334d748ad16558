//! In-memory task store.
//!
//! `TaskStore` owns the task collection together with the pending creation
//! input and the single edit session. Every mutation goes through one of its
//! operations; rejected operations return a `StoreError` and leave the store
//! exactly as it was.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::debug;

use crate::fields::*;
use crate::task::{Draft, EditSession, Task};

/// Reasons a store operation did nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task text cannot be empty")]
    EmptyText,
    #[error("task {0} does not exist")]
    UnknownTask(u64),
    #[error("no task is being edited")]
    NotEditing,
}

/// Direction of a completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Completed,
    Reopened,
}

#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    draft: Draft,
    editing: Option<EditSession>,
    next_id: u64,
    version: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        TaskStore {
            tasks: Vec::new(),
            draft: Draft::default(),
            editing: None,
            next_id: 1,
            version: 0,
        }
    }

    /// Create an empty store whose draft starts with the given category and priority.
    pub fn with_defaults(category: Category, priority: Priority) -> Self {
        let mut store = Self::new();
        store.draft.category = category;
        store.draft.priority = priority;
        store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Counter bumped by every successful mutation of the task collection.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Append a new, incomplete task stamped with the current time.
    pub fn create(
        &mut self,
        text: &str,
        category: Category,
        due: Option<NaiveDate>,
        priority: Priority,
    ) -> Result<u64, StoreError> {
        self.create_at(text, category, due, priority, Utc::now())
    }

    pub(crate) fn create_at(
        &mut self,
        text: &str,
        category: Category,
        due: Option<NaiveDate>,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            debug!("rejected task creation with empty text");
            return Err(StoreError::EmptyText);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            completed: false,
            category,
            due,
            priority,
            created_at,
        });
        self.version += 1;
        debug!(id, ?category, ?priority, ?due, "task created");
        Ok(id)
    }

    /// Create a task from the draft, then clear the draft's text and due date.
    ///
    /// Category and priority are kept for the next creation. On rejection the
    /// draft is left untouched.
    pub fn submit_draft(&mut self) -> Result<u64, StoreError> {
        let Draft { text, category, due, priority } = self.draft.clone();
        let id = self.create(&text, category, due, priority)?;
        self.draft.text.clear();
        self.draft.due = None;
        Ok(id)
    }

    /// Permanently remove a task. Ends the edit session if it targeted this task.
    pub fn delete(&mut self, id: u64) -> Result<Task, StoreError> {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            debug!(id, "delete of unknown task ignored");
            return Err(StoreError::UnknownTask(id));
        };
        let task = self.tasks.remove(idx);
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = None;
        }
        self.version += 1;
        debug!(id, "task deleted");
        Ok(task)
    }

    /// Flip the completion flag of a task.
    pub fn toggle_completion(&mut self, id: u64) -> Result<Toggle, StoreError> {
        let Some(task) = self.get_mut(id) else {
            debug!(id, "toggle of unknown task ignored");
            return Err(StoreError::UnknownTask(id));
        };
        task.completed = !task.completed;
        let toggle = if task.completed { Toggle::Completed } else { Toggle::Reopened };
        self.version += 1;
        debug!(id, ?toggle, "task completion toggled");
        Ok(toggle)
    }

    /// Start editing a task, seeding the buffer with its current text.
    ///
    /// Any previous edit session is discarded.
    pub fn begin_edit(&mut self, id: u64) -> Result<(), StoreError> {
        let Some(task) = self.get(id) else {
            return Err(StoreError::UnknownTask(id));
        };
        self.editing = Some(EditSession { id, buffer: task.text.clone() });
        Ok(())
    }

    /// Replace the buffer of the active edit session.
    pub fn set_edit_buffer(&mut self, text: &str) -> Result<(), StoreError> {
        let session = self.editing.as_mut().ok_or(StoreError::NotEditing)?;
        session.buffer = text.to_string();
        Ok(())
    }

    /// Apply the edit buffer as the task's new text and leave edit mode.
    ///
    /// Edit mode ends even when the buffer is blank or the task is gone; the
    /// task text is only changed for a non-blank buffer.
    pub fn commit_edit(&mut self) -> Result<u64, StoreError> {
        let session = self.editing.take().ok_or(StoreError::NotEditing)?;
        let text = session.buffer.trim();
        if text.is_empty() {
            debug!(id = session.id, "blank edit discarded");
            return Err(StoreError::EmptyText);
        }
        let task = self.get_mut(session.id).ok_or(StoreError::UnknownTask(session.id))?;
        task.text = text.to_string();
        self.version += 1;
        debug!(id = session.id, "task text updated");
        Ok(session.id)
    }

    /// Leave edit mode without touching the task.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }
}
