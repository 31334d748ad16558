//! Task data structure.
//!
//! This module defines the `Task` struct that represents a single to-do item
//! and the `Draft` that collects input for the next task to be created.

use chrono::{DateTime, NaiveDate, Utc};

use crate::fields::*;

/// A single to-do item.
///
/// `id` and `created_at` are fixed at creation; `text` is always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub category: Category,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

/// Pending input for task creation.
///
/// Category and priority survive a successful creation and become the defaults
/// for the next one; text and due date are cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub text: String,
    pub category: Category,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
}

impl Draft {
    /// Whether the draft would be accepted by the store.
    pub fn is_submittable(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// The task currently being edited and its text buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub id: u64,
    pub buffer: String,
}
