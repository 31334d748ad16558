//! Add-task form for the terminal user interface.
//!
//! The form mirrors the store's draft: a text field, a category selector, a
//! free-text due date and a priority selector. It is written back into the
//! draft just before submission.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    dates::parse_due_input,
    fields::{cycle, Category, Priority},
    task::Draft,
    tui::{enums::FormField, input::InputField},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unrecognised due date '{0}' (try 2024-05-31, tomorrow, fri, in 3d)")]
    UnrecognisedDue(String),
}

/// Task form state.
pub struct TaskForm {
    pub text: InputField,
    pub due: InputField,
    pub category: Category,
    pub priority: Priority,
    pub current_field: FormField,
}

impl TaskForm {
    /// Create a form populated from the store's draft.
    pub fn from_draft(draft: &Draft) -> Self {
        let mut form = TaskForm {
            text: InputField::with_value(&draft.text),
            due: InputField::with_value(&draft.due.map(|d| d.to_string()).unwrap_or_default()),
            category: draft.category,
            priority: draft.priority,
            current_field: FormField::Text,
        };
        form.update_active_field();
        form
    }

    /// Whether submitting would create a task.
    pub fn can_submit(&self) -> bool {
        !self.text.value.trim().is_empty()
    }

    /// Write the form into `draft`, resolving the due date against `today`.
    ///
    /// The draft is untouched when the due date cannot be parsed.
    pub fn apply_to(&self, draft: &mut Draft, today: NaiveDate) -> Result<(), FormError> {
        let due = self.parse_due(today)?;
        draft.text = self.text.value.clone();
        draft.category = self.category;
        draft.priority = self.priority;
        draft.due = due;
        Ok(())
    }

    fn parse_due(&self, today: NaiveDate) -> Result<Option<NaiveDate>, FormError> {
        let raw = self.due.value.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_due_input(raw, today)
            .map(Some)
            .ok_or_else(|| FormError::UnrecognisedDue(raw.to_string()))
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = cycle(&FormField::ORDER, self.current_field, true);
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = cycle(&FormField::ORDER, self.current_field, false);
        self.update_active_field();
    }

    /// Update which text field shows a cursor.
    pub fn update_active_field(&mut self) {
        self.text.active = self.current_field == FormField::Text;
        self.due.active = self.current_field == FormField::Due;
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            FormField::Text => Some(&mut self.text),
            FormField::Due => Some(&mut self.due),
            FormField::Category | FormField::Priority => None,
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            FormField::Category => self.category = cycle(&Category::ALL, self.category, right),
            FormField::Priority => self.priority = cycle(&Priority::ALL, self.priority, right),
            FormField::Text | FormField::Due => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }
}
