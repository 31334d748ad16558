//! Enumerations for TUI state management.

/// Which screen the interface is showing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    AddTask,
    EditTask,
    Help,
}

/// Fields of the add form in tab order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FormField {
    Text,
    Category,
    Due,
    Priority,
}

impl FormField {
    pub const ORDER: [FormField; 4] = [
        FormField::Text,
        FormField::Category,
        FormField::Due,
        FormField::Priority,
    ];
}
