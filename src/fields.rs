//! Enumerations and field types for tasks and task views.
//!
//! This module defines the fixed value sets a task is classified by (category and
//! priority) together with the view selectors (filter and sort key) and the UI theme.

use clap::ValueEnum;

/// Life area a task belongs to.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Personal,
    Work,
    Urgent,
    Health,
    Learning,
}

impl Category {
    /// All categories in selector order.
    pub const ALL: [Category; 5] = [
        Category::Personal,
        Category::Work,
        Category::Urgent,
        Category::Health,
        Category::Learning,
    ];

    /// Display name, also used as the category sort key.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Urgent => "Urgent",
            Category::Health => "Health",
            Category::Learning => "Learning",
        }
    }
}

/// Task importance.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities in selector order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Numeric rank used when sorting by priority (higher is more important).
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Which subset of tasks a view shows.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
    /// High priority tasks, done or not.
    Urgent,
}

impl Filter {
    pub const ALL: [Filter; 4] = [Filter::All, Filter::Pending, Filter::Completed, Filter::Urgent];

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All Tasks",
            Filter::Pending => "Pending",
            Filter::Completed => "Completed",
            Filter::Urgent => "High Priority",
        }
    }
}

/// Available orderings for the task list.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Created,
    DueDate,
    Priority,
    Category,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Created,
        SortKey::DueDate,
        SortKey::Priority,
        SortKey::Category,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Created => "Created",
            SortKey::DueDate => "Due Date",
            SortKey::Priority => "Priority",
            SortKey::Category => "Category",
        }
    }
}

/// Colour scheme of the terminal interface.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Step to the neighbouring value of a fixed option list, wrapping at both ends.
pub fn cycle<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let len = options.len();
    let idx = options.iter().position(|&o| o == current).unwrap_or(0);
    let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    options[next]
}
