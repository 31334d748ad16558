//! Derived task views: filtering, sorting and progress.
//!
//! `project` is a pure function of the task collection and the selected
//! filter and sort key. `ProjectionCache` memoises its result per store
//! version so the UI can ask for the list on every frame.

use std::cmp::{Ordering, Reverse};

use crate::fields::*;
use crate::store::TaskStore;
use crate::task::Task;

impl Filter {
    /// Whether a task belongs to this filter's subset.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !task.completed,
            Filter::Completed => task.completed,
            Filter::Urgent => task.priority == Priority::High,
        }
    }
}

impl SortKey {
    /// Total order over tasks for this key.
    ///
    /// Undated tasks compare as later than every dated task.
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::Created => (b.created_at, b.id).cmp(&(a.created_at, a.id)),
            SortKey::DueDate => (a.due.is_none(), a.due).cmp(&(b.due.is_none(), b.due)),
            SortKey::Priority => Reverse(a.priority.rank()).cmp(&Reverse(b.priority.rank())),
            SortKey::Category => a.category.as_str().cmp(b.category.as_str()),
        }
    }
}

/// Filter, then stably sort, the given tasks.
pub fn project(tasks: &[Task], filter: Filter, sort: SortKey) -> Vec<&Task> {
    let mut view: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    view.sort_by(|a, b| sort.compare(a, b));
    view
}

/// Completed-versus-total counts for a task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(tasks: &[Task]) -> Self {
        Progress {
            completed: tasks.iter().filter(|t| t.completed).count(),
            total: tasks.len(),
        }
    }

    /// Completed share in `[0, 1]`; zero for an empty collection.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> u16 {
        (self.ratio() * 100.0).round() as u16
    }

    pub fn pending(&self) -> usize {
        self.total - self.completed
    }

    /// At least one task and none left pending.
    pub fn all_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Memoised projection keyed by filter, sort key and store version.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    key: Option<(Filter, SortKey, u64)>,
    ids: Vec<u64>,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the projected tasks in display order.
    pub fn ids(&mut self, store: &TaskStore, filter: Filter, sort: SortKey) -> &[u64] {
        let key = (filter, sort, store.version());
        if self.key != Some(key) {
            self.ids = project(store.tasks(), filter, sort).iter().map(|t| t.id).collect();
            self.key = Some(key);
        }
        &self.ids
    }
}
