//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task store, routes
//! key presses to store operations, keeps the completion feedback in step
//! with the store and renders the single-screen task list.

use std::io;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::ThreadRng;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

use crate::{
    config::UiConfig,
    dates::format_due_relative,
    feedback::Feedback,
    fields::*,
    store::{StoreError, TaskStore, Toggle},
    task::Task,
    tui::{
        colors::{self, category_color, palette, priority_color, Palette, BLUE, PURPLE},
        enums::{AppState, FormField},
        input::InputField,
        task_form::TaskForm,
        utils::{centered_rect, point_in},
    },
    view::{Progress, ProjectionCache},
};

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    store: TaskStore,
    feedback: Feedback,
    cache: ProjectionCache,
    visible: Vec<u64>,
    filter: Filter,
    sort: SortKey,
    theme: Theme,
    tick_rate: Duration,
    task_list_state: TableState,
    task_form: TaskForm,
    edit_field: InputField,
    status_message: String,
    rng: ThreadRng,
}

impl App {
    /// Create a new App with an empty store.
    pub fn new(config: UiConfig) -> Self {
        let store = TaskStore::with_defaults(config.category, config.priority);
        let task_form = TaskForm::from_draft(store.draft());
        let mut app = App {
            state: AppState::TaskList,
            store,
            feedback: Feedback::new(),
            cache: ProjectionCache::new(),
            visible: Vec::new(),
            filter: config.filter,
            sort: config.sort,
            theme: config.theme,
            tick_rate: config.tick_rate,
            task_list_state: TableState::default(),
            task_form,
            edit_field: InputField::new(),
            status_message: String::new(),
            rng: rand::thread_rng(),
        };
        app.refresh_view();
        app
    }

    /// Re-derive the visible list, keeping the selected task when it is still shown.
    fn refresh_view(&mut self) {
        let old_selected_id = self.selected_id();
        self.visible = self.cache.ids(&self.store, self.filter, self.sort).to_vec();

        let new_idx = old_selected_id
            .and_then(|id| self.visible.iter().position(|&v| v == id))
            .or_else(|| {
                let idx = self.task_list_state.selected().unwrap_or(0);
                if self.visible.is_empty() {
                    None
                } else {
                    Some(idx.min(self.visible.len() - 1))
                }
            });
        self.task_list_state.select(new_idx);
    }

    /// Let feedback see the latest store state and refresh the list.
    fn after_change(&mut self) {
        self.feedback.observe(&self.store, Instant::now(), &mut self.rng);
        self.refresh_view();
    }

    fn selected_id(&self) -> Option<u64> {
        self.task_list_state
            .selected()
            .and_then(|idx| self.visible.get(idx))
            .copied()
    }

    fn select_id(&mut self, id: u64) {
        if let Some(idx) = self.visible.iter().position(|&v| v == id) {
            self.task_list_state.select(Some(idx));
        }
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn open_add_form(&mut self) {
        self.task_form.current_field = FormField::Text;
        self.task_form.update_active_field();
        self.state = AppState::AddTask;
    }

    /// Write the form into the store's draft and create a task from it.
    fn submit_form(&mut self) {
        if !self.task_form.can_submit() {
            self.set_status_message("Task text is required");
            return;
        }
        let today = Local::now().date_naive();
        if let Err(e) = self.task_form.apply_to(self.store.draft_mut(), today) {
            self.set_status_message(e.to_string());
            return;
        }
        match self.store.submit_draft() {
            Ok(id) => {
                self.task_form = TaskForm::from_draft(self.store.draft());
                self.after_change();
                self.select_id(id);
                self.set_status_message("Task added. Let's go!");
            }
            Err(e) => self.set_status_message(format!("Not added: {e}")),
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.toggle_completion(id) {
            Ok(toggle) => {
                self.feedback.on_toggle(toggle, Instant::now(), &mut self.rng);
                self.after_change();
                self.set_status_message(match toggle {
                    Toggle::Completed => "Task completed",
                    Toggle::Reopened => "Task reopened",
                });
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.delete(id) {
            Ok(task) => {
                self.after_change();
                self.set_status_message(format!("Deleted '{}'", task.text));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn begin_edit_selected(&mut self) {
        let Some((id, completed)) = self
            .selected_id()
            .and_then(|id| self.store.get(id))
            .map(|t| (t.id, t.completed))
        else {
            return;
        };
        if completed {
            self.set_status_message("Reopen a task before editing it");
            return;
        }
        if let Err(e) = self.store.begin_edit(id) {
            self.set_status_message(e.to_string());
            return;
        }
        let buffer = self.store.editing().map(|s| s.buffer.clone()).unwrap_or_default();
        self.edit_field = InputField::with_value(&buffer);
        self.edit_field.active = true;
        self.state = AppState::EditTask;
    }

    fn commit_edit(&mut self) {
        let result = self
            .store
            .set_edit_buffer(&self.edit_field.value)
            .and_then(|_| self.store.commit_edit());
        match result {
            Ok(_) => self.set_status_message("Task updated"),
            Err(StoreError::EmptyText) => self.set_status_message("Empty text, task left unchanged"),
            Err(e) => self.set_status_message(e.to_string()),
        }
        self.edit_field = InputField::new();
        self.state = AppState::TaskList;
        self.after_change();
    }

    fn cancel_edit(&mut self) {
        self.store.cancel_edit();
        self.edit_field = InputField::new();
        self.state = AppState::TaskList;
        self.set_status_message("Edit cancelled");
    }

    fn cycle_filter(&mut self, forward: bool) {
        self.filter = cycle(&Filter::ALL, self.filter, forward);
        self.refresh_view();
        self.set_status_message(format!("Filter: {} ({} shown)", self.filter.label(), self.visible.len()));
    }

    fn cycle_sort(&mut self, forward: bool) {
        self.sort = cycle(&SortKey::ALL, self.sort, forward);
        self.refresh_view();
        self.set_status_message(format!("Sorted by {}", self.sort.label()));
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected > 0 {
                        self.task_list_state.select(Some(selected - 1));
                    }
                } else if !self.visible.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.visible.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                } else if !self.visible.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char(' ') | KeyCode::Char('c') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('e') => self.begin_edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('f') => self.cycle_filter(true),
            KeyCode::Char('F') => self.cycle_filter(false),
            KeyCode::Char('s') => self.cycle_sort(true),
            KeyCode::Char('S') => self.cycle_sort(false),
            KeyCode::Char('t') => {
                self.theme = self.theme.toggled();
                self.set_status_message(format!("{:?} mode", self.theme));
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Handle keyboard input in the add form.
    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Esc => {
                // Keep what was typed as the pending draft; a bad due date stays in the form only.
                let today = Local::now().date_naive();
                if let Err(e) = self.task_form.apply_to(self.store.draft_mut(), today) {
                    self.set_status_message(format!("Draft not saved: {e}"));
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
        false
    }

    /// Handle keyboard input while a task's text is being edited in place.
    fn handle_edit_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Enter | KeyCode::Tab => self.commit_edit(),
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Left => self.edit_field.move_cursor_left(),
            KeyCode::Right => self.edit_field.move_cursor_right(),
            KeyCode::Home => self.edit_field.move_cursor_home(),
            KeyCode::End => self.edit_field.move_cursor_end(),
            KeyCode::Backspace => self.edit_field.handle_backspace(),
            KeyCode::Delete => self.edit_field.handle_delete(),
            KeyCode::Char(c) => self.edit_field.handle_char(c),
            _ => {}
        }
        if self.state == AppState::EditTask {
            let _ = self.store.set_edit_buffer(&self.edit_field.value);
        }
        false
    }

    fn handle_help_input(&mut self, key: KeyCode) -> bool {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')) {
            self.state = AppState::TaskList;
        }
        false
    }

    /// Dispatch one key press based on the current screen.
    ///
    /// Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        self.clear_status_message();
        match self.state {
            AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
            AppState::AddTask => self.handle_form_input(key.code, key.modifiers),
            AppState::EditTask => self.handle_edit_input(key.code, key.modifiers),
            AppState::Help => self.handle_help_input(key.code),
        }
    }

    /// Poll for one keyboard event, waiting at most one tick.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                return Ok(self.handle_key(key));
            }
        }
        Ok(false)
    }

    /// Advance animations and expire transient popups.
    pub fn on_tick(&mut self, now: Instant) {
        self.feedback.tick(now);
    }

    /// Render the title and the typewriter tagline.
    fn render_header(&self, f: &mut Frame, area: Rect, p: &Palette) {
        let text = vec![
            Line::from(vec![
                Span::styled("TASKMASTER ", Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)),
                Span::styled("PRO", Style::default().fg(BLUE).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled(
                    self.feedback.tagline(),
                    Style::default().fg(p.muted).add_modifier(Modifier::ITALIC),
                ),
                Span::styled("|", Style::default().fg(p.muted).add_modifier(Modifier::SLOW_BLINK)),
            ]),
        ];
        let header = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(p.border)))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_progress(&self, f: &mut Frame, area: Rect, p: &Palette, progress: Progress) {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(p.border))
                    .title(format!(
                        "Progress: {}/{} tasks completed",
                        progress.completed, progress.total
                    )),
            )
            .gauge_style(Style::default().fg(PURPLE).bg(p.gauge_bg))
            .ratio(progress.ratio())
            .label(format!("{}%", progress.percent()));
        f.render_widget(gauge, area);
    }

    fn render_controls(&self, f: &mut Frame, area: Rect, p: &Palette) {
        let key = Style::default().fg(p.muted);
        let value = Style::default().fg(PURPLE).add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::styled(" Filter (f): ", key),
            Span::styled(self.filter.label(), value),
            Span::styled("   Sort (s): ", key),
            Span::styled(self.sort.label(), value),
            Span::styled("   Theme (t): ", key),
            Span::styled(format!("{:?}", self.theme), value),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    /// Render the add form above the list.
    fn render_task_form(&self, f: &mut Frame, area: Rect, p: &Palette) {
        let form = &self.task_form;
        let label = |field: FormField, name: &'static str| {
            let style = if form.current_field == field {
                Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(p.muted)
            };
            let marker = if form.current_field == field { "> " } else { "  " };
            Span::styled(format!("{marker}{name:<10}"), style)
        };
        let selector = |text: &str, color: Color| {
            Span::styled(format!("< {text} >"), Style::default().fg(color).add_modifier(Modifier::BOLD))
        };
        let placeholder = |field: &InputField, hint: &'static str| {
            if field.value.is_empty() {
                Span::styled(hint, Style::default().fg(p.muted).add_modifier(Modifier::ITALIC))
            } else {
                Span::styled(field.value.clone(), Style::default().fg(p.fg))
            }
        };

        let submit_style = if form.can_submit() {
            Style::default().fg(Color::White).bg(PURPLE).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.muted).add_modifier(Modifier::DIM)
        };

        let lines = vec![
            Line::from(vec![label(FormField::Text, "Task"), placeholder(&form.text, "What's your next victory?")]),
            Line::from(vec![label(FormField::Category, "Category"), selector(form.category.as_str(), category_color(form.category))]),
            Line::from(vec![
                label(FormField::Due, "Due"),
                placeholder(&form.due, "today, fri, in 3d, 2024-05-31 (optional)"),
            ]),
            Line::from(vec![
                label(FormField::Priority, "Priority"),
                selector(&format!("{} Priority", form.priority.as_str()), priority_color(form.priority)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter: Let's Go! ", submit_style),
                Span::styled("  Tab: next field  Esc: back to list", Style::default().fg(p.muted)),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(PURPLE))
            .title("New Task");
        let inner = block.inner(area);
        f.render_widget(Paragraph::new(lines).block(block), area);

        // Label column is the marker plus a padded name.
        let label_width = 12u16;
        let cursor = match form.current_field {
            FormField::Text => Some((cursor_column(&form.text), 0u16)),
            FormField::Due => Some((cursor_column(&form.due), 2u16)),
            FormField::Category | FormField::Priority => None,
        };
        if let Some((col, row)) = cursor {
            let x = inner
                .x
                .saturating_add(label_width)
                .saturating_add(col)
                .min(inner.right().saturating_sub(1));
            f.set_cursor_position((x, inner.y + row));
        }
    }

    fn task_row(&self, task: &Task, p: &Palette) -> Row<'static> {
        let today = Local::now().date_naive();
        let editing = self.state == AppState::EditTask
            && self.store.editing().is_some_and(|s| s.id == task.id);

        let check = if task.completed { "[x]" } else { "[ ]" };
        let text_cell = if editing {
            let split = self
                .edit_field
                .value
                .char_indices()
                .nth(self.edit_field.cursor)
                .map_or(self.edit_field.value.len(), |(i, _)| i);
            let (before, after) = self.edit_field.value.split_at(split);
            Cell::from(Line::from(vec![
                Span::styled(before.to_string(), Style::default().fg(p.fg)),
                Span::styled("|", Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)),
                Span::styled(after.to_string(), Style::default().fg(p.fg)),
            ]))
        } else if task.completed {
            Cell::from(Span::styled(
                task.text.clone(),
                Style::default().fg(p.muted).add_modifier(Modifier::CROSSED_OUT),
            ))
        } else {
            Cell::from(Span::styled(task.text.clone(), Style::default().fg(p.fg)))
        };
        let due = match task.due {
            Some(d) => format!("{} ({})", format_due_relative(Some(d), today), d.format("%Y-%m-%d")),
            None => "-".to_string(),
        };

        Row::new(vec![
            Cell::from(Span::styled(check, Style::default().fg(PURPLE))),
            text_cell,
            Cell::from(Span::styled(
                task.category.as_str(),
                Style::default().fg(category_color(task.category)).add_modifier(Modifier::BOLD),
            )),
            Cell::from(Span::styled(due, Style::default().fg(p.muted))),
            Cell::from(Span::styled(
                format!("* {}", task.priority.as_str()),
                Style::default().fg(priority_color(task.priority)),
            )),
        ])
    }

    /// Render the task table or the empty state.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect, p: &Palette) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.border))
            .title(format!("Tasks ({}/{}) - Press 'h' for help", self.visible.len(), self.store.len()));

        if self.visible.is_empty() {
            let progress = Progress::of(self.store.tasks());
            let (title, subtitle) = if self.store.is_empty() {
                ("Ready to conquer your day?", "Press 'a' to add your first task and start achieving greatness!")
            } else if progress.all_done() {
                ("All tasks completed!", "You're absolutely crushing it!")
            } else {
                ("No tasks match this filter", "Press 'f' to change the filter")
            };
            let text = vec![
                Line::from(""),
                Line::from(Span::styled("*", Style::default().fg(colors::MEDIUM_YELLOW))),
                Line::from(Span::styled(title, Style::default().fg(p.fg).add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(subtitle, Style::default().fg(p.muted))),
            ];
            let empty = Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(["", "Task", "Category", "Due", "Priority"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().fg(Color::White).bg(PURPLE))
        .height(1);

        let rows: Vec<Row> = self
            .visible
            .iter()
            .filter_map(|&id| self.store.get(id))
            .map(|task| self.task_row(task, p))
            .collect();

        let widths = [
            Constraint::Length(3),  // Check
            Constraint::Min(25),    // Text
            Constraint::Length(10), // Category
            Constraint::Length(24), // Due
            Constraint::Length(10), // Priority
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(p.highlight_bg).add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    fn render_help(&self, f: &mut Frame, area: Rect, p: &Palette) {
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);
        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("{keys:<14}"), Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)),
                Span::styled(what, Style::default().fg(p.fg)),
            ])
        };
        let text = vec![
            entry("a", "Add a task"),
            entry("space / c", "Toggle completion"),
            entry("e", "Edit text (Enter saves, Esc cancels)"),
            entry("d / Del", "Delete task"),
            entry("f / F", "Next / previous filter"),
            entry("s / S", "Next / previous sort order"),
            entry("t", "Toggle light / dark theme"),
            entry("Up/Down j/k", "Move selection"),
            entry("h / ?", "Show or hide this help"),
            entry("q / Esc", "Quit"),
        ];
        let help = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().bg(p.bg))
            .wrap(Wrap { trim: false });
        f.render_widget(help, area);
    }

    fn render_quote(&self, f: &mut Frame, area: Rect, p: &Palette) {
        let Some(quote) = self.feedback.quote() else {
            return;
        };
        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);
        let popup = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(quote.text, Style::default().fg(PURPLE).add_modifier(Modifier::BOLD))),
        ])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(BLUE)))
        .style(Style::default().bg(p.bg))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(popup, area);
    }

    fn render_confetti(&self, f: &mut Frame, area: Rect) {
        let Some(celebration) = self.feedback.celebration() else {
            return;
        };
        let pieces = [PURPLE, BLUE, colors::HIGH_RED, colors::MEDIUM_YELLOW, colors::LOW_GREEN];
        let buf = f.buffer_mut();
        for (i, &(x_pct, y_pct)) in celebration.confetti.iter().enumerate() {
            let (x, y) = point_in(area, x_pct, y_pct);
            let glyph = if i % 2 == 0 { "*" } else { "+" };
            buf.set_string(x, y, glyph, Style::default().fg(pieces[i % pieces.len()]).add_modifier(Modifier::BOLD));
        }
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!("Tasks: {} | Press 'h' for help", self.visible.len()),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Editing task (Enter to save, Esc to cancel)".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(PURPLE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function laying out the screen and its overlays.
    pub fn render(&mut self, f: &mut Frame) {
        let p = palette(self.theme);
        let full = f.area();
        f.render_widget(Block::default().style(Style::default().bg(p.bg).fg(p.fg)), full);

        let progress = Progress::of(self.store.tasks());
        let progress_height = if progress.total > 0 { 3 } else { 0 };
        let form_height = if self.state == AppState::AddTask { 8 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),               // Header
                Constraint::Length(progress_height), // Progress
                Constraint::Length(1),               // Filter and sort
                Constraint::Length(form_height),     // Add form
                Constraint::Min(0),                  // Task list
                Constraint::Length(1),               // Status bar
            ])
            .split(full);

        self.render_header(f, chunks[0], &p);
        if progress.total > 0 {
            self.render_progress(f, chunks[1], &p, progress);
        }
        self.render_controls(f, chunks[2], &p);
        if self.state == AppState::AddTask {
            self.render_task_form(f, chunks[3], &p);
        }
        self.render_task_list(f, chunks[4], &p);
        self.render_status_bar(f, chunks[5]);

        if self.state == AppState::Help {
            self.render_help(f, full, &p);
        }
        self.render_confetti(f, full);
        self.render_quote(f, full, &p);
    }

    /// Main event loop for the TUI application.
    ///
    /// Draws, waits up to one tick for a key, then advances the feedback timers.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        info!(filter = ?self.filter, sort = ?self.sort, "task list ready");
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                debug!(tasks = self.store.len(), "quit requested");
                break;
            }
            self.on_tick(Instant::now());
        }
        Ok(())
    }
}

/// Display width of the text before the cursor.
fn cursor_column(field: &InputField) -> u16 {
    let before: String = field.value.chars().take(field.cursor).collect();
    u16::try_from(before.width()).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::CELEBRATION_DURATION;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add_task(app: &mut App, text: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, text);
        press(app, KeyCode::Enter);
        press(app, KeyCode::Esc);
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = App::new(UiConfig::default());
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::AddTask);
        type_text(&mut app, "Buy milk");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.tasks()[0].text, "Buy milk");
        assert!(!app.store.tasks()[0].completed);
        assert!(app.task_form.text.value.is_empty());
        assert_eq!(app.state, AppState::AddTask);
        assert_eq!(app.visible.len(), 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::TaskList);
    }

    #[test]
    fn test_blank_form_is_rejected() {
        let mut app = App::new(UiConfig::default());
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(app.store.is_empty());
        assert_eq!(app.status_message, "Task text is required");
    }

    #[test]
    fn test_form_selectors_feed_new_task() {
        let mut app = App::new(UiConfig::default());
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Gym");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2030-01-02");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        let task = &app.store.tasks()[0];
        assert_eq!(task.category, Category::Learning);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due, chrono::NaiveDate::from_ymd_opt(2030, 1, 2));
        assert_eq!(app.task_form.category, Category::Learning);
        assert!(app.task_form.due.value.is_empty());
    }

    #[test]
    fn test_bad_due_date_keeps_form() {
        let mut app = App::new(UiConfig::default());
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Dentist");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "soonish");
        press(&mut app, KeyCode::Enter);
        assert!(app.store.is_empty());
        assert_eq!(app.task_form.text.value, "Dentist");
        assert!(app.status_message.starts_with("Unrecognised due date"));
    }

    #[test]
    fn test_toggle_shows_quote_and_celebrates() {
        let mut app = App::new(UiConfig::default());
        add_task(&mut app, "one");
        add_task(&mut app, "two");

        press(&mut app, KeyCode::Char(' '));
        assert!(app.feedback.quote().is_some());
        assert!(app.feedback.celebration().is_none());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.store.tasks().iter().all(|t| t.completed));
        assert!(app.feedback.celebration().is_some());
    }

    #[test]
    fn test_out_of_range_due_offset_is_rejected() {
        let mut app = App::new(UiConfig::default());
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Someday");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "in 99999999999d");
        press(&mut app, KeyCode::Enter);
        assert!(app.store.is_empty());
        assert_eq!(app.state, AppState::AddTask);
        assert!(app.status_message.starts_with("Unrecognised due date"));
    }

    #[test]
    fn test_leaving_form_with_bad_due_reports_it() {
        let mut app = App::new(UiConfig::default());
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Dentist");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "soonish");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::TaskList);
        assert!(app.status_message.starts_with("Draft not saved: Unrecognised due date"));
        assert!(app.store.draft().text.is_empty());

        // A good form is kept as the draft without complaint.
        app.task_form.due.set("tomorrow");
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Esc);
        assert!(app.status_message.is_empty());
        assert_eq!(app.store.draft().text, "Dentist");
    }

    #[test]
    fn test_cursor_column_counts_display_cells() {
        let mut field = InputField::with_value("日本a");
        assert_eq!(cursor_column(&field), 5);
        field.move_cursor_left();
        assert_eq!(cursor_column(&field), 4);
        field.move_cursor_home();
        assert_eq!(cursor_column(&field), 0);
    }

    #[test]
    fn test_edit_on_finished_list_celebrates_again() {
        let mut app = App::new(UiConfig::default());
        add_task(&mut app, "Stretch");
        press(&mut app, KeyCode::Char(' '));
        assert!(app.feedback.celebration().is_some());

        let later = Instant::now() + CELEBRATION_DURATION;
        app.on_tick(later);
        assert!(app.feedback.celebration().is_none());
        // Idle ticks do not bring it back.
        app.on_tick(later + Duration::from_millis(50));
        assert!(app.feedback.celebration().is_none());

        // The UI only edits open tasks, so start the session on the store directly.
        let id = app.store.tasks()[0].id;
        app.store.begin_edit(id).unwrap();
        app.edit_field = InputField::with_value("Stretch twice");
        app.state = AppState::EditTask;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.tasks()[0].text, "Stretch twice");
        assert!(app.feedback.celebration().is_some());
    }

    #[test]
    fn test_delete_selected() {
        let mut app = App::new(UiConfig::default());
        add_task(&mut app, "temp");
        press(&mut app, KeyCode::Char('d'));
        assert!(app.store.is_empty());
        assert!(app.visible.is_empty());
        assert_eq!(app.task_list_state.selected(), None);
        // Nothing selected: another delete is a no-op.
        press(&mut app, KeyCode::Char('d'));
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_filter_cycle_updates_visible() {
        let mut app = App::new(UiConfig::default());
        add_task(&mut app, "a");
        add_task(&mut app, "b");
        press(&mut app, KeyCode::Char(' '));

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filter, Filter::Pending);
        assert_eq!(app.visible.len(), 1);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filter, Filter::Completed);
        assert_eq!(app.visible.len(), 1);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filter, Filter::Urgent);
        assert!(app.visible.is_empty());
        press(&mut app, KeyCode::Char('F'));
        assert_eq!(app.filter, Filter::Completed);
    }

    #[test]
    fn test_edit_commit_and_cancel() {
        let mut app = App::new(UiConfig::default());
        add_task(&mut app, "Buy bread");

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::EditTask);
        for _ in 0.."bread".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "milk");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(app.store.tasks()[0].text, "Buy milk");
        assert!(app.store.editing().is_none());

        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "!!!");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.store.tasks()[0].text, "Buy milk");
        assert!(app.store.editing().is_none());
    }

    #[test]
    fn test_blank_edit_keeps_text() {
        let mut app = App::new(UiConfig::default());
        add_task(&mut app, "Keep me");
        press(&mut app, KeyCode::Char('e'));
        for _ in 0.."Keep me".len() {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.tasks()[0].text, "Keep me");
        assert_eq!(app.state, AppState::TaskList);
    }

    #[test]
    fn test_completed_task_cannot_be_edited() {
        let mut app = App::new(UiConfig::default());
        add_task(&mut app, "Done already");
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::TaskList);
        assert!(app.store.editing().is_none());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(UiConfig::default());
        assert!(press(&mut app, KeyCode::Char('q')));
        let mut app = App::new(UiConfig::default());
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        // Typing 'q' in the form is text, not quit.
        let mut app = App::new(UiConfig::default());
        press(&mut app, KeyCode::Char('a'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.task_form.text.value, "q");
    }

    #[test]
    fn test_render_empty_and_populated() {
        let mut app = App::new(UiConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();

        terminal.draw(|f| app.render(f)).unwrap();
        let screen = screen_text(&terminal);
        assert!(screen.contains("TASKMASTER"));
        assert!(screen.contains("Ready to conquer your day?"));

        add_task(&mut app, "Write tests");
        app.theme = Theme::Dark;
        terminal.draw(|f| app.render(f)).unwrap();
        let screen = screen_text(&terminal);
        assert!(screen.contains("Write tests"));
        assert!(screen.contains("Progress: 0/1 tasks completed"));
    }

    #[test]
    fn test_render_form_and_help() {
        let mut app = App::new(UiConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        press(&mut app, KeyCode::Char('a'));
        terminal.draw(|f| app.render(f)).unwrap();
        assert!(screen_text(&terminal).contains("New Task"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('h'));
        terminal.draw(|f| app.render(f)).unwrap();
        assert!(screen_text(&terminal).contains("Toggle completion"));
    }
}
