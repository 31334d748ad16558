//! Layout helpers for the terminal user interface.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rectangle taking the given percentages of `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Place a point given as percentages inside `area`.
pub fn point_in(area: Rect, x_pct: u16, y_pct: u16) -> (u16, u16) {
    let x = area.x + (area.width.saturating_sub(1) as u32 * x_pct.min(100) as u32 / 100) as u16;
    let y = area.y + (area.height.saturating_sub(1) as u32 * y_pct.min(100) as u32 / 100) as u16;
    (x, y)
}
