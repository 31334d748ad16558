//! Colour palettes for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Category, Priority, Theme};

// Brand gradient endpoints used for the title and progress bar.
pub const PURPLE: Color = Color::Rgb(147, 51, 234);
pub const BLUE: Color = Color::Rgb(37, 99, 235);

pub const HIGH_RED: Color = Color::Rgb(239, 68, 68);
pub const MEDIUM_YELLOW: Color = Color::Rgb(234, 179, 8);
pub const LOW_GREEN: Color = Color::Rgb(34, 197, 94);

/// Surface colours for one theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub highlight_bg: Color,
    pub gauge_bg: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::Rgb(245, 243, 255),
            fg: Color::Rgb(31, 41, 55),
            muted: Color::Rgb(107, 114, 128),
            border: Color::Rgb(209, 213, 219),
            highlight_bg: Color::Rgb(221, 214, 254),
            gauge_bg: Color::Rgb(229, 231, 235),
        },
        Theme::Dark => Palette {
            bg: Color::Rgb(17, 24, 39),
            fg: Color::White,
            muted: Color::Rgb(156, 163, 175),
            border: Color::Rgb(55, 65, 81),
            highlight_bg: Color::Rgb(55, 48, 107),
            gauge_bg: Color::Rgb(55, 65, 81),
        },
    }
}

pub fn category_color(category: Category) -> Color {
    match category {
        Category::Work => Color::Rgb(59, 130, 246),
        Category::Personal => Color::Rgb(168, 85, 247),
        Category::Urgent => HIGH_RED,
        Category::Health => LOW_GREEN,
        Category::Learning => Color::Rgb(249, 115, 22),
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => HIGH_RED,
        Priority::Medium => MEDIUM_YELLOW,
        Priority::Low => LOW_GREEN,
    }
}
