//! Due date parsing and formatting helpers.
//!
//! The add form takes the due date as free text, so this module turns
//! human-friendly input ("tomorrow", "next fri", "in 2w") into dates and
//! renders dates relative to today for the task list.

use chrono::{Datelike, Duration, NaiveDate};

const WEEKDAYS: [(&str, i64); 14] = [
    ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
    ("friday", 4), ("saturday", 5), ("sunday", 6),
    ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
    ("fri", 4), ("sat", 5), ("sun", 6),
];

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday".."sunday" (and three letter forms), "this friday", "next monday"
/// - "weekend", "end of week"/"eow", "end of month"/"eom"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => return Some(start_end_of_this_week(today).1),
        "end of month" | "eom" => return Some(end_of_month(today)),
        "this weekend" | "weekend" => return Some(days_until(today, 5).map_or(today, |d| today + d)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(unit) = rest.chars().last() {
            let amount = &rest[..rest.len() - unit.len_utf8()];
            if let Ok(n) = amount.trim().parse::<i64>() {
                let offset = match unit {
                    'd' => Duration::try_days(n),
                    'w' => Duration::try_weeks(n),
                    // Months are approximated as 30 days.
                    'm' => n.checked_mul(30).and_then(Duration::try_days),
                    _ => return None,
                };
                // Offsets past the calendar's range are not dates.
                return offset.and_then(|d| today.checked_add_signed(d));
            }
        }
    }

    let (name, next_week) = if let Some(rest) = s.strip_prefix("next ") {
        (rest, true)
    } else if let Some(rest) = s.strip_prefix("this ") {
        (rest, false)
    } else {
        (s.as_str(), false)
    };
    if let Some(&(_, target)) = WEEKDAYS.iter().find(|(day, _)| *day == name) {
        let ahead = days_until(today, target).unwrap_or(Duration::days(0));
        return Some(if next_week {
            if ahead.num_days() == 0 {
                today + Duration::days(7)
            } else {
                today + ahead + Duration::days(7)
            }
        } else {
            today + ahead
        });
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Days from `today` until the next weekday numbered from Monday (0) to Sunday (6).
fn days_until(today: NaiveDate, target: i64) -> Option<Duration> {
    if !(0..7).contains(&target) {
        return None;
    }
    let current = today.weekday().num_days_from_monday() as i64;
    Some(Duration::days((target + 7 - current) % 7))
}

fn end_of_month(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first - Duration::days(1))
        .unwrap_or(today)
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => match (d - today).num_days() {
            0 => "today".into(),
            1 => "tomorrow".into(),
            n if n > 1 => format!("in {n}d"),
            n => format!("{}d late", -n),
        },
    }
}
