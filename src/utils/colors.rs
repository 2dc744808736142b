/// ANSI color helper utilities for terminal output.
use crate::models::day_record::{DayRecord, DayStatus};

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Returns GREY when the field is empty (None or "" or "--"),
/// and RESET otherwise.
pub fn color_for_optional_field<T: AsRef<str>>(value: Option<T>) -> &'static str {
    match value {
        Some(v) if !v.as_ref().trim().is_empty() && v.as_ref() != "--" => RESET,
        _ => GREY,
    }
}

/// Holiday → magenta, had → green, not had → red, empty → grey.
pub fn color_for_day(day: &DayRecord) -> &'static str {
    if day.is_holiday {
        return MAGENTA;
    }
    match day.status {
        DayStatus::Had => GREEN,
        DayStatus::NotHad => RED,
        DayStatus::Unfilled => GREY,
    }
}

/// `value` in grey when it is empty or a placeholder.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

pub fn paint(color: &str, value: &str) -> String {
    format!("{color}{value}{RESET}")
}
