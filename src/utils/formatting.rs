//! Formatting utilities used for CLI and export outputs.

use regex::Regex;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern"));

pub fn strip_ansi(s: &str) -> String {
    ANSI.replace_all(s, "").into_owned()
}

/// Terminal columns taken by `s`, ignoring colour codes.
pub fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{s}{}", " ".repeat(width.saturating_sub(visible_width(s))))
}

pub fn pad_left(s: &str, width: usize) -> String {
    format!("{}{s}", " ".repeat(width.saturating_sub(visible_width(s))))
}

/// `part` as a percentage of `total`, one decimal; `--` when `total` is 0.
pub fn percent(part: usize, total: usize) -> String {
    if total == 0 {
        return "--".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_colours_and_counts_accents_once() {
        assert_eq!(visible_width("\x1b[32mGulyás\x1b[0m"), 6);
        assert_eq!(pad_right("\x1b[31mÁ\x1b[0m", 3), "\x1b[31mÁ\x1b[0m  ");
        assert_eq!(pad_left("7", 3), "  7");
    }

    #[test]
    fn percent_handles_empty_totals() {
        assert_eq!(percent(1, 4), "25.0%");
        assert_eq!(percent(0, 0), "--");
    }
}
