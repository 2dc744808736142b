//! Calendar helpers shared by the windowing, statistics and CLI layers.
//!
//! Every date is a `NaiveDate`: there is no time or zone component, so
//! "local midnight" normalisation is inherent and date keys cannot drift.

use chrono::{Datelike, Days, Months, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Monday of the week `offset_weeks` away from the week containing `reference`.
/// Sunday belongs to the week that started six days earlier.
/// Saturates at the ends of the supported calendar.
pub fn week_start(reference: NaiveDate, offset_weeks: i64) -> NaiveDate {
    checked_week_start(reference, offset_weeks).unwrap_or(if offset_weeks < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// [`week_start`], or `None` when the week lies outside the supported calendar.
pub fn checked_week_start(reference: NaiveDate, offset_weeks: i64) -> Option<NaiveDate> {
    let back = i64::from(reference.weekday().num_days_from_monday());
    let days = offset_weeks.checked_mul(7)?.checked_sub(back)?;
    checked_shift_days(reference, days)
}

/// Zero-padded `YYYY-MM-DD`; the natural key of a day.
pub fn format_date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// True iff `date` is strictly after `today`.
pub fn is_future_date(date: NaiveDate, today: NaiveDate) -> bool {
    date > today
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    checked_shift_days(date, days).unwrap_or(date)
}

pub fn checked_shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

/// Add (or subtract) whole months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    checked_add_months(date, i64::from(months)).unwrap_or(date)
}

pub fn checked_add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    shift_days(add_months(first, 1), -1)
}

pub fn year_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

pub fn year_end(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

/// All dates from `start` to `end`, both inclusive. Empty when `start > end`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn all_days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => days_in_range(first, month_end(first)),
        None => Vec::new(),
    }
}

/// Hungarian month names, as shown in the history view.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Január",
        2 => "Február",
        3 => "Március",
        4 => "Április",
        5 => "Május",
        6 => "Június",
        7 => "Július",
        8 => "Augusztus",
        9 => "Szeptember",
        10 => "Október",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}

pub fn weekday_short(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "H",
        chrono::Weekday::Tue => "K",
        chrono::Weekday::Wed => "Sze",
        chrono::Weekday::Thu => "Cs",
        chrono::Weekday::Fri => "P",
        chrono::Weekday::Sat => "Szo",
        chrono::Weekday::Sun => "V",
    }
}
