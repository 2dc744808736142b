// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::utils::date::{month_end, parse_date};
use chrono::NaiveDate;

/// First and last day covered by one token: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn token_bounds(token: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidDate(token.to_string());

    match token.len() {
        4 => {
            let y: i32 = token.parse().map_err(|_| invalid())?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(invalid)?;
            let last = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(invalid)?;
            Ok((first, last))
        }
        7 => {
            let (y, m) = token.split_once('-').ok_or_else(invalid)?;
            let y: i32 = y.parse().map_err(|_| invalid())?;
            let m: u32 = m.parse().map_err(|_| invalid())?;
            let first = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(invalid)?;
            Ok((first, month_end(first)))
        }
        10 => {
            let d = parse_date(token).ok_or_else(invalid)?;
            Ok((d, d))
        }
        _ => Err(invalid()),
    }
}

/// Parse a period filter.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();

    let Some((start_raw, end_raw)) = r.split_once(':') else {
        return token_bounds(r);
    };

    let (start, end) = (start_raw.trim(), end_raw.trim());
    if start.len() != end.len() {
        return Err(AppError::Validation(format!(
            "range '{r}': start and end must have the same format"
        )));
    }

    let (first, _) = token_bounds(start)?;
    let (_, last) = token_bounds(end)?;

    if first > last {
        return Err(AppError::Validation(format!(
            "range '{r}': start is after end"
        )));
    }

    Ok((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_tokens() {
        assert_eq!(parse_range("2026").unwrap(), (d(2026, 1, 1), d(2026, 12, 31)));
        assert_eq!(parse_range("2028-02").unwrap(), (d(2028, 2, 1), d(2028, 2, 29)));
        assert_eq!(parse_range("2026-03-10").unwrap(), (d(2026, 3, 10), d(2026, 3, 10)));
    }

    #[test]
    fn intervals() {
        assert_eq!(
            parse_range("2026-01:2026-03").unwrap(),
            (d(2026, 1, 1), d(2026, 3, 31))
        );
        assert!(parse_range("2026:2026-03").is_err());
        assert!(parse_range("2026-05:2026-03").is_err());
        assert!(parse_range("2026-13").is_err());
    }
}
