//! Period statistics derived from a dense day sequence.
//!
//! Everything here is pure: same input, same output, no I/O. The CLI calls
//! these on every render instead of caching the results.

use crate::models::day_record::{DayRecord, DayStatus};
use crate::models::holiday::Holiday;
use crate::models::meal_record::MealRecord;
use crate::models::team::Team;
use crate::utils::date::{
    days_in_range, format_date_key, month_end, month_start, shift_days, week_start,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub had_meal: usize,
    pub no_meal: usize,
    pub unfilled: usize,
    pub holidays: usize,
    pub total_days: usize,
    pub elapsed_days: usize,
}

impl PeriodStats {
    /// Days that landed in one of the four buckets.
    pub fn classified(&self) -> usize {
        self.had_meal + self.no_meal + self.unfilled + self.holidays
    }
}

/// Classify each day (holiday > had > not-had > unfilled-and-not-future).
/// Future unfilled days count toward `total_days` only.
pub fn calculate_period_stats(days: &[DayRecord], today: NaiveDate) -> PeriodStats {
    let mut stats = PeriodStats {
        total_days: days.len(),
        ..PeriodStats::default()
    };

    for day in days {
        let elapsed = day.date <= today;
        if elapsed {
            stats.elapsed_days += 1;
        }

        if day.is_holiday {
            stats.holidays += 1;
        } else {
            match day.status {
                DayStatus::Had => stats.had_meal += 1,
                DayStatus::NotHad => stats.no_meal += 1,
                DayStatus::Unfilled if elapsed => stats.unfilled += 1,
                DayStatus::Unfilled => {}
            }
        }
    }

    stats
}

/// Stats restricted to the days tagged with `team`.
/// Untagged days, holidays and empty days are not part of a team's period.
pub fn team_stats(team: Team, days: &[DayRecord]) -> PeriodStats {
    let tagged: Vec<&DayRecord> = days.iter().filter(|d| d.team == Some(team)).collect();

    PeriodStats {
        had_meal: tagged.iter().filter(|d| d.status == DayStatus::Had).count(),
        no_meal: tagged.iter().filter(|d| d.status == DayStatus::NotHad).count(),
        unfilled: 0,
        holidays: 0,
        total_days: tagged.len(),
        elapsed_days: tagged.len(),
    }
}

/// Non-holiday days up to `today` nobody filled in yet.
pub fn total_unfilled(days: &[DayRecord], today: NaiveDate) -> usize {
    days.iter()
        .filter(|d| d.status == DayStatus::Unfilled && d.date <= today && !d.is_holiday)
        .count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamPeriods {
    pub week: PeriodStats,
    pub month: PeriodStats,
    pub year: PeriodStats,
}

/// Week / month / year of `today`, overall and per team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub week: PeriodStats,
    pub month: PeriodStats,
    pub year: PeriodStats,
    pub team_a: TeamPeriods,
    pub team_b: TeamPeriods,
}

pub fn build_report(days: &[DayRecord], today: NaiveDate) -> StatsReport {
    let monday = week_start(today, 0);
    let sunday = shift_days(monday, 6);

    let week: Vec<DayRecord> = days
        .iter()
        .filter(|d| d.date >= monday && d.date <= sunday)
        .cloned()
        .collect();
    let month: Vec<DayRecord> = days
        .iter()
        .filter(|d| d.date.year() == today.year() && d.date.month() == today.month())
        .cloned()
        .collect();
    let year: Vec<DayRecord> = days
        .iter()
        .filter(|d| d.date.year() == today.year())
        .cloned()
        .collect();

    let team = |t: Team| TeamPeriods {
        week: team_stats(t, &week),
        month: team_stats(t, &month),
        year: team_stats(t, &year),
    };

    StatsReport {
        week: calculate_period_stats(&week, today),
        month: calculate_period_stats(&month, today),
        year: calculate_period_stats(&year, today),
        team_a: team(Team::A),
        team_b: team(Team::B),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub current: usize,
    pub longest: usize,
}

/// Runs of consecutive "had meal" records.
///
/// `current` counts back from the most recent record and stops at the
/// first record without a meal. Days with no record (holidays, empty
/// days) neither break nor extend a run.
pub fn streaks(records: &[MealRecord]) -> Streaks {
    let mut sorted: Vec<&MealRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date);

    let current = sorted.iter().rev().take_while(|r| r.had_meal).count();

    let mut longest = 0;
    let mut run = 0;
    for r in &sorted {
        if r.had_meal {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    Streaks { current, longest }
}

/// Years with at least one record, newest first; the current year is always listed.
pub fn history_years(records: &[MealRecord], today: NaiveDate) -> Vec<i32> {
    let mut years: BTreeSet<i32> = records.iter().map(|r| r.date.year()).collect();
    years.insert(today.year());
    years.into_iter().rev().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HadNo {
    pub had: usize,
    pub no: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub had: usize,
    pub no: usize,
    pub unfilled: usize,
    pub holidays: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthHistory {
    pub month: u32,
    pub team_a: HadNo,
    pub team_b: HadNo,
    pub total: MonthTotals,
    pub days_in_month: usize,
}

/// Month-by-month breakdown of `year`. Months without any record or
/// holiday are left out.
pub fn history_for_year(
    year: i32,
    records: &[MealRecord],
    holidays: &[Holiday],
    today: NaiveDate,
) -> Vec<MonthHistory> {
    let record_keys: HashSet<String> = records
        .iter()
        .filter(|r| r.date.year() == year)
        .map(|r| format_date_key(r.date))
        .collect();
    let holiday_keys: HashSet<String> = holidays
        .iter()
        .filter(|h| h.date.year() == year)
        .map(|h| format_date_key(h.date))
        .collect();

    let mut out = Vec::new();

    for month in 1..=12 {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            continue;
        };
        let days = days_in_range(month_start(first), month_end(first));

        let month_records: Vec<&MealRecord> = records
            .iter()
            .filter(|r| r.date.year() == year && r.date.month() == month)
            .collect();
        let month_holidays = holidays
            .iter()
            .filter(|h| h.date.year() == year && h.date.month() == month)
            .count();

        if month_records.is_empty() && month_holidays == 0 {
            continue;
        }

        let unfilled = days
            .iter()
            .filter(|d| **d <= today)
            .map(|d| format_date_key(*d))
            .filter(|key| !record_keys.contains(key) && !holiday_keys.contains(key))
            .count();

        let team_split = |team: Team| HadNo {
            had: month_records
                .iter()
                .filter(|r| r.team == Some(team) && r.had_meal)
                .count(),
            no: month_records
                .iter()
                .filter(|r| r.team == Some(team) && !r.had_meal)
                .count(),
        };

        out.push(MonthHistory {
            month,
            team_a: team_split(Team::A),
            team_b: team_split(Team::B),
            total: MonthTotals {
                had: month_records.iter().filter(|r| r.had_meal).count(),
                no: month_records.iter().filter(|r| !r.had_meal).count(),
                unfilled,
                holidays: month_holidays,
            },
            days_in_month: days.len(),
        });
    }

    out
}
