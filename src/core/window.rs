//! The loaded window: a dense, gap-free run of `DayRecord`s kept in memory
//! and grown on demand from the record / holiday / profile stores.
//!
//! Growth is two-phase. [`MealWindow::plan`] decides what is missing and
//! marks a fetch as in flight; [`MealWindow::apply`] merges a completed
//! fetch in one step. A plan that is never applied must be handed back to
//! [`MealWindow::abort`]. [`MealWindow::ensure_loaded`] drives both phases
//! against a [`MealSource`].

use crate::errors::{AppError, AppResult};
use crate::models::day_record::{DayRecord, DayStatus};
use crate::models::holiday::Holiday;
use crate::models::meal_record::MealRecord;
use crate::models::profile::Profile;
use crate::utils::date::{
    checked_add_months, checked_shift_days, checked_week_start, days_in_range, format_date_key,
    month_start, shift_days,
};
use chrono::{DateTime, Local, NaiveDate};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Shown when the recording user's profile cannot be resolved.
pub const UNKNOWN_RECORDER: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Week,
    Month,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Week => "week",
            ViewKind::Month => "month",
        }
    }
}

impl FromStr for ViewKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "w" => Ok(ViewKind::Week),
            "month" | "m" => Ok(ViewKind::Month),
            other => Err(AppError::InvalidView(other.to_string())),
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &DateRange) -> DateRange {
        DateRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Move `start` up to `floor`. `None` when the whole range lies before it.
    pub fn clamp_start(&self, floor: NaiveDate) -> Option<DateRange> {
        if self.end < floor {
            return None;
        }
        Some(DateRange {
            start: self.start.max(floor),
            end: self.end,
        })
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        days_in_range(self.start, self.end)
    }

    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Whole calendar months from the month of `start` to the month of `end`,
/// widened by `before` / `after` months.
fn month_span(start: NaiveDate, end: NaiveDate, before: i64, after: i64) -> Option<DateRange> {
    let first = checked_add_months(month_start(start), -before)?;
    let next = checked_add_months(month_start(end), after.checked_add(1)?)?;
    Some(DateRange::new(first, checked_shift_days(next, -1)?))
}

/// Days of the week or calendar month `offset` steps away from `today`.
fn view_range(view: ViewKind, offset: i64, today: NaiveDate) -> AppResult<DateRange> {
    let range = match view {
        ViewKind::Week => checked_week_start(today, offset)
            .and_then(|monday| Some(DateRange::new(monday, checked_shift_days(monday, 6)?))),
        ViewKind::Month => {
            checked_add_months(today, offset).and_then(|anchor| month_span(anchor, anchor, 0, 0))
        }
    };

    range.ok_or_else(|| {
        AppError::Validation(format!("offset {offset} is outside the supported calendar"))
    })
}

/// The minimal range a view needs right now, clamped to `floor`.
pub fn required_range(
    view: ViewKind,
    offset: i64,
    today: NaiveDate,
    floor: NaiveDate,
) -> AppResult<Option<DateRange>> {
    Ok(view_range(view, offset, today)?.clamp_start(floor))
}

/// [`required_range`] widened by `margin_months` whole months on both sides,
/// so that paging back and forth stays inside the loaded window.
pub fn padded_range(
    view: ViewKind,
    offset: i64,
    today: NaiveDate,
    floor: NaiveDate,
    margin_months: u32,
) -> AppResult<Option<DateRange>> {
    let base = view_range(view, offset, today)?;
    let margin = i64::from(margin_months);
    let padded = month_span(base.start, base.end, margin, margin).ok_or_else(|| {
        AppError::Validation(format!(
            "a margin of {margin_months} months around offset {offset} is outside the supported calendar"
        ))
    })?;
    Ok(padded.clamp_start(floor))
}

/// Read access to the three stores the window is built from.
pub trait MealSource {
    fn fetch_records(&self, range: DateRange) -> AppResult<Vec<MealRecord>>;
    fn fetch_holidays(&self, range: DateRange) -> AppResult<Vec<Holiday>>;
    /// Batch lookup; ids without a profile are simply absent from the result.
    fn fetch_profiles(&self, ids: &[i64]) -> AppResult<Vec<Profile>>;
}

/// Records, holidays and the recorders' profiles for one sub-range.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub range: Option<DateRange>,
    pub records: Vec<MealRecord>,
    pub holidays: Vec<Holiday>,
    pub profiles: Vec<Profile>,
}

/// Fetch one sub-range: records and holidays, then one profile lookup for
/// the distinct recorders.
pub fn fetch_range(source: &dyn MealSource, range: DateRange) -> AppResult<Fetched> {
    let records = source.fetch_records(range)?;
    let holidays = source.fetch_holidays(range)?;

    let ids: Vec<i64> = records
        .iter()
        .map(|r| r.recorded_by)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let profiles = source.fetch_profiles(&ids)?;

    Ok(Fetched {
        range: Some(range),
        records,
        holidays,
        profiles,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub seq: u64,
    /// The range that was asked for (after clamping).
    pub target: DateRange,
    /// Sub-ranges outside the loaded window, oldest first.
    pub missing: Vec<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Already inside the loaded window.
    Satisfied,
    /// Another fetch is in flight; the range was remembered for later.
    Queued,
    Fetch(FetchPlan),
}

#[derive(Debug, Default)]
pub struct MealWindow {
    floor: NaiveDate,
    time_format: String,
    days: Vec<DayRecord>,
    loaded: Option<DateRange>,
    in_flight: Option<u64>,
    queued: Option<DateRange>,
    next_seq: u64,
}

impl MealWindow {
    pub fn new(floor: NaiveDate, time_format: &str) -> Self {
        Self {
            floor,
            time_format: time_format.to_string(),
            ..Self::default()
        }
    }

    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn loaded(&self) -> Option<DateRange> {
        self.loaded
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|i| &self.days[i])
    }

    /// Loaded days within `range` (the window is kept sorted).
    pub fn slice(&self, range: DateRange) -> &[DayRecord] {
        let from = self.days.partition_point(|d| d.date < range.start);
        let to = self.days.partition_point(|d| d.date <= range.end);
        &self.days[from..to.max(from)]
    }

    pub fn week_days(&self, offset: i64, today: NaiveDate) -> &[DayRecord] {
        view_range(ViewKind::Week, offset, today).map_or(&[], |r| self.slice(r))
    }

    pub fn month_days(&self, offset: i64, today: NaiveDate) -> &[DayRecord] {
        view_range(ViewKind::Month, offset, today).map_or(&[], |r| self.slice(r))
    }

    pub fn plan(&mut self, range: DateRange) -> Plan {
        let Some(range) = range.clamp_start(self.floor) else {
            return Plan::Satisfied;
        };

        if self.loaded.is_some_and(|l| l.contains(&range)) {
            return Plan::Satisfied;
        }

        if self.in_flight.is_some() {
            self.queued = Some(match self.queued {
                Some(q) => q.union(&range),
                None => range,
            });
            return Plan::Queued;
        }

        let missing = match self.loaded {
            None => vec![range],
            Some(loaded) => {
                let mut parts = Vec::new();
                if range.start < loaded.start {
                    parts.push(DateRange::new(range.start, shift_days(loaded.start, -1)));
                }
                if range.end > loaded.end {
                    parts.push(DateRange::new(shift_days(loaded.end, 1), range.end));
                }
                parts
            }
        };

        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);

        Plan::Fetch(FetchPlan {
            seq: self.next_seq,
            target: range,
            missing,
        })
    }

    /// Merge the results of `plan` in one replacement of the day array.
    ///
    /// Returns a range queued while the fetch was in flight, if any.
    /// Only the fetch currently in flight is accepted; results of aborted or
    /// superseded plans were computed against an older window and are dropped.
    pub fn apply(&mut self, plan: &FetchPlan, fetched: Vec<Fetched>) -> Option<DateRange> {
        if self.in_flight != Some(plan.seq) {
            return None;
        }

        let mut merged = self.days.clone();
        for part in &fetched {
            let Some(range) = part.range else { continue };
            merged.extend(build_days(
                range,
                &part.records,
                &part.holidays,
                &part.profiles,
                &self.time_format,
            ));
        }
        merged.retain(|d| d.date >= self.floor);
        merged.sort_by_key(|d| d.date);
        merged.dedup_by_key(|d| format_date_key(d.date));

        let mut loaded = match self.loaded {
            Some(l) => l.union(&plan.target),
            None => plan.target,
        };
        if let (Some(first), Some(last)) = (merged.first(), merged.last()) {
            loaded = DateRange::new(loaded.start.max(first.date), loaded.end.min(last.date));
        }

        self.days = merged;
        self.loaded = Some(loaded);
        self.in_flight = None;
        self.queued.take()
    }

    /// Give up on `plan`: the window stays as it was.
    pub fn abort(&mut self, plan: &FetchPlan) {
        if self.in_flight == Some(plan.seq) {
            self.in_flight = None;
        }
    }

    /// Make sure `range` is loaded, fetching only what is missing.
    ///
    /// A fetch that fails, or that takes longer than `timeout`, is
    /// discarded and the previous window is kept.
    pub fn ensure_loaded(
        &mut self,
        source: &dyn MealSource,
        range: DateRange,
        timeout: Duration,
    ) -> AppResult<()> {
        let mut next = Some(range);

        while let Some(range) = next.take() {
            let plan = match self.plan(range) {
                Plan::Fetch(plan) => plan,
                Plan::Satisfied | Plan::Queued => return Ok(()),
            };

            let started = Instant::now();
            let mut fetched = Vec::with_capacity(plan.missing.len());
            for part in &plan.missing {
                match fetch_range(source, *part) {
                    Ok(f) => fetched.push(f),
                    Err(e) => {
                        self.abort(&plan);
                        return Err(AppError::Fetch(e.to_string()));
                    }
                }
            }

            if started.elapsed() > timeout {
                self.abort(&plan);
                return Err(AppError::FetchTimeout(timeout.as_secs()));
            }

            next = self.apply(&plan, fetched);
        }

        Ok(())
    }

    /// Replace the one day matching `record.date` after a successful save.
    pub fn apply_saved(&mut self, record: &MealRecord, recorder: Option<&Profile>) {
        let time_format = self.time_format.clone();
        if let Some(day) = self.day_mut(record.date) {
            apply_record(day, record, recorder, &time_format);
        }
    }

    /// Reset the one day matching `date` after a successful delete.
    pub fn apply_deleted(&mut self, date: NaiveDate) {
        if let Some(day) = self.day_mut(date) {
            day.clear_record();
        }
    }

    fn day_mut(&mut self, date: NaiveDate) -> Option<&mut DayRecord> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|i| &mut self.days[i])
    }
}

/// `created_at` in local time, rendered with `time_format`.
fn recorded_at(created_at: &str, time_format: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(created_at)
        .ok()
        .map(|dt| dt.with_timezone(&Local).format(time_format).to_string())
}

fn apply_record(
    day: &mut DayRecord,
    record: &MealRecord,
    recorder: Option<&Profile>,
    time_format: &str,
) {
    day.status = if record.had_meal {
        DayStatus::Had
    } else {
        DayStatus::NotHad
    };
    day.meal_name = record.meal_name.clone();
    day.reason = record.reason.clone();
    day.team = record.team;
    day.recorded_by = Some(
        recorder
            .map(Profile::display_name)
            .unwrap_or_else(|| UNKNOWN_RECORDER.to_string()),
    );
    day.recorded_at = recorded_at(&record.created_at, time_format);
}

/// One `DayRecord` per date of `range`: the stored record (if any) with the
/// holiday overlay on top.
pub fn build_days(
    range: DateRange,
    records: &[MealRecord],
    holidays: &[Holiday],
    profiles: &[Profile],
    time_format: &str,
) -> Vec<DayRecord> {
    let by_date: HashMap<String, &MealRecord> = records
        .iter()
        .map(|r| (format_date_key(r.date), r))
        .collect();
    let holiday_by_date: HashMap<String, &Holiday> = holidays
        .iter()
        .map(|h| (format_date_key(h.date), h))
        .collect();
    let profile_by_id: HashMap<i64, &Profile> = profiles.iter().map(|p| (p.id, p)).collect();

    range
        .days()
        .into_iter()
        .map(|date| {
            let key = format_date_key(date);
            let mut day = DayRecord::unfilled(date);

            if let Some(record) = by_date.get(&key) {
                let recorder = profile_by_id.get(&record.recorded_by).copied();
                apply_record(&mut day, record, recorder, time_format);
            }

            if let Some(holiday) = holiday_by_date.get(&key) {
                day.is_holiday = true;
                day.holiday_name = Some(holiday.name.clone());
            }

            day
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team::Team;
    use std::cell::{Cell, RefCell};
    use std::thread;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn floor() -> NaiveDate {
        d(2026, 1, 1)
    }

    fn record(date: NaiveDate, had_meal: bool, recorded_by: i64) -> MealRecord {
        MealRecord {
            id: 0,
            date,
            had_meal,
            meal_name: had_meal.then(|| "Gulyás".to_string()),
            reason: (!had_meal).then(|| "Szabadság".to_string()),
            recorded_by,
            team: Some(Team::A),
            created_at: "2026-03-10T11:45:00+00:00".into(),
            updated_at: "2026-03-10T11:45:00+00:00".into(),
        }
    }

    fn profile(id: i64, name: Option<&str>) -> Profile {
        Profile {
            id,
            email: format!("user{id}@example.com"),
            full_name: name.map(String::from),
            avatar_url: None,
            is_admin: false,
            is_approved: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// In-memory stores that remember every requested range.
    #[derive(Default)]
    struct FakeSource {
        records: Vec<MealRecord>,
        holidays: Vec<Holiday>,
        profiles: Vec<Profile>,
        record_calls: RefCell<Vec<DateRange>>,
        profile_calls: Cell<usize>,
        fail: bool,
        delay: Option<Duration>,
    }

    impl MealSource for FakeSource {
        fn fetch_records(&self, range: DateRange) -> AppResult<Vec<MealRecord>> {
            if self.fail {
                return Err(AppError::Other("connection reset".into()));
            }
            if let Some(delay) = self.delay {
                thread::sleep(delay);
            }
            self.record_calls.borrow_mut().push(range);
            Ok(self
                .records
                .iter()
                .filter(|r| range.contains_date(r.date))
                .cloned()
                .collect())
        }

        fn fetch_holidays(&self, range: DateRange) -> AppResult<Vec<Holiday>> {
            Ok(self
                .holidays
                .iter()
                .filter(|h| range.contains_date(h.date))
                .cloned()
                .collect())
        }

        fn fetch_profiles(&self, ids: &[i64]) -> AppResult<Vec<Profile>> {
            self.profile_calls.set(self.profile_calls.get() + 1);
            Ok(self
                .profiles
                .iter()
                .filter(|p| ids.contains(&p.id))
                .cloned()
                .collect())
        }
    }

    fn assert_dense(window: &MealWindow) {
        let days = window.days();
        for pair in days.windows(2) {
            assert_eq!(shift_days(pair[0].date, 1), pair[1].date, "gap or duplicate");
        }
        let loaded = window.loaded().expect("loaded");
        assert_eq!(days.first().map(|x| x.date), Some(loaded.start));
        assert_eq!(days.last().map(|x| x.date), Some(loaded.end));
    }

    const WAIT: Duration = Duration::from_secs(10);

    #[test]
    fn week_and_month_ranges() {
        let today = d(2026, 3, 12);
        assert_eq!(
            required_range(ViewKind::Week, 0, today, floor()).expect("range"),
            Some(DateRange::new(d(2026, 3, 9), d(2026, 3, 15)))
        );
        assert_eq!(
            required_range(ViewKind::Month, -1, today, floor()).expect("range"),
            Some(DateRange::new(d(2026, 2, 1), d(2026, 2, 28)))
        );
    }

    #[test]
    fn ranges_are_clamped_to_the_floor() {
        // the week of 2026-01-01 starts on Monday 2025-12-29
        assert_eq!(
            required_range(ViewKind::Week, 0, d(2026, 1, 1), floor()).expect("range"),
            Some(DateRange::new(d(2026, 1, 1), d(2026, 1, 4)))
        );
        assert_eq!(
            required_range(ViewKind::Month, -1, d(2026, 1, 10), floor()).expect("range"),
            None
        );
        assert_eq!(
            padded_range(ViewKind::Month, 0, d(2026, 3, 10), floor(), 3).expect("range"),
            Some(DateRange::new(d(2026, 1, 1), d(2026, 6, 30)))
        );
    }

    #[test]
    fn month_offsets_clamp_the_day() {
        // 2026-01-31 one month on is February, not March
        assert_eq!(
            required_range(ViewKind::Month, 1, d(2026, 1, 31), floor()).expect("range"),
            Some(DateRange::new(d(2026, 2, 1), d(2026, 2, 28)))
        );
    }

    #[test]
    fn out_of_calendar_offsets_are_rejected() {
        let today = d(2026, 3, 10);
        for (view, offset) in [
            (ViewKind::Week, 2_000_000_000_000_000_000),
            (ViewKind::Week, i64::MIN),
            (ViewKind::Month, 99_999_999_999),
            (ViewKind::Month, -99_999_999_999),
        ] {
            assert!(matches!(
                required_range(view, offset, today, floor()),
                Err(AppError::Validation(_))
            ));
            assert!(matches!(
                padded_range(view, offset, today, floor(), 3),
                Err(AppError::Validation(_))
            ));
        }

        let window = MealWindow::new(floor(), "%H:%M");
        assert!(window.week_days(i64::MAX, today).is_empty());
        assert!(window.month_days(i64::MIN, today).is_empty());
    }

    #[test]
    fn view_kind_parses_short_forms() {
        assert_eq!("Week".parse::<ViewKind>().unwrap(), ViewKind::Week);
        assert_eq!("m".parse::<ViewKind>().unwrap(), ViewKind::Month);
        assert!("year".parse::<ViewKind>().is_err());
    }

    #[test]
    fn builds_dense_days_with_holiday_overlay_and_provenance() {
        let range = DateRange::new(d(2026, 3, 9), d(2026, 3, 15));
        let records = vec![record(d(2026, 3, 10), true, 7), record(d(2026, 3, 11), false, 8)];
        let holidays = vec![Holiday {
            id: 1,
            date: d(2026, 3, 11),
            name: "Munkaszüneti nap".into(),
            description: None,
            created_by: 7,
        }];
        let profiles = vec![profile(7, Some("Kovács Anna"))];

        let days = build_days(range, &records, &holidays, &profiles, "%H:%M");
        assert_eq!(days.len(), 7);

        let tue = &days[1];
        assert_eq!(tue.status, DayStatus::Had);
        assert_eq!(tue.meal_name.as_deref(), Some("Gulyás"));
        assert_eq!(tue.team, Some(Team::A));
        assert_eq!(tue.recorded_by.as_deref(), Some("Kovács Anna"));
        assert!(tue.recorded_at.as_deref().is_some_and(|t| t.len() == 5));

        let wed = &days[2];
        assert!(wed.is_holiday);
        assert_eq!(wed.status, DayStatus::NotHad);
        assert_eq!(wed.recorded_by.as_deref(), Some(UNKNOWN_RECORDER));

        assert_eq!(days[0].status, DayStatus::Unfilled);
        assert!(days[0].recorded_by.is_none());
    }

    #[test]
    fn loads_only_the_missing_edges() {
        let source = FakeSource::default();
        let mut window = MealWindow::new(floor(), "%H:%M");

        let march = DateRange::new(d(2026, 3, 1), d(2026, 3, 31));
        window.ensure_loaded(&source, march, WAIT).expect("march");

        let feb_to_apr = DateRange::new(d(2026, 2, 1), d(2026, 4, 30));
        window.ensure_loaded(&source, feb_to_apr, WAIT).expect("widen");

        assert_eq!(
            *source.record_calls.borrow(),
            vec![
                march,
                DateRange::new(d(2026, 2, 1), d(2026, 2, 28)),
                DateRange::new(d(2026, 4, 1), d(2026, 4, 30)),
            ]
        );
        assert_eq!(window.loaded(), Some(feb_to_apr));
        assert_eq!(window.days().len(), 28 + 31 + 30);
        assert_dense(&window);
    }

    #[test]
    fn contained_ranges_are_never_refetched() {
        let source = FakeSource::default();
        let mut window = MealWindow::new(floor(), "%H:%M");
        let q1 = DateRange::new(d(2026, 1, 1), d(2026, 3, 31));
        window.ensure_loaded(&source, q1, WAIT).expect("load");

        let week = DateRange::new(d(2026, 2, 2), d(2026, 2, 8));
        assert_eq!(window.plan(week), Plan::Satisfied);
        window.ensure_loaded(&source, week, WAIT).expect("again");
        assert_eq!(source.record_calls.borrow().len(), 1);
    }

    #[test]
    fn disjoint_request_fills_the_gap() {
        let source = FakeSource::default();
        let mut window = MealWindow::new(floor(), "%H:%M");
        window
            .ensure_loaded(&source, DateRange::new(d(2026, 1, 5), d(2026, 1, 11)), WAIT)
            .expect("first");
        window
            .ensure_loaded(&source, DateRange::new(d(2026, 3, 2), d(2026, 3, 8)), WAIT)
            .expect("second");

        assert_eq!(
            window.loaded(),
            Some(DateRange::new(d(2026, 1, 5), d(2026, 3, 8)))
        );
        assert_dense(&window);
    }

    #[test]
    fn never_loads_before_the_floor() {
        let source = FakeSource::default();
        let mut window = MealWindow::new(floor(), "%H:%M");
        window
            .ensure_loaded(&source, DateRange::new(d(2025, 11, 1), d(2026, 1, 31)), WAIT)
            .expect("load");

        assert_eq!(window.days().first().map(|x| x.date), Some(floor()));
        assert_eq!(source.record_calls.borrow()[0].start, floor());
    }

    #[test]
    fn one_profile_lookup_per_fetched_range() {
        let source = FakeSource {
            records: vec![
                record(d(2026, 3, 2), true, 1),
                record(d(2026, 3, 3), true, 2),
                record(d(2026, 3, 4), true, 1),
            ],
            profiles: vec![profile(1, None), profile(2, Some("Béla"))],
            ..FakeSource::default()
        };
        let mut window = MealWindow::new(floor(), "%H:%M");
        window
            .ensure_loaded(&source, DateRange::new(d(2026, 3, 1), d(2026, 3, 31)), WAIT)
            .expect("load");

        assert_eq!(source.profile_calls.get(), 1);
        assert_eq!(
            window.day(d(2026, 3, 2)).and_then(|x| x.recorded_by.as_deref()),
            Some("user1")
        );
        assert_eq!(
            window.day(d(2026, 3, 3)).and_then(|x| x.recorded_by.as_deref()),
            Some("Béla")
        );
    }

    #[test]
    fn failed_fetch_keeps_previous_window() {
        let good = FakeSource::default();
        let mut window = MealWindow::new(floor(), "%H:%M");
        let march = DateRange::new(d(2026, 3, 1), d(2026, 3, 31));
        window.ensure_loaded(&good, march, WAIT).expect("load");
        let before = window.days().to_vec();

        let broken = FakeSource {
            fail: true,
            ..FakeSource::default()
        };
        let err = window
            .ensure_loaded(&broken, DateRange::new(d(2026, 3, 1), d(2026, 5, 31)), WAIT)
            .unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
        assert_eq!(window.days(), before.as_slice());
        assert_eq!(window.loaded(), Some(march));
        assert!(!window.is_fetching());
    }

    #[test]
    fn slow_fetch_is_treated_as_failure() {
        let slow = FakeSource {
            delay: Some(Duration::from_millis(20)),
            ..FakeSource::default()
        };
        let mut window = MealWindow::new(floor(), "%H:%M");
        let err = window
            .ensure_loaded(&slow, DateRange::new(d(2026, 3, 1), d(2026, 3, 7)), Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, AppError::FetchTimeout(0)));
        assert!(window.days().is_empty());
        assert_eq!(window.loaded(), None);
        assert!(!window.is_fetching());
    }

    #[test]
    fn second_request_is_queued_while_fetching() {
        let mut window = MealWindow::new(floor(), "%H:%M");
        let march = DateRange::new(d(2026, 3, 1), d(2026, 3, 31));
        let april = DateRange::new(d(2026, 4, 1), d(2026, 4, 30));

        let Plan::Fetch(first) = window.plan(march) else {
            panic!("expected a fetch");
        };
        assert!(window.is_fetching());
        assert_eq!(window.plan(april), Plan::Queued);

        let fetched = vec![Fetched {
            range: Some(march),
            ..Fetched::default()
        }];
        assert_eq!(window.apply(&first, fetched), Some(april));
        assert!(!window.is_fetching());

        let Plan::Fetch(second) = window.plan(april) else {
            panic!("expected a fetch");
        };
        assert_eq!(second.missing, vec![april]);
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut window = MealWindow::new(floor(), "%H:%M");
        let march = DateRange::new(d(2026, 3, 1), d(2026, 3, 31));
        let june = DateRange::new(d(2026, 6, 1), d(2026, 6, 30));

        let Plan::Fetch(old) = window.plan(march) else {
            panic!("expected a fetch");
        };
        window.abort(&old);

        let Plan::Fetch(new) = window.plan(june) else {
            panic!("expected a fetch");
        };
        window.apply(
            &new,
            vec![Fetched {
                range: Some(june),
                ..Fetched::default()
            }],
        );
        let after_new = window.days().to_vec();

        window.apply(
            &old,
            vec![Fetched {
                range: Some(march),
                records: vec![record(d(2026, 3, 10), true, 1)],
                ..Fetched::default()
            }],
        );
        assert_eq!(window.days(), after_new.as_slice());
        assert_eq!(window.loaded(), Some(june));
    }

    #[test]
    fn aborted_results_arriving_before_the_newer_fetch_are_dropped() {
        let mut window = MealWindow::new(floor(), "%H:%M");
        let march = DateRange::new(d(2026, 3, 1), d(2026, 3, 31));
        let june = DateRange::new(d(2026, 6, 1), d(2026, 6, 30));

        let Plan::Fetch(old) = window.plan(march) else {
            panic!("expected a fetch");
        };
        window.abort(&old);

        let Plan::Fetch(new) = window.plan(june) else {
            panic!("expected a fetch");
        };

        let queued = window.apply(
            &old,
            vec![Fetched {
                range: Some(march),
                records: vec![record(d(2026, 3, 10), true, 1)],
                ..Fetched::default()
            }],
        );
        assert_eq!(queued, None);
        assert!(window.days().is_empty());
        assert_eq!(window.loaded(), None);
        assert!(window.is_fetching());

        window.apply(
            &new,
            vec![Fetched {
                range: Some(june),
                ..Fetched::default()
            }],
        );
        assert_eq!(window.loaded(), Some(june));
        assert_eq!(window.days().len(), june.len());
        assert!(window.day(d(2026, 3, 10)).is_none());
        assert!(!window.is_fetching());
    }

    #[test]
    fn applying_the_same_fetch_twice_is_a_no_op() {
        let mut window = MealWindow::new(floor(), "%H:%M");
        let march = DateRange::new(d(2026, 3, 1), d(2026, 3, 31));

        let Plan::Fetch(plan) = window.plan(march) else {
            panic!("expected a fetch");
        };
        window.apply(
            &plan,
            vec![Fetched {
                range: Some(march),
                ..Fetched::default()
            }],
        );
        window.apply(
            &plan,
            vec![Fetched {
                range: Some(march),
                records: vec![record(d(2026, 3, 10), true, 1)],
                ..Fetched::default()
            }],
        );

        assert_eq!(window.days().len(), 31);
        assert_eq!(
            window.day(d(2026, 3, 10)).map(|day| day.status),
            Some(DayStatus::Unfilled)
        );
    }

    #[test]
    fn single_day_updates_leave_others_untouched() {
        let source = FakeSource {
            records: vec![record(d(2026, 3, 9), false, 1)],
            ..FakeSource::default()
        };
        let mut window = MealWindow::new(floor(), "%H:%M");
        window
            .ensure_loaded(&source, DateRange::new(d(2026, 3, 1), d(2026, 3, 31)), WAIT)
            .expect("load");
        let before = window.days().to_vec();

        let saved = record(d(2026, 3, 10), true, 2);
        window.apply_saved(&saved, Some(&profile(2, Some("Anna"))));

        for (old, new) in before.iter().zip(window.days()) {
            if old.date == d(2026, 3, 10) {
                assert_eq!(new.status, DayStatus::Had);
                assert_eq!(new.recorded_by.as_deref(), Some("Anna"));
            } else {
                assert_eq!(old, new);
            }
        }

        window.apply_deleted(d(2026, 3, 10));
        assert_eq!(window.days(), before.as_slice());
    }

    #[test]
    fn week_and_month_slices() {
        let source = FakeSource::default();
        let mut window = MealWindow::new(floor(), "%H:%M");
        let today = d(2026, 3, 12);
        let range = padded_range(ViewKind::Month, 0, today, floor(), 3)
            .expect("range")
            .expect("after the floor");
        window.ensure_loaded(&source, range, WAIT).expect("load");

        let week = window.week_days(0, today);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, d(2026, 3, 9));
        assert_eq!(window.month_days(1, today).len(), 30);
        assert_eq!(window.month_days(-5, today).len(), 0);
    }
}
