use super::team::Team;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayStatus {
    Had,
    NotHad,
    #[default]
    Unfilled,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Had => "had",
            DayStatus::NotHad => "not-had",
            DayStatus::Unfilled => "unfilled",
        }
    }
}

/// Per-date view-model: a stored record (if any) merged with the holiday overlay.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub meal_name: Option<String>,
    pub reason: Option<String>,
    pub team: Option<Team>,
    pub recorded_by: Option<String>,
    pub recorded_at: Option<String>,
    pub is_holiday: bool,
    pub holiday_name: Option<String>,
}

impl DayRecord {
    /// An empty day with no record and no holiday.
    pub fn unfilled(date: NaiveDate) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }

    /// Drop everything that came from a stored record, keeping the holiday overlay.
    pub fn clear_record(&mut self) {
        self.status = DayStatus::Unfilled;
        self.meal_name = None;
        self.reason = None;
        self.team = None;
        self.recorded_by = None;
        self.recorded_at = None;
    }
}
