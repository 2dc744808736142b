use super::team::Team;
use chrono::NaiveDate;
use serde::Serialize;

/// A stored meal record; at most one per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealRecord {
    pub id: i64,
    pub date: NaiveDate,          // ⇔ meal_records.date (TEXT "YYYY-MM-DD", UNIQUE)
    pub had_meal: bool,           // ⇔ meal_records.had_meal (INT 0/1)
    pub meal_name: Option<String>, // set only when had_meal
    pub reason: Option<String>,   // set only when !had_meal
    pub recorded_by: i64,         // ⇔ profiles.id
    pub team: Option<Team>,       // ⇔ meal_records.team ('A' | 'B' | NULL)
    pub created_at: String,       // RFC 3339
    pub updated_at: String,       // RFC 3339
}

/// Input of an upsert: the fields a user chooses when saving a day.
#[derive(Debug, Clone, PartialEq)]
pub struct MealEntry {
    pub date: NaiveDate,
    pub had_meal: bool,
    pub details: String,
    pub team: Option<Team>,
}

impl MealEntry {
    /// `details` goes into `meal_name` when a meal was provided, `reason` otherwise.
    pub fn meal_name(&self) -> Option<&str> {
        self.had_meal
            .then_some(self.details.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn reason(&self) -> Option<&str> {
        (!self.had_meal)
            .then_some(self.details.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}
