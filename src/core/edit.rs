//! Saving and deleting a single day.
//!
//! Every write is preceded by [`guard_editable`]; a rejected date never
//! reaches the database.

use crate::core::window::MealWindow;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::{holidays, profiles, queries};
use crate::errors::{AppError, AppResult};
use crate::models::holiday::Holiday;
use crate::models::meal_record::{MealEntry, MealRecord};
use crate::utils::date::{format_date_key, is_future_date};
use chrono::NaiveDate;

/// Holidays, future dates and dates before `floor` are read-only.
pub fn guard_editable(
    date: NaiveDate,
    today: NaiveDate,
    floor: NaiveDate,
    holiday: Option<&Holiday>,
) -> AppResult<()> {
    if date < floor {
        return Err(AppError::BeforeFloor(
            format_date_key(date),
            format_date_key(floor),
        ));
    }
    if is_future_date(date, today) {
        return Err(AppError::FutureDate(format_date_key(date)));
    }
    if let Some(h) = holiday {
        return Err(AppError::HolidayLocked(format_date_key(date), h.name.clone()));
    }
    Ok(())
}

pub struct EditLogic;

impl EditLogic {
    /// Upsert the record of `entry.date` and refresh that one day in `window`.
    pub fn save_day(
        pool: &DbPool,
        window: &mut MealWindow,
        entry: &MealEntry,
        user_id: i64,
        today: NaiveDate,
        floor: NaiveDate,
    ) -> AppResult<MealRecord> {
        if entry.had_meal && entry.meal_name().is_none() {
            return Err(AppError::Validation("meal name must not be empty".into()));
        }

        let holiday = holidays::holiday_on(&pool.conn, entry.date)?;
        guard_editable(entry.date, today, floor, holiday.as_ref())?;

        let record = queries::upsert_record(&pool.conn, entry, user_id)?;
        let recorder = profiles::find_by_id(&pool.conn, user_id)?;
        window.apply_saved(&record, recorder.as_ref());

        let what = match (&record.meal_name, &record.reason) {
            (Some(meal), _) => format!("had: {meal}"),
            (None, Some(reason)) => format!("no meal: {reason}"),
            (None, None) => "no meal".to_string(),
        };
        ttlog_soft(&pool.conn, "save", &format_date_key(entry.date), &what);

        Ok(record)
    }

    /// Delete the record of `date` and reset that one day in `window`.
    pub fn delete_day(
        pool: &DbPool,
        window: &mut MealWindow,
        date: NaiveDate,
        today: NaiveDate,
        floor: NaiveDate,
    ) -> AppResult<()> {
        let holiday = holidays::holiday_on(&pool.conn, date)?;
        guard_editable(date, today, floor, holiday.as_ref())?;

        let key = format_date_key(date);
        if queries::delete_record_by_date(&pool.conn, date)? == 0 {
            return Err(AppError::NoRecordForDate(key));
        }

        window.apply_deleted(date);
        ttlog_soft(&pool.conn, "delete", &key, "Record deleted");

        Ok(())
    }
}
