use crate::db::holidays;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::holiday::Holiday;
use crate::utils::date::format_date_key;
use chrono::NaiveDate;

pub struct HolidayLogic;

impl HolidayLogic {
    /// Declare `date` a holiday. Name is required; one holiday per date.
    pub fn add(
        pool: &DbPool,
        date: NaiveDate,
        name: &str,
        description: Option<&str>,
        created_by: i64,
    ) -> AppResult<Holiday> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("holiday name must not be empty".into()));
        }

        let key = format_date_key(date);
        if let Some(existing) = holidays::holiday_on(&pool.conn, date)? {
            return Err(AppError::Validation(format!(
                "{key} is already a holiday ({})",
                existing.name
            )));
        }

        let description = description.map(str::trim).filter(|s| !s.is_empty());
        let holiday = holidays::insert_holiday(&pool.conn, date, name, description, created_by)?;
        ttlog_soft(&pool.conn, "holiday_add", &key, name);

        Ok(holiday)
    }

    pub fn list(pool: &DbPool, bounds: Option<(NaiveDate, NaiveDate)>) -> AppResult<Vec<Holiday>> {
        match bounds {
            Some((start, end)) => holidays::load_holidays_in_range(&pool.conn, start, end),
            None => holidays::load_all_holidays(&pool.conn),
        }
    }

    pub fn delete(pool: &DbPool, id: i64) -> AppResult<Holiday> {
        let holiday = holidays::find_holiday(&pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("holiday #{id}")))?;

        holidays::delete_holiday(&pool.conn, id)?;
        ttlog_soft(
            &pool.conn,
            "holiday_del",
            &format_date_key(holiday.date),
            &holiday.name,
        );

        Ok(holiday)
    }
}
