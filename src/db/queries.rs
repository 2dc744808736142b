use crate::errors::{AppError, AppResult};
use crate::models::meal_record::{MealEntry, MealRecord};
use crate::models::team::Team;
use crate::utils::date::format_date_key;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const RECORD_COLUMNS: &str =
    "id, date, had_meal, meal_name, reason, recorded_by, team, created_at, updated_at";

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

/// Parse a `YYYY-MM-DD` column value.
pub(crate) fn date_from_row(row: &Row, column: &str) -> Result<NaiveDate> {
    let date_str: String = row.get(column)?;
    NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(date_str.clone())))
}

pub fn map_row(row: &Row) -> Result<MealRecord> {
    let team = match row.get::<_, Option<String>>("team")? {
        Some(code) => Some(
            Team::from_db_str(&code).ok_or_else(|| conversion_error(AppError::InvalidTeam(code)))?,
        ),
        None => None,
    };

    Ok(MealRecord {
        id: row.get("id")?,
        date: date_from_row(row, "date")?,
        had_meal: row.get::<_, i32>("had_meal")? == 1,
        meal_name: row.get("meal_name")?,
        reason: row.get("reason")?,
        recorded_by: row.get("recorded_by")?,
        team,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Records with `start <= date <= end`, oldest first.
pub fn load_records_in_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<MealRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {RECORD_COLUMNS} FROM meal_records
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY date ASC"
    ))?;

    let rows = stmt.query_map(
        params![format_date_key(start), format_date_key(end)],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_all_records(conn: &Connection) -> AppResult<Vec<MealRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {RECORD_COLUMNS} FROM meal_records ORDER BY date ASC"
    ))?;

    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_record_by_date(conn: &Connection, date: NaiveDate) -> AppResult<Option<MealRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {RECORD_COLUMNS} FROM meal_records WHERE date = ?1"
    ))?;

    Ok(stmt
        .query_row([format_date_key(date)], map_row)
        .optional()?)
}

/// Insert or replace the record of `entry.date`, keeping the original `created_at`.
pub fn upsert_record(conn: &Connection, entry: &MealEntry, recorded_by: i64) -> AppResult<MealRecord> {
    let now = Local::now().to_rfc3339();

    conn.execute(
        "INSERT INTO meal_records
            (date, had_meal, meal_name, reason, recorded_by, team, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
         ON CONFLICT(date) DO UPDATE SET
            had_meal    = excluded.had_meal,
            meal_name   = excluded.meal_name,
            reason      = excluded.reason,
            recorded_by = excluded.recorded_by,
            team        = excluded.team,
            updated_at  = excluded.updated_at",
        params![
            format_date_key(entry.date),
            if entry.had_meal { 1 } else { 0 },
            entry.meal_name(),
            entry.reason(),
            recorded_by,
            entry.team.map(|t| t.to_db_str()),
            now,
        ],
    )?;

    load_record_by_date(conn, entry.date)?
        .ok_or_else(|| AppError::Other(format!("record for {} vanished after upsert", entry.date)))
}

/// Delete the record of `date`. Returns how many rows were removed (0 or 1).
pub fn delete_record_by_date(conn: &Connection, date: NaiveDate) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM meal_records WHERE date = ?1",
        [format_date_key(date)],
    )?)
}
