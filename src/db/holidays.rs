use crate::db::queries::date_from_row;
use crate::errors::AppResult;
use crate::models::holiday::Holiday;
use crate::utils::date::format_date_key;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_holiday(row: &Row) -> Result<Holiday> {
    Ok(Holiday {
        id: row.get("id")?,
        date: date_from_row(row, "date")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_by: row.get("created_by")?,
    })
}

pub fn load_holidays_in_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<Holiday>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, name, description, created_by FROM holidays
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY date ASC",
    )?;

    let rows = stmt.query_map(
        params![format_date_key(start), format_date_key(end)],
        map_holiday,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_all_holidays(conn: &Connection) -> AppResult<Vec<Holiday>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, name, description, created_by FROM holidays ORDER BY date ASC",
    )?;

    let rows = stmt.query_map([], map_holiday)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn holiday_on(conn: &Connection, date: NaiveDate) -> AppResult<Option<Holiday>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, name, description, created_by FROM holidays WHERE date = ?1",
    )?;
    Ok(stmt
        .query_row([format_date_key(date)], map_holiday)
        .optional()?)
}

pub fn find_holiday(conn: &Connection, id: i64) -> AppResult<Option<Holiday>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, name, description, created_by FROM holidays WHERE id = ?1",
    )?;
    Ok(stmt.query_row([id], map_holiday).optional()?)
}

pub fn insert_holiday(
    conn: &Connection,
    date: NaiveDate,
    name: &str,
    description: Option<&str>,
    created_by: i64,
) -> AppResult<Holiday> {
    conn.execute(
        "INSERT INTO holidays (date, name, description, created_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            format_date_key(date),
            name,
            description,
            created_by,
            Local::now().to_rfc3339(),
        ],
    )?;

    Ok(Holiday {
        id: conn.last_insert_rowid(),
        date,
        name: name.to_string(),
        description: description.map(String::from),
        created_by,
    })
}

pub fn delete_holiday(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM holidays WHERE id = ?1", [id])?)
}
