use crate::errors::AppResult;
use crate::models::profile::Profile;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

const PROFILE_COLUMNS: &str =
    "id, email, full_name, avatar_url, is_admin, is_approved, created_at, updated_at";

fn map_profile(row: &Row) -> Result<Profile> {
    Ok(Profile {
        id: row.get("id")?,
        email: row.get("email")?,
        full_name: row.get("full_name")?,
        avatar_url: row.get("avatar_url")?,
        is_admin: row.get::<_, i32>("is_admin")? == 1,
        is_approved: row.get::<_, i32>("is_approved")? == 1,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<Profile>> {
    let mut stmt =
        conn.prepare_cached(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_profile).optional()?)
}

pub fn find_by_email(conn: &Connection, email: &str) -> AppResult<Option<Profile>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE lower(email) = lower(?1)"
    ))?;
    Ok(stmt.query_row([email.trim()], map_profile).optional()?)
}

/// One query for the whole id set.
pub fn find_by_ids(conn: &Connection, ids: &[i64]) -> AppResult<Vec<Profile>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id IN ({placeholders})"
    ))?;

    let rows = stmt.query_map(params_from_iter(ids.iter()), map_profile)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Full scan, admins first, then by e-mail.
pub fn list_all(conn: &Connection) -> AppResult<Vec<Profile>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY is_admin DESC, email ASC"
    ))?;

    let rows = stmt.query_map([], map_profile)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_approved(conn: &Connection) -> AppResult<Vec<Profile>> {
    Ok(list_all(conn)?
        .into_iter()
        .filter(Profile::has_access)
        .collect())
}

pub fn count(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?)
}

pub fn insert_profile(
    conn: &Connection,
    email: &str,
    full_name: Option<&str>,
    is_admin: bool,
    is_approved: bool,
) -> AppResult<Profile> {
    let now = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO profiles (email, full_name, is_admin, is_approved, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            email.trim(),
            full_name,
            if is_admin { 1 } else { 0 },
            if is_approved { 1 } else { 0 },
            now,
        ],
    )?;

    Ok(Profile {
        id: conn.last_insert_rowid(),
        email: email.trim().to_string(),
        full_name: full_name.map(String::from),
        avatar_url: None,
        is_admin,
        is_approved,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub fn set_approved(conn: &Connection, id: i64, approved: bool) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE profiles SET is_approved = ?1, updated_at = ?2 WHERE id = ?3",
        params![if approved { 1 } else { 0 }, Local::now().to_rfc3339(), id],
    )?)
}
