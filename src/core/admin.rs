use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::{holidays, profiles, queries};
use crate::errors::{AppError, AppResult};
use crate::models::profile::Profile;
use chrono::NaiveDate;

pub struct AdminLogic;

impl AdminLogic {
    /// Users waiting for approval first, then everyone with access.
    pub fn list_users(pool: &DbPool) -> AppResult<(Vec<Profile>, Vec<Profile>)> {
        Ok(profiles::list_all(&pool.conn)?
            .into_iter()
            .partition(|p| !p.has_access()))
    }

    /// Grant or withdraw access. Returns the updated profile.
    pub fn set_approval(pool: &DbPool, email: &str, approved: bool) -> AppResult<Profile> {
        let profile = profiles::find_by_email(&pool.conn, email)?
            .ok_or_else(|| AppError::NotFound(format!("user {email}")))?;

        if !approved && profile.is_admin {
            return Err(AppError::Forbidden(format!(
                "{} is an administrator and cannot be revoked",
                profile.email
            )));
        }

        profiles::set_approved(&pool.conn, profile.id, approved)?;
        ttlog_soft(
            &pool.conn,
            if approved { "approve" } else { "revoke" },
            &profile.email,
            if approved {
                "Access granted"
            } else {
                "Access revoked"
            },
        );

        profiles::find_by_id(&pool.conn, profile.id)?
            .ok_or_else(|| AppError::NotFound(format!("user {email}")))
    }
}

/// Approved users to remind when nobody filled in `today` yet.
/// Empty on holidays, before `floor`, and once today has a record.
pub fn remind_targets(pool: &DbPool, today: NaiveDate, floor: NaiveDate) -> AppResult<Vec<Profile>> {
    if today < floor
        || holidays::holiday_on(&pool.conn, today)?.is_some()
        || queries::load_record_by_date(&pool.conn, today)?.is_some()
    {
        return Ok(Vec::new());
    }

    profiles::list_approved(&pool.conn)
}
