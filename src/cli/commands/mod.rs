pub mod backup;
pub mod config;
pub mod db;
pub mod del;
pub mod export;
pub mod holiday;
pub mod init;
pub mod log;
pub mod login;
pub mod remind;
pub mod set;
pub mod show;
pub mod stats;
pub mod user;

use crate::config::Config;
use crate::core::session::{Access, SessionCache, SessionContext};
use crate::core::window::{DateRange, MealWindow};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use crate::utils::date;
use chrono::{NaiveDate, Utc};
use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    DbPool::with_timeout(&cfg.database, cfg.fetch_timeout())
}

pub(crate) fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Signed-in user with access. While approval is pending the blocking
/// notice is printed and `None` is returned.
pub(crate) fn signed_in(pool: &DbPool, cfg: &Config) -> AppResult<Option<SessionCache>> {
    let ctx = SessionContext::from_config(cfg);
    match ctx.resolve(pool, Utc::now())? {
        Access::Granted(session) => Ok(Some(session)),
        Access::PendingApproval(session) => {
            pending_notice(&session);
            Ok(None)
        }
    }
}

pub(crate) fn pending_notice(session: &SessionCache) {
    warning(format!(
        "{} is waiting for approval. An administrator has to approve your account before you can see or record meals.",
        session.email
    ));
}

/// Window covering `range`. A failed load is reported and leaves the window empty.
pub(crate) fn load_window(pool: &DbPool, cfg: &Config, range: Option<DateRange>) -> MealWindow {
    let mut window = MealWindow::new(cfg.floor_date, &cfg.time_format);
    if let Some(range) = range
        && let Err(e) = window.ensure_loaded(pool, range, cfg.fetch_timeout())
    {
        warning(e);
        info("Nothing loaded; try again in a moment.");
    }
    window
}
