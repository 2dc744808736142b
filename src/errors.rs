//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError so failures surface
//! the same way whether they come from SQLite, the session layer or a guard.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid team: {0} (expected A or B)")]
    InvalidTeam(String),

    #[error("Invalid view: {0} (expected week or month)")]
    InvalidView(String),

    // ---------------------------
    // Validation (rejected before any write)
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} is a holiday ({1}): meals cannot be recorded on this day")]
    HolidayLocked(String, String),

    #[error("{0} is in the future and cannot be modified")]
    FutureDate(String),

    #[error("{0} is before the first tracked day {1}")]
    BeforeFloor(String, String),

    #[error("No meal record found for date {0}")]
    NoRecordForDate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Auth / session
    // ---------------------------
    #[error("Not signed in. Run `kajalog login <email>` first")]
    NotSignedIn,

    #[error("Session check timed out after {0}s, please sign in again")]
    AuthTimeout(u64),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ---------------------------
    // Data fetch
    // ---------------------------
    #[error("Failed to load meal data: {0}")]
    Fetch(String),

    #[error("Loading meal data took longer than {0}s, showing previously loaded data")]
    FetchTimeout(u64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
