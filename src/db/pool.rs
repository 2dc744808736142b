//! SQLite connection wrapper (lightweight for CLI usage).

use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub struct DbPool {
    pub conn: Connection,
    /// Upper bound for a single fetch, also used as SQLite busy timeout.
    pub timeout: Duration,
}

impl DbPool {
    /// Open the database and bring its schema up to date.
    pub fn new(path: &str) -> AppResult<Self> {
        Self::with_timeout(path, Duration::from_secs(10))
    }

    pub fn with_timeout(path: &str, timeout: Duration) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.busy_timeout(timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        run_pending_migrations(&conn)?;
        Ok(Self { conn, timeout })
    }

    /// Lines reported by `PRAGMA integrity_check`; empty when the file is sound.
    pub fn integrity_problems(&self) -> AppResult<Vec<String>> {
        let mut stmt = self.conn.prepare("PRAGMA integrity_check")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut problems = Vec::new();
        for r in rows {
            let line = r?;
            if line != "ok" {
                problems.push(line);
            }
        }
        Ok(problems)
    }

    pub fn vacuum(&self) -> AppResult<()> {
        self.conn.execute_batch("VACUUM;")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_db(name: &str) -> String {
        let path = std::env::temp_dir().join(format!("kajalog_pool_{name}_{}.sqlite", std::process::id()));
        let _ = fs::remove_file(&path);
        path.to_string_lossy().to_string()
    }

    #[test]
    fn fresh_database_passes_integrity_check_and_vacuum() {
        let path = temp_db("maintenance");
        let pool = DbPool::with_timeout(&path, Duration::from_secs(1)).expect("open");

        assert!(pool.integrity_problems().expect("check").is_empty());
        pool.vacuum().expect("vacuum");

        let tables: i64 = pool
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('profiles', 'meal_records', 'holidays', 'log')",
                [],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(tables, 4);

        let _ = fs::remove_file(&path);
    }
}
