use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists. Applied migrations are tracked in it.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260101_0001_create_profiles",
        description: "Created profiles table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            email        TEXT NOT NULL UNIQUE,
            full_name    TEXT,
            avatar_url   TEXT,
            is_admin     INTEGER NOT NULL DEFAULT 0,
            is_approved  INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260101_0002_create_meal_records",
        description: "Created meal_records table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS meal_records (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            date         TEXT NOT NULL UNIQUE,
            had_meal     INTEGER NOT NULL,
            meal_name    TEXT,
            reason       TEXT,
            recorded_by  INTEGER NOT NULL REFERENCES profiles(id),
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_meal_records_date ON meal_records(date);
        "#,
    },
    Migration {
        version: "20260101_0003_create_holidays",
        description: "Created holidays table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS holidays (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            date         TEXT NOT NULL UNIQUE,
            name         TEXT NOT NULL,
            description  TEXT,
            created_by   INTEGER NOT NULL REFERENCES profiles(id),
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_holidays_date ON holidays(date);
        "#,
    },
    Migration {
        version: "20260115_0004_add_team_to_meal_records",
        description: "Added team column to meal_records",
        sql: r#"
        ALTER TABLE meal_records
            ADD COLUMN team TEXT CHECK(team IN ('A','B'));
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Public entry point: run all pending migrations, oldest first.
///
/// Called on every database open; already applied migrations are skipped.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {}", m.version));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info('{table}')"))
            .expect("pragma");
        stmt.query_map([], |row| row.get::<_, String>(1))
            .expect("query")
            .map(|c| c.expect("column"))
            .collect()
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().expect("memory db");
        run_pending_migrations(&conn).expect("first run");
        run_pending_migrations(&conn).expect("second run");

        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(applied as usize, MIGRATIONS.len());
        assert!(column_names(&conn, "meal_records").contains(&"team".to_string()));
    }

    #[test]
    fn team_column_rejects_unknown_codes() {
        let conn = Connection::open_in_memory().expect("memory db");
        run_pending_migrations(&conn).expect("migrate");
        conn.execute(
            "INSERT INTO profiles (email, created_at, updated_at) VALUES ('a@b.c', '', '')",
            [],
        )
        .expect("profile");

        let bad = conn.execute(
            "INSERT INTO meal_records (date, had_meal, recorded_by, team, created_at, updated_at)
             VALUES ('2026-03-10', 1, 1, 'C', '', '')",
            [],
        );
        assert!(bad.is_err());
    }
}
