use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::db::migrate::run_pending_migrations;
use crate::db::stats;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;

fn size_kb(path: &str) -> f64 {
    fs::metadata(path).map(|m| m.len() as f64 / 1024.0).unwrap_or(0.0)
}

/// `db --migrate | --info | --check | --vacuum`, in that order when combined.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    {
        if !(*migrate || *check || *vacuum || *show_info) {
            info("Nothing to do: pass --migrate, --check, --vacuum or --info.");
            return Ok(());
        }

        // pending migrations run on open
        let pool = open_pool(cfg)?;

        if *migrate {
            run_pending_migrations(&pool.conn)?;
            success("Database schema is up to date.");
        }

        if *show_info {
            stats::print_db_info(&pool, &cfg.database)?;
        }

        if *check {
            let problems = pool.integrity_problems()?;
            if !problems.is_empty() {
                for p in &problems {
                    warning(p);
                }
                return Err(AppError::Other(format!(
                    "integrity check of {} failed with {} problem(s)",
                    cfg.database,
                    problems.len()
                )));
            }
            success("Integrity check passed.");
        }

        if *vacuum {
            let before = size_kb(&cfg.database);
            pool.vacuum()?;
            let after = size_kb(&cfg.database);

            ttlog_soft(&pool.conn, "vacuum", &cfg.database, "Database compacted");
            success(format!("Vacuum completed: {before:.1} KB -> {after:.1} KB"));
        }
    }

    Ok(())
}
