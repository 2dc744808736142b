use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date::parse_date;
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, table: &str) -> AppResult<i64> {
    Ok(pool
        .conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?)
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let records = count(pool, "meal_records")?;
    let holidays = count(pool, "holidays")?;
    let profiles = count(pool, "profiles")?;
    println!("{}• Meal records:{} {}{}{}", CYAN, RESET, GREEN, records, RESET);
    println!("{}• Holidays:{} {}{}{}", CYAN, RESET, GREEN, holidays, RESET);
    println!("{}• Users:{} {}{}{}", CYAN, RESET, GREEN, profiles, RESET);

    //
    // 3) DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM meal_records ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM meal_records ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first_date
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) MEAL RATE
    //
    if records > 0 {
        let had: i64 = pool.conn.query_row(
            "SELECT COUNT(*) FROM meal_records WHERE had_meal = 1",
            [],
            |row| row.get(0),
        )?;
        println!(
            "{}• Meal rate:{} {:.1}%",
            CYAN,
            RESET,
            had as f64 * 100.0 / records as f64
        );
    }

    if let (Some(f), Some(l)) = (
        first_date.as_deref().and_then(parse_date),
        last_date.as_deref().and_then(parse_date),
    ) {
        let days = (l - f).num_days() + 1;
        println!("{}• Days covered:{} {}", CYAN, RESET, days);
    }

    println!();
    Ok(())
}
