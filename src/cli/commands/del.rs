use crate::cli::commands::{ask_confirmation, load_window, open_pool, parse_date_arg, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::EditLogic;
use crate::core::window::DateRange;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use chrono::NaiveDate;

pub fn handle(cmd: &Commands, cfg: &Config, today: NaiveDate) -> AppResult<()> {
    if let Commands::Del { date } = cmd {
        let d = parse_date_arg(date)?;

        let pool = open_pool(cfg)?;
        if signed_in(&pool, cfg)?.is_none() {
            return Ok(());
        }

        if !ask_confirmation(&format!(
            "Delete the meal record of {d}? This action is irreversible."
        )) {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut window = load_window(&pool, cfg, Some(DateRange::new(d, d)));
        EditLogic::delete_day(&pool, &mut window, d, today, cfg.floor_date)?;

        success(format!("The record of {d} has been deleted."));
    }

    Ok(())
}
