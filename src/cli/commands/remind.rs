use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::admin::remind_targets;
use crate::core::session::SessionContext;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use chrono::{NaiveDate, Utc};

pub fn handle(cmd: &Commands, cfg: &Config, today: NaiveDate) -> AppResult<()> {
    if matches!(cmd, Commands::Remind) {
        let pool = open_pool(cfg)?;
        SessionContext::from_config(cfg).require_admin(&pool, Utc::now())?;

        let targets = remind_targets(&pool, today, cfg.floor_date)?;
        if targets.is_empty() {
            info(format!("No reminders needed for {today}."));
            return Ok(());
        }

        warning(format!("Nobody recorded the meal of {today} yet. Would remind:"));
        for p in &targets {
            println!("  📧 {} <{}>", p.display_name(), p.email);
        }
        info("Dry run: no e-mail was sent.");
    }

    Ok(())
}
