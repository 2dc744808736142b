use crate::cli::commands::{ask_confirmation, open_pool, parse_date_arg, signed_in};
use crate::cli::parser::{Commands, HolidayAction};
use crate::config::Config;
use crate::core::holidays::HolidayLogic;
use crate::core::session::SessionContext;
use crate::errors::AppResult;
use crate::export::range::parse_range;
use crate::ui::messages::{info, success};
use crate::utils::colors::colorize_optional;
use crate::utils::date::{format_date_key, weekday_short};
use crate::utils::table::Table;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Holiday { action } = cmd {
        let pool = open_pool(cfg)?;
        let ctx = SessionContext::from_config(cfg);

        match action {
            HolidayAction::Add {
                date,
                name,
                description,
            } => {
                let date = parse_date_arg(date)?;
                let admin = ctx.require_admin(&pool, Utc::now())?;
                let h = HolidayLogic::add(&pool, date, name, description.as_deref(), admin.user_id)?;
                success(format!("Holiday #{} added: {} {}", h.id, h.date, h.name));
            }

            HolidayAction::List { period } => {
                if signed_in(&pool, cfg)?.is_none() {
                    return Ok(());
                }

                let bounds = match period {
                    Some(p) => Some(parse_range(p)?),
                    None => None,
                };
                let list = HolidayLogic::list(&pool, bounds)?;

                if list.is_empty() {
                    info("No holidays found.");
                    return Ok(());
                }

                let mut table = Table::new(vec!["Id", "Date", "Day", "Name", "Description"]);
                for h in &list {
                    table.add_row(vec![
                        h.id.to_string(),
                        format_date_key(h.date),
                        weekday_short(h.date).to_string(),
                        h.name.clone(),
                        colorize_optional(h.description.as_deref().unwrap_or("--")),
                    ]);
                }
                print!("{}", table.render());
            }

            HolidayAction::Del { id } => {
                ctx.require_admin(&pool, Utc::now())?;

                if !ask_confirmation(&format!("Delete holiday #{id}?")) {
                    info("Operation cancelled.");
                    return Ok(());
                }

                let h = HolidayLogic::delete(&pool, *id)?;
                success(format!("Holiday #{} ({} {}) has been deleted.", h.id, h.date, h.name));
            }
        }
    }

    Ok(())
}
