use crate::cli::commands::{load_window, open_pool, parse_date_arg, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::EditLogic;
use crate::core::window::DateRange;
use crate::errors::{AppError, AppResult};
use crate::models::meal_record::MealEntry;
use crate::models::team::Team;
use crate::ui::messages::success;
use chrono::NaiveDate;

pub fn handle(cmd: &Commands, cfg: &Config, today: NaiveDate) -> AppResult<()> {
    if let Commands::Set {
        date,
        had,
        no,
        team,
    } = cmd
    {
        let date = parse_date_arg(date)?;

        let team = match team {
            Some(code) => Some(Team::from_code(code).ok_or_else(|| AppError::InvalidTeam(code.clone()))?),
            None => None,
        };

        let (had_meal, details) = match (had, no) {
            (Some(meal), _) => (true, meal.clone()),
            (None, Some(reason)) => (false, reason.clone()),
            (None, None) => {
                return Err(AppError::Validation(
                    "either --had <meal> or --no <reason> is required".into(),
                ));
            }
        };

        let pool = open_pool(cfg)?;
        let Some(session) = signed_in(&pool, cfg)? else {
            return Ok(());
        };

        let entry = MealEntry {
            date,
            had_meal,
            details,
            team,
        };

        let mut window = load_window(&pool, cfg, Some(DateRange::new(date, date)));
        let record =
            EditLogic::save_day(&pool, &mut window, &entry, session.user_id, today, cfg.floor_date)?;

        let team_txt = record
            .team
            .map(|t| format!(" [{}]", cfg.team_label(t)))
            .unwrap_or_default();

        match (&record.meal_name, &record.reason) {
            (Some(meal), _) => success(format!("{}: had {meal}{team_txt}", record.date)),
            (None, Some(reason)) => success(format!("{}: no meal ({reason}){team_txt}", record.date)),
            (None, None) => success(format!("{}: no meal{team_txt}", record.date)),
        }
    }

    Ok(())
}
