use crate::cli::commands::{load_window, open_pool, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::{calculate_period_stats, total_unfilled};
use crate::core::window::{ViewKind, padded_range, required_range};
use crate::errors::AppResult;
use crate::models::day_record::{DayRecord, DayStatus};
use crate::ui::messages::{header, info, warning};
use crate::utils::colors::{GREY, RESET, YELLOW, color_for_day, paint};
use crate::utils::date::{format_date_key, is_same_day, month_name, weekday_short};
use crate::utils::table::Table;
use chrono::{Datelike, NaiveDate};

pub fn handle(cmd: &Commands, cfg: &Config, today: NaiveDate) -> AppResult<()> {
    if let Commands::Show { view, offset } = cmd {
        let view: ViewKind = view.parse()?;

        let pool = open_pool(cfg)?;
        if signed_in(&pool, cfg)?.is_none() {
            return Ok(());
        }

        let Some(needed) = required_range(view, *offset, today, cfg.floor_date)? else {
            warning(format!(
                "Nothing to show before {}.",
                format_date_key(cfg.floor_date)
            ));
            return Ok(());
        };

        let padded = padded_range(view, *offset, today, cfg.floor_date, cfg.window_margin_months)?;
        let window = load_window(&pool, cfg, padded);
        let days = window.slice(needed);

        let title = match view {
            ViewKind::Week => format!(
                "Week {} .. {}",
                format_date_key(needed.start),
                format_date_key(needed.end)
            ),
            ViewKind::Month => format!("{} {}", month_name(needed.start.month()), needed.start.year()),
        };
        header(title);

        if days.is_empty() {
            info("No data loaded for this period.");
            return Ok(());
        }

        print_days(days, cfg, today);

        let stats = calculate_period_stats(days, today);
        println!();
        println!(
            "🍲 had: {}   🚫 no: {}   ⬜ empty: {}   🎉 holidays: {}   ({} / {} days elapsed)",
            stats.had_meal,
            stats.no_meal,
            stats.unfilled,
            stats.holidays,
            stats.elapsed_days,
            stats.total_days
        );

        let missing = total_unfilled(window.days(), today);
        if missing > 0 {
            println!(
                "{YELLOW}⚠ {missing} elapsed day(s) without a record in the loaded window{RESET}"
            );
        }
    }

    Ok(())
}

fn status_label(day: &DayRecord, today: NaiveDate) -> String {
    let label = if day.is_holiday {
        "holiday"
    } else if day.status == DayStatus::Unfilled && day.date > today {
        "--"
    } else {
        day.status.as_str()
    };
    paint(color_for_day(day), label)
}

fn print_days(days: &[DayRecord], cfg: &Config, today: NaiveDate) {
    let mut table = Table::new(vec![
        "Date", "Day", "Status", "Meal / reason", "Team", "Recorded by", "At",
    ]);

    for day in days {
        let mut date = format_date_key(day.date);
        if is_same_day(day.date, today) {
            date.push_str(" *");
        }

        let details = match (&day.holiday_name, &day.meal_name, &day.reason) {
            (Some(h), _, _) if day.is_holiday => h.clone(),
            (_, Some(meal), _) => meal.clone(),
            (_, None, Some(reason)) => reason.clone(),
            _ => format!("{GREY}--{RESET}"),
        };

        table.add_row(vec![
            date,
            weekday_short(day.date).to_string(),
            status_label(day, today),
            details,
            day.team
                .map(|t| cfg.team_label(t).to_string())
                .unwrap_or_default(),
            day.recorded_by.clone().unwrap_or_default(),
            day.recorded_at.clone().unwrap_or_default(),
        ]);
    }

    print!("{}", table.render());
}
