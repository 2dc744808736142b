use crate::cli::commands::{load_window, open_pool, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::{
    MonthHistory, PeriodStats, build_report, history_for_year, history_years, streaks,
};
use crate::core::window::DateRange;
use crate::db::{holidays, queries};
use crate::errors::{AppError, AppResult};
use crate::models::team::Team;
use crate::ui::messages::{header, info};
use crate::utils::date::{month_name, shift_days, week_start, year_end, year_start};
use crate::utils::formatting::percent;
use crate::utils::table::Table;
use chrono::{Datelike, NaiveDate};

pub fn handle(cmd: &Commands, cfg: &Config, today: NaiveDate) -> AppResult<()> {
    if let Commands::Stats { year } = cmd {
        let pool = open_pool(cfg)?;
        if signed_in(&pool, cfg)?.is_none() {
            return Ok(());
        }

        let records = queries::load_all_records(&pool.conn)?;

        if let Some(y) = year {
            let first = year_start(*y).ok_or_else(|| AppError::InvalidDate(y.to_string()))?;
            let last = year_end(*y).ok_or_else(|| AppError::InvalidDate(y.to_string()))?;
            let year_holidays = holidays::load_holidays_in_range(&pool.conn, first, last)?;
            print_history(*y, &history_for_year(*y, &records, &year_holidays, today), cfg);

            let years: Vec<String> = history_years(&records, today)
                .iter()
                .map(i32::to_string)
                .collect();
            info(format!("Years with data: {}", years.join(", ")));
            return Ok(());
        }

        let current_year = DateRange::new(
            year_start(today.year()).unwrap_or(today),
            year_end(today.year()).unwrap_or(today),
        );
        let this_week = DateRange::new(week_start(today, 0), shift_days(week_start(today, 0), 6));
        let window = load_window(
            &pool,
            cfg,
            Some(current_year.union(&this_week)),
        );

        let report = build_report(window.days(), today);

        header(format!("Statistics as of {today}"));

        let mut table = Table::new(vec!["Period", "Had", "No", "Empty", "Holidays", "Days", "Rate"]);
        let mut push = |label: String, s: &PeriodStats| {
            table.add_row(vec![
                label,
                s.had_meal.to_string(),
                s.no_meal.to_string(),
                s.unfilled.to_string(),
                s.holidays.to_string(),
                format!("{}/{}", s.elapsed_days, s.total_days),
                percent(s.had_meal, s.had_meal + s.no_meal),
            ]);
        };

        push("This week".into(), &report.week);
        push("This month".into(), &report.month);
        push("This year".into(), &report.year);

        for (team, periods) in [(Team::A, &report.team_a), (Team::B, &report.team_b)] {
            let label = cfg.team_label(team);
            push(format!("{label} / week"), &periods.week);
            push(format!("{label} / month"), &periods.month);
            push(format!("{label} / year"), &periods.year);
        }

        print!("{}", table.render());

        let s = streaks(&records);
        println!();
        println!("🔥 Current streak: {}   🏆 Longest streak: {}", s.current, s.longest);
    }

    Ok(())
}

fn print_history(year: i32, months: &[MonthHistory], cfg: &Config) {
    header(format!("History {year}"));

    if months.is_empty() {
        info(format!("No records or holidays in {year}."));
        return;
    }

    let a = cfg.team_label(Team::A);
    let b = cfg.team_label(Team::B);
    let mut table = Table::new(vec![
        "Month".to_string(),
        format!("{a} had/no"),
        format!("{b} had/no"),
        "Had".to_string(),
        "No".to_string(),
        "Empty".to_string(),
        "Holidays".to_string(),
        "Days".to_string(),
    ]);

    for m in months {
        table.add_row(vec![
            month_name(m.month).to_string(),
            format!("{}/{}", m.team_a.had, m.team_a.no),
            format!("{}/{}", m.team_b.had, m.team_b.no),
            m.total.had.to_string(),
            m.total.no.to_string(),
            m.total.unfilled.to_string(),
            m.total.holidays.to_string(),
            m.days_in_month.to_string(),
        ]);
    }

    print!("{}", table.render());
}
