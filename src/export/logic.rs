// src/export/logic.rs

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::{profiles, queries};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::RecordExport;
use crate::export::range::parse_range;
use crate::models::meal_record::MealRecord;
use crate::ui::messages::warning;
use crate::utils::date::format_date_key;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export stored meal records.
    ///
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or a period accepted by [`parse_range`]
    pub fn export(
        pool: &DbPool,
        cfg: &Config,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let records = match range {
            None => queries::load_all_records(&pool.conn)?,
            Some(r) if r.eq_ignore_ascii_case("all") => queries::load_all_records(&pool.conn)?,
            Some(r) => {
                let (start, end) = parse_range(r)?;
                queries::load_records_in_range(&pool.conn, start, end)?
            }
        };

        if records.is_empty() {
            warning("No meal records found for selected range.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        let rows = to_rows(pool, cfg, &records)?;

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }
}

/// Flatten records, resolving recorders with one batched profile lookup.
fn to_rows(pool: &DbPool, cfg: &Config, records: &[MealRecord]) -> AppResult<Vec<RecordExport>> {
    let ids: Vec<i64> = records
        .iter()
        .map(|r| r.recorded_by)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let names: HashMap<i64, String> = profiles::find_by_ids(&pool.conn, &ids)?
        .into_iter()
        .map(|p| (p.id, p.display_name()))
        .collect();

    Ok(records
        .iter()
        .map(|r| RecordExport {
            date: format_date_key(r.date),
            had_meal: r.had_meal,
            meal_name: r.meal_name.clone(),
            reason: r.reason.clone(),
            team: r.team.map(|t| cfg.team_label(t).to_string()),
            recorded_by: names
                .get(&r.recorded_by)
                .cloned()
                .unwrap_or_else(|| crate::core::window::UNKNOWN_RECORDER.to_string()),
            created_at: r.created_at.clone(),
            updated_at: r.updated_at.clone(),
        })
        .collect())
}
