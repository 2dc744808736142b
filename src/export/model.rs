// src/export/model.rs

use serde::Serialize;

/// Flat row written by every export format.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RecordExport {
    pub date: String,
    pub had_meal: bool,
    pub meal_name: Option<String>,
    pub reason: Option<String>,
    pub team: Option<String>,
    pub recorded_by: String,
    pub created_at: String,
    pub updated_at: String,
}
