use chrono::NaiveDate;
use serde::Serialize;

/// An administrator-declared day excluded from "unfilled" accounting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holiday {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub description: Option<String>,
    pub created_by: i64,
}
