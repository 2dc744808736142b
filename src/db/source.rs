use crate::core::window::{DateRange, MealSource};
use crate::db::pool::DbPool;
use crate::db::{holidays, profiles, queries};
use crate::errors::AppResult;
use crate::models::holiday::Holiday;
use crate::models::meal_record::MealRecord;
use crate::models::profile::Profile;

impl MealSource for DbPool {
    fn fetch_records(&self, range: DateRange) -> AppResult<Vec<MealRecord>> {
        queries::load_records_in_range(&self.conn, range.start, range.end)
    }

    fn fetch_holidays(&self, range: DateRange) -> AppResult<Vec<Holiday>> {
        holidays::load_holidays_in_range(&self.conn, range.start, range.end)
    }

    fn fetch_profiles(&self, ids: &[i64]) -> AppResult<Vec<Profile>> {
        profiles::find_by_ids(&self.conn, ids)
    }
}
