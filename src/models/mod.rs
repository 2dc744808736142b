pub mod day_record;
pub mod holiday;
pub mod meal_record;
pub mod profile;
pub mod team;
