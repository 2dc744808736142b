pub mod admin;
pub mod backup;
pub mod config;
pub mod edit;
pub mod holidays;
pub mod log;
pub mod session;
pub mod stats;
pub mod window;
