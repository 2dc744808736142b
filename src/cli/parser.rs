use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::utils::date;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Largest `show --offset`, in weeks or months.
pub const MAX_VIEW_OFFSET: i64 = 5000;

/// Command-line interface definition for kajalog
/// CLI application to track the daily staff meal with SQLite
#[derive(Parser)]
#[command(
    name = "kajalog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Staff meal tracker: record who had lunch, per team, with holiday-aware statistics",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Reference date used instead of the system date (YYYY-MM-DD)
    #[arg(global = true, long = "today", hide = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn reference_date(&self) -> AppResult<NaiveDate> {
        match &self.today {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone())),
            None => Ok(date::today()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Sign in (the profile is created on first sign-in)
    Login {
        email: String,

        #[arg(long = "name", help = "Full name shown as the recorder of your entries")]
        name: Option<String>,
    },

    /// Sign out and drop the cached session
    Logout,

    /// Show the signed-in user and their approval status
    Whoami,

    /// Show a week or a month of meal records
    Show {
        #[arg(long, default_value = "week", help = "week or month")]
        view: String,

        #[arg(
            long,
            default_value_t = 0,
            allow_hyphen_values = true,
            value_parser = clap::value_parser!(i64).range(-MAX_VIEW_OFFSET..=MAX_VIEW_OFFSET),
            help = "Periods away from the current one (-1 = previous)"
        )]
        offset: i64,
    },

    /// Record whether the team had lunch on a day
    Set {
        /// Date of the meal (YYYY-MM-DD)
        date: String,

        #[arg(long = "had", value_name = "MEAL", conflicts_with = "no", required_unless_present = "no")]
        had: Option<String>,

        #[arg(long = "no", value_name = "REASON")]
        no: Option<String>,

        #[arg(long = "team", help = "Team that cooked or ate: A or B")]
        team: Option<String>,
    },

    /// Delete the record of a day
    Del {
        date: String,
    },

    /// Week / month / year statistics, streaks and yearly history
    Stats {
        #[arg(long, help = "Show the month-by-month history of this year")]
        year: Option<i32>,
    },

    /// Manage holidays
    Holiday {
        #[command(subcommand)]
        action: HolidayAction,
    },

    /// Manage users (administrators only)
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// List users to remind when today has no record yet (dry run)
    Remind,

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },

    /// Export meal records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum HolidayAction {
    /// Declare a holiday
    Add {
        date: String,
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// List holidays
    List {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,
    },

    /// Remove a holiday by id
    Del {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Pending users first, then approved ones
    List,

    /// Grant access
    Approve { email: String },

    /// Withdraw access
    Revoke { email: String },
}
