use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the configuration directory.
pub const HOME_ENV: &str = "KAJALOG_HOME";

/// Environment variable overriding `base_url`.
pub const SITE_URL_ENV: &str = "KAJALOG_SITE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,

    /// First tracked day; nothing before it is ever fetched or shown.
    #[serde(default = "default_floor_date")]
    pub floor_date: NaiveDate,

    /// Look-ahead/look-behind (in months) loaded around the viewed period.
    #[serde(default = "default_window_margin")]
    pub window_margin_months: u32,

    #[serde(default = "default_timeout")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_timeout")]
    pub auth_timeout_secs: u64,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    #[serde(default = "default_team_a_name")]
    pub team_a_name: String,

    #[serde(default = "default_team_b_name")]
    pub team_b_name: String,

    #[serde(default = "default_time_format")]
    pub time_format: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_floor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default()
}
fn default_window_margin() -> u32 {
    3
}
fn default_timeout() -> u64 {
    10
}
pub(crate) fn default_session_ttl() -> u64 {
    300
}
fn default_team_a_name() -> String {
    "Zs csapat".to_string()
}
fn default_team_b_name() -> String {
    "R csapat".to_string()
}
fn default_time_format() -> String {
    "%H:%M".to_string()
}
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            floor_date: default_floor_date(),
            window_margin_months: default_window_margin(),
            fetch_timeout_secs: default_timeout(),
            auth_timeout_secs: default_timeout(),
            session_ttl_secs: default_session_ttl(),
            team_a_name: default_team_a_name(),
            team_b_name: default_team_b_name(),
            time_format: default_time_format(),
            base_url: default_base_url(),
        }
    }

    /// Return the configuration directory: `$KAJALOG_HOME`, or the platform default.
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var(HOME_ENV)
            && !custom.trim().is_empty()
        {
            return PathBuf::from(custom);
        }

        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("kajalog")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".kajalog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("kajalog.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("kajalog.sqlite")
    }

    /// Return the full path of the cached session
    pub fn session_file() -> PathBuf {
        Self::config_dir().join("session.json")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Site URL used to build the post-sign-in redirect target.
    pub fn site_url(&self) -> String {
        env::var(SITE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.base_url.clone())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn team_label(&self, team: crate::models::team::Team) -> &str {
        match team {
            crate::models::team::Team::A => &self.team_a_name,
            crate::models::team::Team::B => &self.team_b_name,
        }
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was set up.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            dir.join("kajalog.sqlite")
        };

        let config = Self::with_database(db_path.clone());

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").expect("parse");
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.floor_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(cfg.window_margin_months, 3);
        assert_eq!(cfg.session_ttl_secs, 300);
        assert_eq!(cfg.auth_timeout_secs, 10);
        assert_eq!(cfg.time_format, "%H:%M");
    }

    #[test]
    fn floor_date_is_read_as_plain_date() {
        let cfg: Config =
            serde_yaml::from_str("database: a.sqlite\nfloor_date: 2025-06-01\n").expect("parse");
        assert_eq!(cfg.floor_date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }
}
