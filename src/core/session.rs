//! Signed-in user, cached on disk with a short freshness window.
//!
//! The cache avoids a profile lookup on every command. It is re-checked
//! against the profile store once it is older than the TTL, dropped on
//! sign-out, and rewritten whenever an admin changes the cached profile.

use crate::config::{Config, default_session_ttl};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::profiles;
use crate::errors::{AppError, AppResult};
use crate::models::profile::Profile;
use crate::ui::messages::warning;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCache {
    pub user_id: i64,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub is_approved: bool,
    pub checked_at: DateTime<Utc>,
}

impl SessionCache {
    pub fn from_profile(profile: &Profile, now: DateTime<Utc>) -> Self {
        Self {
            user_id: profile.id,
            email: profile.email.clone(),
            display_name: profile.display_name(),
            is_admin: profile.is_admin,
            is_approved: profile.is_approved,
            checked_at: now,
        }
    }

    pub fn has_access(&self) -> bool {
        self.is_admin || self.is_approved
    }
}

/// Outcome of a session check. Waiting for approval is a state, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Granted(SessionCache),
    PendingApproval(SessionCache),
}

impl Access {
    fn from_cache(cache: SessionCache) -> Self {
        if cache.has_access() {
            Access::Granted(cache)
        } else {
            Access::PendingApproval(cache)
        }
    }

    pub fn session(&self) -> &SessionCache {
        match self {
            Access::Granted(s) | Access::PendingApproval(s) => s,
        }
    }
}

/// Where the sign-in flow sends the user back to.
pub fn redirect_url(base_url: &str) -> String {
    format!("{}/auth/callback", base_url.trim_end_matches('/'))
}

pub struct SessionContext {
    path: PathBuf,
    ttl: chrono::Duration,
    auth_timeout: Duration,
}

/// Cache lifetime; a value chrono cannot represent falls back to the default TTL.
fn ttl_from_secs(secs: u64) -> chrono::Duration {
    [secs, default_session_ttl()]
        .into_iter()
        .find_map(|s| i64::try_from(s).ok().and_then(chrono::Duration::try_seconds))
        .unwrap_or_else(|| chrono::Duration::seconds(300))
}

impl SessionContext {
    pub fn new(path: impl Into<PathBuf>, cfg: &Config) -> Self {
        Self {
            path: path.into(),
            ttl: ttl_from_secs(cfg.session_ttl_secs),
            auth_timeout: Duration::from_secs(cfg.auth_timeout_secs),
        }
    }

    /// Context backed by `session.json` in the configuration directory.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Config::session_file(), cfg)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached session, if any. An unreadable cache file is discarded.
    pub fn load(&self) -> AppResult<Option<SessionCache>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(cache) => Ok(Some(cache)),
            Err(e) => {
                warning(format!("Discarding unreadable session cache: {e}"));
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn store(&self, cache: &SessionCache) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(cache)?)?;
        Ok(())
    }

    fn clear(&self) -> AppResult<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn is_fresh(&self, cache: &SessionCache, now: DateTime<Utc>) -> bool {
        now >= cache.checked_at && now - cache.checked_at < self.ttl
    }

    /// Current access level, re-checked against the profile store when stale.
    pub fn resolve(&self, pool: &DbPool, now: DateTime<Utc>) -> AppResult<Access> {
        self.resolve_with(now, |id| profiles::find_by_id(&pool.conn, id))
    }

    pub(crate) fn resolve_with<F>(&self, now: DateTime<Utc>, lookup: F) -> AppResult<Access>
    where
        F: FnOnce(i64) -> AppResult<Option<Profile>>,
    {
        let cache = self.load()?.ok_or(AppError::NotSignedIn)?;

        if self.is_fresh(&cache, now) {
            return Ok(Access::from_cache(cache));
        }

        let started = Instant::now();
        let found = lookup(cache.user_id);

        if started.elapsed() > self.auth_timeout {
            self.clear()?;
            return Err(AppError::AuthTimeout(self.auth_timeout.as_secs()));
        }

        match found? {
            Some(profile) => {
                let fresh = SessionCache::from_profile(&profile, now);
                self.store(&fresh)?;
                Ok(Access::from_cache(fresh))
            }
            None => {
                self.clear()?;
                Err(AppError::NotSignedIn)
            }
        }
    }

    /// Signed-in admin, or `Forbidden`.
    pub fn require_admin(&self, pool: &DbPool, now: DateTime<Utc>) -> AppResult<SessionCache> {
        match self.resolve(pool, now)? {
            Access::Granted(s) if s.is_admin => Ok(s),
            other => Err(AppError::Forbidden(format!(
                "{} is not an administrator",
                other.session().email
            ))),
        }
    }

    /// Sign in as `email`, creating the profile on first use.
    /// The first profile of an empty store becomes an administrator.
    pub fn sign_in(
        &self,
        pool: &DbPool,
        email: &str,
        full_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Access> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation(format!("invalid e-mail address: '{email}'")));
        }

        let profile = match profiles::find_by_email(&pool.conn, email)? {
            Some(p) => p,
            None => {
                let first = profiles::count(&pool.conn)? == 0;
                let created = profiles::insert_profile(&pool.conn, email, full_name, first, first)?;
                ttlog_soft(
                    &pool.conn,
                    "signup",
                    email,
                    if first {
                        "First user, granted admin"
                    } else {
                        "Profile created, waiting for approval"
                    },
                );
                created
            }
        };

        let cache = SessionCache::from_profile(&profile, now);
        self.store(&cache)?;
        ttlog_soft(&pool.conn, "login", email, "Signed in");

        Ok(Access::from_cache(cache))
    }

    /// Drop the cached session, returning it if there was one.
    pub fn sign_out(&self) -> AppResult<Option<SessionCache>> {
        let previous = self.load()?;
        self.clear()?;
        Ok(previous)
    }

    /// An authoritative update of `profile`; refreshes the cache when it is ours.
    pub fn on_profile_changed(&self, profile: &Profile, now: DateTime<Utc>) -> AppResult<bool> {
        match self.load()? {
            Some(cache) if cache.user_id == profile.id => {
                self.store(&SessionCache::from_profile(profile, now))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
