#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const TODAY: &str = "2026-03-10";

pub fn kaja() -> Command {
    cargo_bin_cmd!("kajalog")
}

/// Private config directory + database for one test.
pub struct TestEnv {
    pub home: PathBuf,
    pub db: String,
}

/// Create a clean directory inside the system temp dir for `name`.
pub fn setup_test_env(name: &str) -> TestEnv {
    let mut home: PathBuf = env::temp_dir();
    home.push(format!("kajalog_it_{name}"));
    fs::remove_dir_all(&home).ok();
    fs::create_dir_all(&home).expect("create test home");

    let db = home.join("kajalog.sqlite").to_string_lossy().to_string();
    TestEnv { home, db }
}

/// Output file path inside the test home, removed if present.
pub fn temp_out(env: &TestEnv, name: &str, ext: &str) -> String {
    let p = env.home.join(format!("{name}.{ext}"));
    fs::remove_file(&p).ok();
    p.to_string_lossy().to_string()
}

impl TestEnv {
    /// `kajalog --db <db> --today 2026-03-10` with `KAJALOG_HOME` pointing at this env.
    pub fn cmd(&self) -> Command {
        let mut cmd = kaja();
        cmd.env("KAJALOG_HOME", &self.home)
            .env_remove("KAJALOG_SITE_URL")
            .args(["--db", &self.db, "--today", TODAY]);
        cmd
    }

    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }

    pub fn login(&self, email: &str) {
        self.cmd().args(["login", email]).assert().success();
    }

    pub fn logout(&self) {
        self.cmd().arg("logout").assert().success();
    }

    /// Initialized database with `admin@example.com` signed in as administrator.
    pub fn with_admin(name: &str) -> Self {
        let env = setup_test_env(name);
        env.init();
        env.cmd()
            .args(["login", "admin@example.com", "--name", "Kovács Anna"])
            .assert()
            .success();
        env
    }

    pub fn set_had(&self, date: &str, meal: &str, team: Option<&str>) {
        let mut cmd = self.cmd();
        cmd.args(["set", date, "--had", meal]);
        if let Some(t) = team {
            cmd.args(["--team", t]);
        }
        cmd.assert().success();
    }
}
