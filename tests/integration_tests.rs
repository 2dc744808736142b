use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{TestEnv, setup_test_env};

#[test]
fn test_init_creates_database() {
    let env = setup_test_env("init");
    env.cmd()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&env.db).exists());

    env.cmd()
        .args(["db", "--info"])
        .assert()
        .success()
        .stdout(contains("Meal records:"))
        .stdout(contains("Holidays:"));
}

#[test]
fn test_db_maintenance() {
    let env = setup_test_env("db_maintenance");
    env.init();

    env.cmd()
        .args(["db", "--migrate", "--check", "--vacuum"])
        .assert()
        .success()
        .stdout(contains("Database schema is up to date."))
        .stdout(contains("Integrity check passed."))
        .stdout(contains("Vacuum completed"));

    env.cmd()
        .arg("db")
        .assert()
        .success()
        .stdout(contains("Nothing to do"));

    env.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("vacuum"));
}

#[test]
fn test_data_commands_require_sign_in() {
    let env = setup_test_env("no_session");
    env.init();

    env.cmd()
        .args(["show"])
        .assert()
        .failure()
        .stderr(contains("Not signed in"));
}

#[test]
fn test_save_then_classify() {
    let env = TestEnv::with_admin("save_classify");
    env.set_had("2026-03-10", "Gulyás", Some("A"));

    env.cmd()
        .args(["show", "--view", "month"])
        .assert()
        .success()
        .stdout(contains("Március 2026"))
        .stdout(contains("Gulyás"))
        .stdout(contains("Zs csapat"))
        .stdout(contains("Kovács Anna"))
        .stdout(contains("had: 1"))
        .stdout(contains("no: 0"));
}

#[test]
fn test_not_had_records_reason() {
    let env = TestEnv::with_admin("not_had");

    env.cmd()
        .args(["set", "2026-03-09", "--no", "Szabadság", "--team", "b"])
        .assert()
        .success()
        .stdout(contains("no meal (Szabadság) [R csapat]"));

    env.cmd()
        .args(["show"])
        .assert()
        .success()
        .stdout(contains("Szabadság"))
        .stdout(contains("no: 1"));
}

#[test]
fn test_holiday_counts_as_holiday_not_empty() {
    let env = TestEnv::with_admin("holiday_precedence");

    env.cmd()
        .args(["holiday", "add", "2026-03-02", "Munkaszüneti nap"])
        .assert()
        .success()
        .stdout(contains("Holiday #1 added"));

    // week of 2026-03-02 .. 2026-03-08, all elapsed
    env.cmd()
        .args(["show", "--view", "week", "--offset", "-1"])
        .assert()
        .success()
        .stdout(contains("Munkaszüneti nap"))
        .stdout(contains("holidays: 1"))
        .stdout(contains("empty: 6"));
}

#[test]
fn test_holiday_and_future_dates_are_locked() {
    let env = TestEnv::with_admin("locked_dates");

    env.cmd()
        .args(["holiday", "add", "2026-03-02", "Munkaszüneti nap"])
        .assert()
        .success();

    env.cmd()
        .args(["set", "2026-03-02", "--had", "Leves"])
        .assert()
        .failure()
        .stderr(contains("is a holiday"));

    env.cmd()
        .args(["set", "2026-03-15", "--had", "Leves"])
        .assert()
        .failure()
        .stderr(contains("in the future"));

    env.cmd()
        .args(["set", "2025-12-31", "--had", "Leves"])
        .assert()
        .failure()
        .stderr(contains("before the first tracked day"));
}

#[test]
fn test_future_days_only_count_toward_total() {
    let env = TestEnv::with_admin("future_days");

    // week 2026-03-09 .. 2026-03-15, today is Tuesday
    env.cmd()
        .args(["show", "--view", "week"])
        .assert()
        .success()
        .stdout(contains("empty: 2"))
        .stdout(contains("(2 / 7 days elapsed)"));
}

#[test]
fn test_delete_reverts_to_empty() {
    let env = TestEnv::with_admin("delete_reverts");
    env.set_had("2026-03-10", "Gulyás", Some("A"));

    env.cmd()
        .args(["del", "2026-03-10"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("has been deleted"));

    env.cmd()
        .args(["show"])
        .assert()
        .success()
        .stdout(contains("Gulyás").not())
        .stdout(contains("had: 0"))
        .stdout(contains("empty: 2"));

    env.cmd()
        .args(["del", "2026-03-10"])
        .write_stdin("y\n")
        .assert()
        .failure()
        .stderr(contains("No meal record found"));
}

#[test]
fn test_delete_can_be_cancelled() {
    let env = TestEnv::with_admin("delete_cancel");
    env.set_had("2026-03-10", "Pörkölt", None);

    env.cmd()
        .args(["del", "2026-03-10"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    env.cmd()
        .args(["show"])
        .assert()
        .success()
        .stdout(contains("Pörkölt"));
}

#[test]
fn test_saving_twice_keeps_one_record() {
    let env = TestEnv::with_admin("upsert");
    env.set_had("2026-03-10", "Gulyás", Some("A"));
    env.set_had("2026-03-10", "Rakott krumpli", Some("B"));

    env.cmd()
        .args(["show"])
        .assert()
        .success()
        .stdout(contains("Rakott krumpli"))
        .stdout(contains("Gulyás").not())
        .stdout(contains("had: 1"));
}

#[test]
fn test_stats_report_and_streaks() {
    let env = TestEnv::with_admin("stats");
    env.set_had("2026-03-09", "Gulyás", Some("A"));
    env.set_had("2026-03-10", "Lecsó", Some("B"));

    env.cmd()
        .args(["stats"])
        .assert()
        .success()
        .stdout(contains("This week"))
        .stdout(contains("Zs csapat / month"))
        .stdout(contains("Current streak: 2"));

    env.cmd()
        .args(["stats", "--year", "2026"])
        .assert()
        .success()
        .stdout(contains("History 2026"))
        .stdout(contains("Március"))
        .stdout(contains("Years with data: 2026"));
}

#[test]
fn test_invalid_input_is_rejected() {
    let env = TestEnv::with_admin("invalid_input");

    env.cmd()
        .args(["set", "2026-03-10", "--had", "Leves", "--team", "C"])
        .assert()
        .failure()
        .stderr(contains("Invalid team"));

    env.cmd()
        .args(["set", "10/03/2026", "--had", "Leves"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));

    env.cmd()
        .args(["show", "--view", "year"])
        .assert()
        .failure()
        .stderr(contains("Invalid view"));
}

#[test]
fn test_log_records_mutations() {
    let env = TestEnv::with_admin("log");
    env.set_had("2026-03-10", "Gulyás", None);

    env.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("login"))
        .stdout(contains("save"));
}

#[test]
fn test_backup_compressed() {
    let env = TestEnv::with_admin("backup");
    let dest = common::temp_out(&env, "backup", "sqlite");

    env.cmd()
        .args(["backup", "--file", &dest, "--compress"])
        .assert()
        .success()
        .stdout(contains("Compressed"));

    assert!(env.home.join("backup.zip").exists());
    assert!(!std::path::Path::new(&dest).exists());
}

#[test]
fn test_show_rejects_out_of_range_offsets() {
    let env = TestEnv::with_admin("offset_bounds");

    for (view, offset) in [("week", "2000000000000000000"), ("month", "99999999999")] {
        env.cmd()
            .args(["show", "--view", view, "--offset", offset])
            .assert()
            .failure()
            .stderr(contains("--offset"))
            .stderr(contains("panicked").not());
    }

    env.cmd()
        .args(["show", "--view", "month", "--offset", "-2"])
        .assert()
        .success()
        .stdout(contains("Január 2026"));
}
