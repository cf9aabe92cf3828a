//! Integration tests for the stint binary.
//!
//! These tests verify end-to-end behavior including:
//! - Logging workflow and journal persistence
//! - Streak and progress display
//! - Achievement unlock, delivery, and revocation
//! - CSV export and bulk clear

use assert_cmd::Command;
use chrono::{Days, Utc};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli() -> Command {
    Command::cargo_bin("stint").expect("Failed to find stint binary")
}

/// Log `hours` on the day `days_ago` days before today
fn log_day(data_dir: &Path, days_ago: u64, hours: f64) {
    let day = Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(days_ago))
        .unwrap();

    cli()
        .arg("log")
        .arg(hours.to_string())
        .arg("--date")
        .arg(day.to_string())
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Daily study tracker with streaks and achievements",
        ));
}

#[test]
fn test_log_creates_journal_and_state() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("log")
        .arg("2.5")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 2.5 hours"));

    let journal = fs::read_to_string(data_dir.join("activity.jsonl")).unwrap();
    assert!(journal.contains("\"event\":\"logged\""));
    assert!(data_dir.join("state.json").exists());
}

#[test]
fn test_invalid_hours_rejected() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("25")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid input"));

    // Nothing was journaled
    assert!(!temp_dir.path().join("activity.jsonl").exists());
}

#[test]
fn test_invalid_goal_rejected() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("goal")
        .arg("0")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid input"));
}

#[test]
fn test_streaks_count_closed_days() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // Three consecutive days ending yesterday
    for days_ago in 1..=3 {
        log_day(data_dir, days_ago, 2.0);
    }

    cli()
        .arg("streaks")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Study days:  3 current, 3 longest"));
}

#[test]
fn test_today_does_not_move_current_streak() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for days_ago in 1..=3 {
        log_day(data_dir, days_ago, 2.0);
    }
    // Logging today extends the longest run but not the current count
    log_day(data_dir, 0, 2.0);

    cli()
        .arg("streaks")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Study days:  3 current, 4 longest"));
}

#[test]
fn test_seven_day_run_unlocks_achievements() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for days_ago in 1..=6 {
        log_day(data_dir, days_ago, 3.0);
    }

    // Seventh consecutive day completes both first tiers
    let day = Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(7))
        .unwrap();
    cli()
        .arg("log")
        .arg("3")
        .arg("--date")
        .arg(day.to_string())
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Unlocked: 7-Day Streak"))
        .stdout(predicate::str::contains("Unlocked: Goal Setter"));
}

#[test]
fn test_check_delivers_exactly_once() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for days_ago in 1..=7 {
        log_day(data_dir, days_ago, 3.0);
    }

    cli()
        .arg("check")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("7-Day Streak"))
        .stdout(predicate::str::contains("Goal Setter"));

    // Already delivered; the second poll comes back empty
    cli()
        .arg("check")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No new achievements."));
}

#[test]
fn test_raising_goal_revokes_goal_tier() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // Seven days at exactly the default 2h goal
    for days_ago in 1..=7 {
        log_day(data_dir, days_ago, 2.0);
    }

    cli()
        .arg("goal")
        .arg("4")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Revoked: Goal Setter"));

    // The consistency tier survives and the goal tier is gone
    cli()
        .arg("achievements")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("[✓] 7-Day Streak"))
        .stdout(predicate::str::contains("[ ] Goal Setter"));
}

#[test]
fn test_progress_reports_xp_and_level() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // goal 2: (2h -> 70) + (1h -> 10) + (3h -> 80), no achievements
    log_day(data_dir, 1, 2.0);
    log_day(data_dir, 2, 1.0);
    log_day(data_dir, 3, 3.0);

    cli()
        .arg("progress")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 1  (160 XP)"))
        .stdout(predicate::str::contains("3 days logged, 6.0 hours total"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_day(data_dir, 1, 2.0);
    log_day(data_dir, 2, 1.0);

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 days"));

    let csv = fs::read_to_string(data_dir.join("history.csv")).unwrap();
    assert!(csv.starts_with("day,hours,goal_met"));
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn test_clear_requires_confirmation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_day(data_dir, 1, 2.0);

    cli()
        .arg("clear")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_clear_revokes_achievements() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for days_ago in 1..=7 {
        log_day(data_dir, days_ago, 3.0);
    }

    cli()
        .arg("clear")
        .arg("--yes")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 achievements revoked"));

    cli()
        .arg("progress")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 1  (0 XP)"))
        .stdout(predicate::str::contains("0 days logged"));
}
