//! Streak evaluation over sorted qualifying dates.
//!
//! The evaluator is a pure leaf: it sees only an ascending sequence of
//! calendar days (unique by construction) and knows nothing about records,
//! goals, or stores.

use crate::types::{AchievementKind, ActivityRecord};
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// Length of the longest run of consecutive calendar days.
///
/// A run extends when adjacent dates differ by exactly one day; any larger
/// gap resets the run to 1. Empty input yields 0, a single date yields 1.
pub fn longest_streak(days: &[NaiveDate]) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for &day in days {
        run = match prev {
            Some(p) if (day - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }

    best
}

/// Length of the streak ending yesterday.
///
/// Counts backward from the day before `today` while each day is present,
/// stopping at the first missing one. Today's entry, if any, is deliberately
/// ignored: a streak should not flicker mid-day before the day is closed.
pub fn current_streak(days: &[NaiveDate], today: NaiveDate) -> u32 {
    let present: HashSet<NaiveDate> = days.iter().copied().collect();

    let mut streak = 0u32;
    let mut cursor = today;
    loop {
        cursor = match cursor.checked_sub_days(Days::new(1)) {
            Some(d) => d,
            None => break,
        };
        if !present.contains(&cursor) {
            break;
        }
        streak += 1;
    }

    streak
}

/// Whether the longest streak reaches `required_days`.
///
/// Same scan as [`longest_streak`] but returns as soon as the threshold is
/// hit; an early exit, not a semantic difference.
pub fn meets_requirement(days: &[NaiveDate], required_days: u32) -> bool {
    if required_days == 0 {
        return true;
    }

    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for &day in days {
        run = match prev {
            Some(p) if (day - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        if run >= required_days {
            return true;
        }
        prev = Some(day);
    }

    false
}

/// Derive the ascending qualifying-date sequence for a tier kind.
///
/// `records` must already be sorted ascending by day (the store contract);
/// filtering preserves that order.
pub fn qualifying_dates(
    records: &[ActivityRecord],
    kind: AchievementKind,
    daily_goal_hours: f64,
) -> Vec<NaiveDate> {
    records
        .iter()
        .filter(|r| kind.qualifies(r.hours, daily_goal_hours))
        .map(|r| r.day)
        .collect()
}
