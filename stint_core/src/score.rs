//! Experience and level scoring.
//!
//! The score is recomputed from the full history on every call; there is no
//! stored running total to drift out of sync with the records.

use crate::types::{ActivityRecord, ProgressionSnapshot};

const XP_PER_HOUR: f64 = 10.0;
const GOAL_MET_BONUS: f64 = 50.0;
const XP_PER_ACHIEVEMENT: f64 = 100.0;
const XP_PER_LEVEL: u64 = 1000;
const MAX_LEVEL: u32 = 100;

/// Total experience over the full history.
///
/// Per-record terms stay fractional; only the grand total is rounded, to the
/// nearest integer.
pub fn total_xp(records: &[ActivityRecord], daily_goal_hours: f64, achieved_count: usize) -> u64 {
    let mut xp = 0.0f64;

    for record in records {
        xp += record.hours * XP_PER_HOUR;
        if record.hours >= daily_goal_hours {
            xp += GOAL_MET_BONUS;
        }
    }

    xp += achieved_count as f64 * XP_PER_ACHIEVEMENT;

    xp.round().max(0.0) as u64
}

/// Level for a given XP total: floor division, clamped to [1, 100]
pub fn level_for_xp(total_xp: u64) -> u32 {
    let level = (total_xp / XP_PER_LEVEL) + 1;
    (level.min(MAX_LEVEL as u64)) as u32
}

/// Derive the full progression snapshot
pub fn snapshot(
    records: &[ActivityRecord],
    daily_goal_hours: f64,
    achieved_count: usize,
) -> ProgressionSnapshot {
    let total_xp = total_xp(records, daily_goal_hours, achieved_count);
    ProgressionSnapshot {
        total_xp,
        level: level_for_xp(total_xp),
    }
}
