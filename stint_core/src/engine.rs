//! Exposed engine operations.
//!
//! These are the entry points the transport layer (CLI here, HTTP elsewhere)
//! calls. Each one is a synchronous pure-ish function over the store
//! snapshots: no I/O of its own, no retries, no internal locking.

use crate::store::{AchievementRecordStore, ActivityStore, UserProfileStore};
use crate::types::{
    AchievementKind, AchievementRecord, Catalog, ProgressionSnapshot, StreakSummary,
    MAX_DAILY_HOURS,
};
use crate::{reconcile, score, streak, Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub use crate::reconcile::ReconcileSummary;

/// Reject hours outside the loggable range before they reach a store
pub fn validate_hours(hours: f64) -> Result<()> {
    if !hours.is_finite() || !(0.0..=MAX_DAILY_HOURS).contains(&hours) {
        return Err(Error::InvalidInput(format!(
            "hours must be between 0 and {}, got {}",
            MAX_DAILY_HOURS, hours
        )));
    }
    Ok(())
}

/// Reject non-positive goal thresholds
pub fn validate_goal(hours: f64) -> Result<()> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "daily goal must be greater than 0, got {}",
            hours
        )));
    }
    Ok(())
}

/// Recompute and apply the achieved set for one user.
///
/// Call after any mutation that affects streak inputs: a new or edited log
/// entry, a goal change, or a bulk clear.
pub fn reconcile(
    catalog: &Catalog,
    activity: &impl ActivityStore,
    achievements: &mut impl AchievementRecordStore,
    profiles: &impl UserProfileStore,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<ReconcileSummary> {
    reconcile::reconcile_user(catalog, activity, achievements, profiles, user_id, now)
}

/// Derive the XP/level snapshot from the full history and achieved count
pub fn progression(
    activity: &impl ActivityStore,
    achievements: &impl AchievementRecordStore,
    profiles: &impl UserProfileStore,
    user_id: Uuid,
) -> Result<ProgressionSnapshot> {
    let daily_goal_hours = profiles.daily_goal_hours(user_id)?;
    let history = activity.find_all_for_user(user_id)?;
    let achieved_count = achievements
        .find_all_for_user(user_id)?
        .iter()
        .filter(|r| r.achieved)
        .count();

    Ok(score::snapshot(&history, daily_goal_hours, achieved_count))
}

/// Current and longest streaks for both tier kinds.
///
/// `today` anchors the current-streak scan; callers pass
/// `Utc::now().date_naive()`.
pub fn streaks(
    activity: &impl ActivityStore,
    profiles: &impl UserProfileStore,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<StreakSummary> {
    let daily_goal_hours = profiles.daily_goal_hours(user_id)?;
    let history = activity.find_all_for_user(user_id)?;

    let consistency =
        streak::qualifying_dates(&history, AchievementKind::Consistency, daily_goal_hours);
    let goal = streak::qualifying_dates(&history, AchievementKind::Goal, daily_goal_hours);

    Ok(StreakSummary {
        current_consistency: streak::current_streak(&consistency, today),
        current_goal: streak::current_streak(&goal, today),
        longest_consistency: streak::longest_streak(&consistency),
        longest_goal: streak::longest_streak(&goal),
    })
}

/// Fetch unnotified achievements and mark exactly that set notified.
///
/// The mark is one conditional batch keyed by the ids just read, so a record
/// unlocked between read and write is left untouched for the next poll and
/// each record is delivered at most once.
pub fn poll_unnotified(
    achievements: &mut impl AchievementRecordStore,
    user_id: Uuid,
) -> Result<Vec<AchievementRecord>> {
    let fresh = achievements.find_unnotified_achieved(user_id)?;
    if fresh.is_empty() {
        return Ok(fresh);
    }

    let ids: Vec<String> = fresh.iter().map(|r| r.achievement_id.clone()).collect();
    achievements.mark_notified(user_id, &ids)?;

    tracing::debug!(user = %user_id, count = fresh.len(), "achievements delivered");
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::store::{MemoryAchievementStore, MemoryActivityStore, MemoryProfileStore};
    use crate::UserProfile;
    use chrono::Days;

    fn setup(goal: f64) -> (MemoryActivityStore, MemoryAchievementStore, MemoryProfileStore, Uuid) {
        let user = Uuid::new_v4();
        let mut profiles = MemoryProfileStore::new();
        profiles.insert(UserProfile {
            user_id: user,
            name: "test".into(),
            daily_goal_hours: goal,
        });
        (
            MemoryActivityStore::new(),
            MemoryAchievementStore::new(),
            profiles,
            user,
        )
    }

    fn log_run(activity: &mut MemoryActivityStore, user: Uuid, start: &str, days: u64, hours: f64) {
        let start: NaiveDate = start.parse().unwrap();
        for i in 0..days {
            let day = start.checked_add_days(Days::new(i)).unwrap();
            activity.upsert(user, day, hours).unwrap();
        }
    }

    #[test]
    fn test_validate_hours_bounds() {
        assert!(validate_hours(0.0).is_ok());
        assert!(validate_hours(24.0).is_ok());
        assert!(validate_hours(-0.1).is_err());
        assert!(validate_hours(24.1).is_err());
        assert!(validate_hours(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_goal_positive() {
        assert!(validate_goal(0.5).is_ok());
        assert!(validate_goal(0.0).is_err());
        assert!(validate_goal(-1.0).is_err());
    }

    #[test]
    fn test_progression_includes_achievements() {
        let (mut activity, mut achievements, profiles, user) = setup(2.0);
        let catalog = build_default_catalog();

        log_run(&mut activity, user, "2024-03-01", 7, 2.0);
        reconcile(&catalog, &activity, &mut achievements, &profiles, user, Utc::now()).unwrap();

        let snap = progression(&activity, &achievements, &profiles, user).unwrap();
        // 7 days x (20 + 50) XP + 2 achievements x 100
        assert_eq!(snap.total_xp, 690);
        assert_eq!(snap.level, 1);
    }

    #[test]
    fn test_revoked_tier_leaves_progression() {
        let (mut activity, mut achievements, mut profiles, user) = setup(2.0);
        let catalog = build_default_catalog();

        log_run(&mut activity, user, "2024-03-01", 7, 2.0);
        reconcile(&catalog, &activity, &mut achievements, &profiles, user, Utc::now()).unwrap();
        let before = progression(&activity, &achievements, &profiles, user).unwrap();

        profiles.set_daily_goal_hours(user, 4.0).unwrap();
        reconcile(&catalog, &activity, &mut achievements, &profiles, user, Utc::now()).unwrap();
        let after = progression(&activity, &achievements, &profiles, user).unwrap();

        // goal-7 revoked and no day meets the 4h goal any more
        assert_eq!(before.total_xp, 690);
        assert_eq!(after.total_xp, 240); // 7 x 20 + 1 achievement x 100
    }

    #[test]
    fn test_streak_summary() {
        let (mut activity, _, profiles, user) = setup(2.0);
        let today: NaiveDate = "2024-03-10".parse().unwrap();

        // Three closed days ending yesterday; only two meet the goal
        activity.upsert(user, "2024-03-07".parse().unwrap(), 2.0).unwrap();
        activity.upsert(user, "2024-03-08".parse().unwrap(), 1.0).unwrap();
        activity.upsert(user, "2024-03-09".parse().unwrap(), 2.0).unwrap();

        let summary = streaks(&activity, &profiles, user, today).unwrap();
        assert_eq!(summary.current_consistency, 3);
        assert_eq!(summary.current_goal, 1);
        assert_eq!(summary.longest_consistency, 3);
        assert_eq!(summary.longest_goal, 1);
    }

    #[test]
    fn test_streaks_unknown_user() {
        let (activity, _, profiles, _) = setup(2.0);
        let err = streaks(&activity, &profiles, Uuid::new_v4(), "2024-03-10".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_poll_unnotified_exactly_once() {
        let (mut activity, mut achievements, profiles, user) = setup(2.0);
        let catalog = build_default_catalog();

        log_run(&mut activity, user, "2024-03-01", 7, 3.0);
        reconcile(&catalog, &activity, &mut achievements, &profiles, user, Utc::now()).unwrap();

        let first = poll_unnotified(&mut achievements, user).unwrap();
        assert_eq!(first.len(), 2);

        let second = poll_unnotified(&mut achievements, user).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_poll_leaves_later_unlocks_for_next_poll() {
        let (mut activity, mut achievements, profiles, user) = setup(2.0);
        let catalog = build_default_catalog();

        log_run(&mut activity, user, "2024-03-01", 7, 3.0);
        reconcile(&catalog, &activity, &mut achievements, &profiles, user, Utc::now()).unwrap();
        poll_unnotified(&mut achievements, user).unwrap();

        // Extend to 21 days; the new tiers were unlocked after the first poll
        log_run(&mut activity, user, "2024-03-08", 14, 3.0);
        reconcile(&catalog, &activity, &mut achievements, &profiles, user, Utc::now()).unwrap();

        let next = poll_unnotified(&mut achievements, user).unwrap();
        let ids: Vec<_> = next.iter().map(|r| r.achievement_id.as_str()).collect();
        assert_eq!(ids, vec!["consistency-21", "goal-21"]);
    }
}
