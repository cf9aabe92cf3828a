//! Achievement reconciliation.
//!
//! Recomputes which catalog tiers a user currently earns from their full
//! activity history and current goal threshold, then applies the minimal
//! upsert/delete set to converge the stored records to that truth. The
//! achieved set is a derived view: a tier whose streak no longer holds is
//! revoked, it is not kept as a ledger entry.

use crate::store::{AchievementRecordStore, ActivityStore, UserProfileStore};
use crate::types::{AchievementKind, AchievementRecord, Catalog};
use crate::{streak, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

/// Writes applied by one reconciliation pass
#[derive(Clone, Debug, Default)]
pub struct ReconcileSummary {
    /// Tier ids newly unlocked, in catalog order
    pub unlocked: Vec<String>,
    /// Tier ids revoked, in catalog order
    pub revoked: Vec<String>,
}

impl ReconcileSummary {
    /// Number of store writes this pass performed
    pub fn writes(&self) -> usize {
        self.unlocked.len() + self.revoked.len()
    }
}

/// Reconcile one user's achievement records against their history.
///
/// Idempotent: a second call with no intervening history or goal change
/// performs zero writes. A store failure partway leaves already-applied
/// writes intact; re-invoking is safe.
///
/// Errors with `NotFound` before touching anything if the user has no
/// profile.
pub fn reconcile_user(
    catalog: &Catalog,
    activity: &impl ActivityStore,
    achievements: &mut impl AchievementRecordStore,
    profiles: &impl UserProfileStore,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<ReconcileSummary> {
    let daily_goal_hours = profiles.daily_goal_hours(user_id)?;
    let history = activity.find_all_for_user(user_id)?;

    let existing: HashSet<String> = achievements
        .find_all_for_user(user_id)?
        .into_iter()
        .filter(|r| r.achieved)
        .map(|r| r.achievement_id)
        .collect();

    let mut summary = ReconcileSummary::default();

    // The qualifying set only depends on the kind, not the tier, so derive
    // it once per kind rather than once per definition
    let consistency_dates =
        streak::qualifying_dates(&history, AchievementKind::Consistency, daily_goal_hours);
    let goal_dates = streak::qualifying_dates(&history, AchievementKind::Goal, daily_goal_hours);

    for def in &catalog.definitions {
        let dates = match def.kind {
            AchievementKind::Consistency => &consistency_dates,
            AchievementKind::Goal => &goal_dates,
        };
        let qualifies = streak::meets_requirement(dates, def.required_consecutive_days);
        let held = existing.contains(&def.id);

        if qualifies && !held {
            let record = AchievementRecord {
                user_id,
                achievement_id: def.id.clone(),
                achieved: true,
                date_achieved: now,
                notified: false,
                goal_value_at_achievement: match def.kind {
                    AchievementKind::Goal => Some(daily_goal_hours),
                    AchievementKind::Consistency => None,
                },
            };
            achievements.upsert(record)?;
            tracing::info!(user = %user_id, tier = %def.id, "achievement unlocked");
            summary.unlocked.push(def.id.clone());
        } else if !qualifies && held {
            achievements.delete(user_id, &def.id)?;
            tracing::info!(user = %user_id, tier = %def.id, "achievement revoked");
            summary.revoked.push(def.id.clone());
        }
    }

    tracing::debug!(
        user = %user_id,
        unlocked = summary.unlocked.len(),
        revoked = summary.revoked.len(),
        "reconciliation complete"
    );

    Ok(summary)
}
