//! Store contracts and in-memory implementations.
//!
//! The engine only ever talks to these traits. The in-memory stores back the
//! CLI (hydrated from the journal and state file) and the engine's own tests;
//! a server deployment would implement the same traits over its database.
//!
//! Atomicity contract: `upsert` and `delete` are single operations keyed by
//! the record's unique pair, never read-modify-write over a cached set, and
//! `mark_notified` is one conditional batch. The in-memory versions satisfy
//! this trivially; the point of the contract is that the engine stays correct
//! over any store that honors it.

use crate::{ActivityRecord, AchievementRecord, Error, Result, UserProfile};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

// ============================================================================
// Contracts
// ============================================================================

/// Daily activity records, unique per `(user_id, day)`
pub trait ActivityStore {
    fn find_one(&self, user_id: Uuid, day: NaiveDate) -> Result<Option<ActivityRecord>>;

    /// Insert or replace the record for `(user_id, day)`. Last writer wins.
    fn upsert(&mut self, user_id: Uuid, day: NaiveDate, hours: f64) -> Result<ActivityRecord>;

    /// Full history for a user, ordered by day ascending
    fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<ActivityRecord>>;

    /// Remove every record for a user; returns how many were removed
    fn delete_all_for_user(&mut self, user_id: Uuid) -> Result<usize>;
}

/// Unlocked achievements, unique per `(user_id, achievement_id)`
pub trait AchievementRecordStore {
    fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<AchievementRecord>>;

    /// Insert or replace the record for its `(user_id, achievement_id)` key
    fn upsert(&mut self, record: AchievementRecord) -> Result<AchievementRecord>;

    /// Delete one record; returns whether it existed
    fn delete(&mut self, user_id: Uuid, achievement_id: &str) -> Result<bool>;

    fn delete_all_for_user(&mut self, user_id: Uuid) -> Result<usize>;

    /// Records with `achieved = true` and `notified = false`
    fn find_unnotified_achieved(&self, user_id: Uuid) -> Result<Vec<AchievementRecord>>;

    /// Mark exactly `achievement_ids` notified, as one batch.
    ///
    /// Fails with [`Error::StoreConflict`] if any id in the set is missing or
    /// already notified (the set was invalidated between read and write); in
    /// that case nothing is modified.
    fn mark_notified(&mut self, user_id: Uuid, achievement_ids: &[String]) -> Result<()>;
}

/// Read side of externally owned profiles
pub trait UserProfileStore {
    /// Daily goal threshold for a user.
    ///
    /// Errors with [`Error::NotFound`] when the profile is absent; callers
    /// must not attempt reconciliation for such a user.
    fn daily_goal_hours(&self, user_id: Uuid) -> Result<f64>;
}

// ============================================================================
// In-memory implementations
// ============================================================================

/// Activity records in a sorted map, so per-user iteration comes out
/// ascending by day without an explicit sort
#[derive(Clone, Debug, Default)]
pub struct MemoryActivityStore {
    records: BTreeMap<(Uuid, NaiveDate), f64>,
}

impl MemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records across all users
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ActivityStore for MemoryActivityStore {
    fn find_one(&self, user_id: Uuid, day: NaiveDate) -> Result<Option<ActivityRecord>> {
        Ok(self.records.get(&(user_id, day)).map(|&hours| ActivityRecord {
            user_id,
            day,
            hours,
        }))
    }

    fn upsert(&mut self, user_id: Uuid, day: NaiveDate, hours: f64) -> Result<ActivityRecord> {
        self.records.insert((user_id, day), hours);
        Ok(ActivityRecord {
            user_id,
            day,
            hours,
        })
    }

    fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<ActivityRecord>> {
        let start = (user_id, NaiveDate::MIN);
        let end = (user_id, NaiveDate::MAX);
        Ok(self
            .records
            .range(start..=end)
            .map(|(&(user_id, day), &hours)| ActivityRecord {
                user_id,
                day,
                hours,
            })
            .collect())
    }

    fn delete_all_for_user(&mut self, user_id: Uuid) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|&(user, _), _| user != user_id);
        Ok(before - self.records.len())
    }
}

/// Achievement records keyed by `(user_id, achievement_id)`
#[derive(Clone, Debug, Default)]
pub struct MemoryAchievementStore {
    records: HashMap<(Uuid, String), AchievementRecord>,
}

impl MemoryAchievementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from persisted records (journal/state hydration)
    pub fn from_records(records: Vec<AchievementRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| ((r.user_id, r.achievement_id.clone()), r))
            .collect();
        Self { records }
    }

    /// All records across all users, for persistence
    pub fn all_records(&self) -> Vec<AchievementRecord> {
        let mut records: Vec<_> = self.records.values().cloned().collect();
        records.sort_by(|a, b| a.achievement_id.cmp(&b.achievement_id));
        records
    }
}

impl AchievementRecordStore for MemoryAchievementStore {
    fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<AchievementRecord>> {
        let mut records: Vec<_> = self
            .records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.achievement_id.cmp(&b.achievement_id));
        Ok(records)
    }

    fn upsert(&mut self, record: AchievementRecord) -> Result<AchievementRecord> {
        self.records
            .insert((record.user_id, record.achievement_id.clone()), record.clone());
        Ok(record)
    }

    fn delete(&mut self, user_id: Uuid, achievement_id: &str) -> Result<bool> {
        Ok(self
            .records
            .remove(&(user_id, achievement_id.to_string()))
            .is_some())
    }

    fn delete_all_for_user(&mut self, user_id: Uuid) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|(user, _), _| *user != user_id);
        Ok(before - self.records.len())
    }

    fn find_unnotified_achieved(&self, user_id: Uuid) -> Result<Vec<AchievementRecord>> {
        let mut records: Vec<_> = self
            .records
            .values()
            .filter(|r| r.user_id == user_id && r.achieved && !r.notified)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.achievement_id.cmp(&b.achievement_id));
        Ok(records)
    }

    fn mark_notified(&mut self, user_id: Uuid, achievement_ids: &[String]) -> Result<()> {
        // Validate the whole set before touching anything, so a conflict
        // leaves the store unchanged
        for id in achievement_ids {
            match self.records.get(&(user_id, id.clone())) {
                Some(r) if r.achieved && !r.notified => {}
                Some(_) => {
                    return Err(Error::StoreConflict(format!(
                        "achievement '{}' already notified",
                        id
                    )))
                }
                None => {
                    return Err(Error::StoreConflict(format!(
                        "achievement '{}' no longer exists",
                        id
                    )))
                }
            }
        }

        for id in achievement_ids {
            if let Some(r) = self.records.get_mut(&(user_id, id.clone())) {
                r.notified = true;
            }
        }

        Ok(())
    }
}

/// Profiles keyed by user id
#[derive(Clone, Debug, Default)]
pub struct MemoryProfileStore {
    profiles: HashMap<Uuid, UserProfile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, profile: UserProfile) {
        self.profiles.insert(profile.user_id, profile);
    }

    pub fn get(&self, user_id: Uuid) -> Option<&UserProfile> {
        self.profiles.get(&user_id)
    }

    /// Update the goal threshold; the caller validates it first
    pub fn set_daily_goal_hours(&mut self, user_id: Uuid, hours: f64) -> Result<()> {
        match self.profiles.get_mut(&user_id) {
            Some(profile) => {
                profile.daily_goal_hours = hours;
                Ok(())
            }
            None => Err(Error::NotFound(format!("profile for user {}", user_id))),
        }
    }
}

impl UserProfileStore for MemoryProfileStore {
    fn daily_goal_hours(&self, user_id: Uuid) -> Result<f64> {
        self.profiles
            .get(&user_id)
            .map(|p| p.daily_goal_hours)
            .ok_or_else(|| Error::NotFound(format!("profile for user {}", user_id)))
    }
}
