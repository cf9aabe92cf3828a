//! Core domain types for the Stint study tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Activity records (one per user per calendar day)
//! - Achievement definitions and records
//! - User profiles and derived progression views

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound for hours logged against a single day
pub const MAX_DAILY_HOURS: f64 = 24.0;

// ============================================================================
// Activity Types
// ============================================================================

/// One logged day of study activity.
///
/// At most one record exists per `(user_id, day)`; that pair is the unique
/// key everywhere (stores, journal replay). Records are created and edited
/// by the log-entry surface, never by the engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    pub user_id: Uuid,
    /// Calendar date in UTC, no time component
    pub day: NaiveDate,
    /// Hours studied that day, 0..=24
    pub hours: f64,
}

// ============================================================================
// Achievement Types
// ============================================================================

/// Which streak predicate a tier is measured against
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    /// Any day with non-zero hours counts
    Consistency,
    /// Only days at or above the daily goal count
    Goal,
}

impl AchievementKind {
    /// Whether a day's hours qualify under this kind.
    ///
    /// Goal tiers are always judged against the goal in force at
    /// reconciliation time, not the goal when the hours were logged.
    pub fn qualifies(&self, hours: f64, daily_goal_hours: f64) -> bool {
        match self {
            AchievementKind::Consistency => hours > 0.0,
            AchievementKind::Goal => hours >= daily_goal_hours,
        }
    }
}

/// A single tier in the static achievement catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: AchievementKind,
    pub required_consecutive_days: u32,
    pub display_icon: String,
}

/// A user's unlocked achievement.
///
/// Unique per `(user_id, achievement_id)`. A record exists only while the
/// tier is currently earned; reconciliation deletes records whose streak no
/// longer holds (achievements are a derived view, not a permanent ledger).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AchievementRecord {
    pub user_id: Uuid,
    pub achievement_id: String,
    pub achieved: bool,
    pub date_achieved: DateTime<Utc>,
    pub notified: bool,
    /// Daily goal in force at unlock time; set only for Goal tiers
    pub goal_value_at_achievement: Option<f64>,
}

// ============================================================================
// Profile and Derived Views
// ============================================================================

/// Externally owned user profile. The engine reads `daily_goal_hours` and
/// never writes it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub name: String,
    /// Must be > 0; validated at the input surface
    pub daily_goal_hours: f64,
}

/// Derived experience score, recomputed on demand and never persisted
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressionSnapshot {
    pub total_xp: u64,
    /// 1..=100
    pub level: u32,
}

/// Current and longest streaks for both tier kinds
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakSummary {
    pub current_consistency: u32,
    pub current_goal: u32,
    pub longest_consistency: u32,
    pub longest_goal: u32,
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The complete ordered catalog of achievement tiers.
///
/// Built once at process start and passed by reference; never mutated.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub definitions: Vec<AchievementDefinition>,
}

impl Catalog {
    /// Look up a definition by id
    pub fn get(&self, id: &str) -> Option<&AchievementDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }
}
