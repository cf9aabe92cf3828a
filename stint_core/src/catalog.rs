//! Default catalog of achievement tiers.
//!
//! Ten tiers: five consecutive-day thresholds for each kind (any-activity
//! consistency and goal-met streaks).

use crate::types::*;
use once_cell::sync::Lazy;

/// Day thresholds shared by both kinds
const TIER_DAYS: [u32; 5] = [7, 21, 50, 100, 300];

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of achievement tiers
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn build_default_catalog_internal() -> Catalog {
    let consistency: [(&str, &str, &str); 5] = [
        ("7-Day Streak", "Study for 7 days in a row.", "fire"),
        ("21-Day Habit", "Study for 21 days in a row.", "calendar2-check"),
        ("50-Day Commitment", "Study for 50 days in a row.", "award"),
        ("100-Day Club", "Study for 100 days in a row.", "trophy"),
        ("300-Day Milestone", "Study for 300 days in a row.", "gem"),
    ];
    let goal: [(&str, &str, &str); 5] = [
        ("Goal Setter", "Meet your daily goal for 7 days in a row.", "flag"),
        ("Goal Achiever", "Meet your daily goal for 21 days in a row.", "bullseye"),
        ("Goal Master", "Meet your daily goal for 50 days in a row.", "shield-check"),
        ("Goal Legend", "Meet your daily goal for 100 days in a row.", "star-fill"),
        ("Goal Demigod", "Meet your daily goal for 300 days in a row.", "stars"),
    ];

    let mut definitions = Vec::with_capacity(TIER_DAYS.len() * 2);

    for (i, &days) in TIER_DAYS.iter().enumerate() {
        let (name, description, icon) = consistency[i];
        definitions.push(AchievementDefinition {
            id: format!("consistency-{}", days),
            name: name.into(),
            description: description.into(),
            kind: AchievementKind::Consistency,
            required_consecutive_days: days,
            display_icon: icon.into(),
        });
    }

    for (i, &days) in TIER_DAYS.iter().enumerate() {
        let (name, description, icon) = goal[i];
        definitions.push(AchievementDefinition {
            id: format!("goal-{}", days),
            name: name.into(),
            description: description.into(),
            kind: AchievementKind::Goal,
            required_consecutive_days: days,
            display_icon: icon.into(),
        });
    }

    Catalog { definitions }
}

impl Catalog {
    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_ids = std::collections::HashSet::new();

        for def in &self.definitions {
            if def.id.is_empty() {
                errors.push("Achievement definition has empty ID".to_string());
            }
            if !seen_ids.insert(def.id.as_str()) {
                errors.push(format!("Duplicate achievement ID '{}'", def.id));
            }
            if def.name.is_empty() {
                errors.push(format!("Achievement '{}' has empty name", def.id));
            }
            if def.description.is_empty() {
                errors.push(format!("Achievement '{}' has empty description", def.id));
            }
            if def.required_consecutive_days == 0 {
                errors.push(format!(
                    "Achievement '{}' requires zero consecutive days",
                    def.id
                ));
            }
        }

        // Both kinds must be represented, with thresholds strictly ascending
        // within each kind
        for kind in [AchievementKind::Consistency, AchievementKind::Goal] {
            let tiers: Vec<u32> = self
                .definitions
                .iter()
                .filter(|d| d.kind == kind)
                .map(|d| d.required_consecutive_days)
                .collect();

            if tiers.is_empty() {
                errors.push(format!("Catalog has no {:?} tiers", kind));
            }
            if tiers.windows(2).any(|w| w[0] >= w[1]) {
                errors.push(format!(
                    "{:?} tier thresholds are not strictly ascending: {:?}",
                    kind, tiers
                ));
            }
        }

        errors
    }
}
