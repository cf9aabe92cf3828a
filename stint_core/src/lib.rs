#![forbid(unsafe_code)]

//! Core domain model and business logic for the Stint study tracker.
//!
//! This crate provides:
//! - Domain types (activity records, achievements, profiles)
//! - The static achievement catalog
//! - Streak evaluation, achievement reconciliation, and XP scoring
//! - Store contracts with in-memory implementations
//! - Persistence adapters (activity journal, state file, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod streak;
pub mod score;
pub mod store;
pub mod reconcile;
pub mod engine;
pub mod journal;
pub mod state;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use store::{
    AchievementRecordStore, ActivityStore, MemoryAchievementStore, MemoryActivityStore,
    MemoryProfileStore, UserProfileStore,
};
pub use reconcile::ReconcileSummary;
pub use journal::{JournalEvent, JournalSink, JsonlJournal};
pub use state::UserState;
