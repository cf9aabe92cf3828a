//! CSV export of activity history.

use crate::store::ActivityStore;
use crate::Result;
use std::path::Path;
use uuid::Uuid;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    day: String,
    hours: f64,
    goal_met: bool,
}

/// Export a user's full history as CSV, oldest day first.
///
/// Overwrites any existing file at `path` and syncs it to disk before
/// returning. `goal_met` is judged against the goal in force now, matching
/// how every other derived view treats historical days. Returns the number
/// of rows written.
pub fn export_history(
    activity: &impl ActivityStore,
    user_id: Uuid,
    daily_goal_hours: f64,
    path: &Path,
) -> Result<usize> {
    let history = activity.find_all_for_user(user_id)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;

    for record in &history {
        writer.serialize(CsvRow {
            day: record.day.to_string(),
            hours: record.hours,
            goal_met: record.hours >= daily_goal_hours,
        })?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} rows to {:?}", history.len(), path);
    Ok(history.len())
}
