//! Append-only activity journal.
//!
//! Log entries are appended to a JSONL (JSON Lines) file with file locking
//! for safe concurrent access. The journal is the source of truth for
//! activity history: replaying it folds every event into the current
//! per-day record set, with the last write for a `(user, day)` pair winning.

use crate::store::{ActivityStore, MemoryActivityStore};
use crate::Result;
use chrono::{DateTime, NaiveDate, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One journal line
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    /// A day's hours were logged or edited
    Logged {
        user_id: Uuid,
        day: NaiveDate,
        hours: f64,
        at: DateTime<Utc>,
    },
    /// All activity for a user was cleared; earlier events are dead
    Cleared { user_id: Uuid, at: DateTime<Utc> },
}

/// Event sink trait for appending journal entries
pub trait JournalSink {
    fn append(&mut self, event: &JournalEvent) -> Result<()>;
}

/// JSONL-based journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl JournalSink for JsonlJournal {
    fn append(&mut self, event: &JournalEvent) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(event)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended event to journal {:?}", self.path);
        Ok(())
    }
}

/// Read all events from a journal file.
///
/// Malformed lines are skipped with a warning rather than failing the whole
/// read; a torn final line must not lose the history before it.
pub fn read_events(path: &Path) -> Result<Vec<JournalEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<JournalEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!("Failed to parse journal line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} events from journal", events.len());
    Ok(events)
}

/// Fold journal events into the current activity record set.
///
/// Events are applied in file order: later `Logged` events replace earlier
/// ones for the same `(user, day)`, and a `Cleared` event drops everything
/// logged for that user before it.
pub fn replay(events: &[JournalEvent]) -> Result<MemoryActivityStore> {
    let mut store = MemoryActivityStore::new();

    for event in events {
        match event {
            JournalEvent::Logged {
                user_id,
                day,
                hours,
                ..
            } => {
                store.upsert(*user_id, *day, *hours)?;
            }
            JournalEvent::Cleared { user_id, .. } => {
                store.delete_all_for_user(*user_id)?;
            }
        }
    }

    Ok(store)
}

/// Load the current activity store from a journal file
pub fn load_activity(path: &Path) -> Result<MemoryActivityStore> {
    let events = read_events(path)?;
    let store = replay(&events)?;
    tracing::info!(
        "Replayed {} journal events into {} records",
        events.len(),
        store.len()
    );
    Ok(store)
}
