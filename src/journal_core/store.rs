//! The entry collection and its persistence rules.

use super::entry::JournalEntry;
use crate::clock::Clock;
use crate::constants;
use crate::day::today_key;
use crate::errors::AppResult;
use crate::storage::{load_json, store_json, KeyValueStore};
use std::collections::HashSet;
use tracing::{debug, warn};

/// What a [`EntryStore::save`] call did to the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The entry was created or updated.
    Stored,
    /// The content was blank for a day other than today, so the entry was removed.
    Pruned,
}

/// All journal entries, newest first.
///
/// The collection is read once at startup and written back as a whole after
/// every mutation.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<JournalEntry>,
}

impl EntryStore {
    /// Reads the persisted collection. Absent or unreadable storage yields an
    /// empty store.
    pub fn load(kv: &dyn KeyValueStore) -> AppResult<Self> {
        let entries: Vec<JournalEntry> =
            load_json(kv, constants::KEY_ENTRIES)?.unwrap_or_default();
        let mut store = Self { entries };
        store.normalize();
        debug!("Loaded {} journal entries", store.entries.len());
        Ok(store)
    }

    /// Replaces the in-memory collection with what is currently persisted.
    pub fn reload(&mut self, kv: &dyn KeyValueStore) -> AppResult<()> {
        *self = Self::load(kv)?;
        Ok(())
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, date: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    /// Upserts the entry for `date`.
    ///
    /// An existing entry keeps its `started_at`; a missing one is taken from
    /// `timestamp_hint`, falling back to the current time. Blank content for
    /// any day other than today removes the entry instead. The collection is
    /// re-sorted and persisted in full either way.
    pub fn save(
        &mut self,
        kv: &mut dyn KeyValueStore,
        clock: &dyn Clock,
        date: &str,
        content: &str,
        timestamp_hint: Option<i64>,
    ) -> AppResult<SaveOutcome> {
        let now = clock.now();
        let is_today = date == today_key(&now);
        let fallback_start = timestamp_hint.unwrap_or_else(|| now.timestamp_millis());

        let candidate = JournalEntry {
            date: date.to_string(),
            content: content.to_string(),
            started_at: None,
        };

        let outcome = if candidate.is_blank() && !is_today {
            self.entries.retain(|e| e.date != date);
            debug!("Pruned empty entry for {}", date);
            SaveOutcome::Pruned
        } else {
            match self.entries.iter_mut().find(|e| e.date == date) {
                Some(existing) => {
                    existing.content = candidate.content;
                    existing.started_at = existing.started_at.or(Some(fallback_start));
                }
                None => {
                    self.entries.push(JournalEntry {
                        started_at: Some(fallback_start),
                        ..candidate
                    });
                    debug!("Created entry for {}", date);
                }
            }
            SaveOutcome::Stored
        };

        self.sort();
        self.persist(kv)?;
        Ok(outcome)
    }

    /// Makes sure an entry for today exists, creating an empty one stamped
    /// with the current time if needed. Returns true if one was created.
    pub fn ensure_today(&mut self, kv: &mut dyn KeyValueStore, clock: &dyn Clock) -> AppResult<bool> {
        let now = clock.now();
        let today = today_key(&now);
        if self.get(&today).is_some() {
            return Ok(false);
        }

        self.entries.push(JournalEntry {
            date: today.clone(),
            content: String::new(),
            started_at: Some(now.timestamp_millis()),
        });
        self.sort();
        self.persist(kv)?;
        debug!("Created today's entry {}", today);
        Ok(true)
    }

    fn persist(&self, kv: &mut dyn KeyValueStore) -> AppResult<()> {
        store_json(kv, constants::KEY_ENTRIES, &self.entries)
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
    }

    fn normalize(&mut self) {
        let mut seen = HashSet::new();
        let before = self.entries.len();
        self.entries.retain(|e| seen.insert(e.date.clone()));
        if self.entries.len() != before {
            warn!(
                "Dropped {} duplicate stored entries",
                before - self.entries.len()
            );
        }
        self.sort();
    }
}
