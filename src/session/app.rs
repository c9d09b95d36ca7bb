//! Explicit application state for a journaling session.
//!
//! [`Journal`] owns every piece of session state and exposes one method per
//! user-visible event (an edit, a timer tick, lock, unlock, date switch).
//! Each method runs to completion before the next event is handled, which is
//! what keeps the keystroke and tick paths from inserting two markers for the
//! same pause.

use super::editor::{Edit, EditorSurface};
use super::lock::{ChangeOutcome, LockGate, PasswordChange};
use super::timestamp::{IdleThreshold, TimestampInserter};
use crate::clock::Clock;
use crate::day::{today_key, DayChange, DayResolver};
use crate::errors::AppResult;
use crate::export;
use crate::journal_core::{Document, EntryStore, JournalEntry, Node, SaveOutcome};
use crate::settings;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Local};
use tracing::{debug, info};

/// Something the session did on its own that a front end may want to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A time marker was appended to the active entry.
    MarkerInserted { date: String, label: String },
    /// The local date changed while the session was open.
    DayChanged(DayChange),
    /// A blank entry for a past day was removed.
    EntryPruned(String),
}

pub struct Journal {
    kv: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    store: EntryStore,
    resolver: DayResolver,
    inserter: TimestampInserter,
    gate: LockGate,
    password_change: PasswordChange,
    editor: EditorSurface,
    total_keystrokes: u64,
}

impl Journal {
    /// Loads persisted state, makes sure today's entry exists, and binds the
    /// editor to today.
    pub fn open(mut kv: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> AppResult<Self> {
        let now = clock.now();

        let mut store = EntryStore::load(kv.as_ref())?;
        store.ensure_today(kv.as_mut(), clock.as_ref())?;

        let threshold = settings::load_threshold(kv.as_ref())?;
        let total_keystrokes = settings::load_keystrokes(kv.as_ref())?;
        let password = settings::load_password(kv.as_ref())?;

        let today = today_key(&now);
        let document = document_for(&store, &today);
        let mut inserter = TimestampInserter::new(threshold, now);
        inserter.rebase(&document);

        info!("Opened journal with {} entries", store.len());
        Ok(Self {
            kv,
            clock,
            store,
            resolver: DayResolver::new(&now),
            inserter,
            gate: LockGate::new(password.as_str()),
            password_change: PasswordChange::new(),
            editor: EditorSurface::new(&today, document),
            total_keystrokes,
        })
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn today(&self) -> String {
        today_key(&self.clock.now())
    }

    /// The date the editor is showing.
    pub fn active_date(&self) -> &str {
        self.editor.date()
    }

    pub fn document(&self) -> &Document {
        self.editor.document()
    }

    pub fn entries(&self) -> &[JournalEntry] {
        self.store.entries()
    }

    pub fn get_entry(&self, date: &str) -> Option<&JournalEntry> {
        self.store.get(date)
    }

    pub fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    pub fn total_keystrokes(&self) -> u64 {
        self.total_keystrokes
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    /// Gives back the underlying storage, e.g. to reopen it.
    pub fn into_storage(self) -> Box<dyn KeyValueStore> {
        self.kv
    }

    pub fn threshold(&self) -> IdleThreshold {
        self.inserter.threshold()
    }

    pub fn focus(&mut self) {
        if !self.gate.is_locked() {
            self.editor.focus();
        }
    }

    pub fn blur(&mut self) {
        self.editor.blur();
    }

    pub fn is_focused(&self) -> bool {
        self.editor.is_focused()
    }

    /// Applies a content-changing interaction: counts the keystroke, runs the
    /// idle-marker rules, and saves the entry. Ignored while locked.
    pub fn edit(&mut self, edit: &Edit) -> AppResult<Vec<SessionEvent>> {
        let mut events = Vec::new();
        if self.gate.is_locked() {
            debug!("Ignoring edit while locked");
            return Ok(events);
        }
        if !self.editor.apply(edit) {
            return Ok(events);
        }

        let now = self.clock.now();
        self.total_keystrokes += 1;
        settings::save_keystrokes(self.kv.as_mut(), self.total_keystrokes)?;

        if self.inserter.on_keystroke(self.editor.document_mut(), now) {
            events.push(self.marker_event());
        }

        self.save_active(Some(now.timestamp_millis()), &mut events)?;
        Ok(events)
    }

    /// The one-second tick: detects midnight rollover, then checks for an
    /// idle pause. Idle checks only run while unlocked and focused.
    pub fn tick(&mut self) -> AppResult<Vec<SessionEvent>> {
        let mut events = Vec::new();
        let now = self.clock.now();

        if let Some(change) = self.resolver.poll(&now) {
            self.roll_over(&change, now, &mut events)?;
            events.push(SessionEvent::DayChanged(change));
        }

        if self.gate.is_locked() || !self.editor.is_focused() {
            return Ok(events);
        }

        if self.inserter.poll(self.editor.document_mut(), now) {
            events.push(self.marker_event());
            self.save_active(None, &mut events)?;
        }
        Ok(events)
    }

    fn roll_over(
        &mut self,
        change: &DayChange,
        now: DateTime<Local>,
        events: &mut Vec<SessionEvent>,
    ) -> AppResult<()> {
        if self.editor.date() == change.from {
            if !self.editor.document().is_blank() {
                let markup = self.editor.markup();
                self.save(&change.from, &markup, None, events)?;
                debug!("Saved {} before rolling over", change.from);
            }
            self.inserter.reset(now);
            self.store.ensure_today(self.kv.as_mut(), self.clock.as_ref())?;
            let document = document_for(&self.store, &change.to);
            self.editor.bind(&change.to, document);
        } else {
            self.store.ensure_today(self.kv.as_mut(), self.clock.as_ref())?;
        }
        Ok(())
    }

    /// Saves the current content and locks. Locking an already locked
    /// journal does nothing.
    pub fn lock(&mut self) -> AppResult<()> {
        if self.gate.is_locked() {
            return Ok(());
        }
        let now = self.clock.now();
        let mut events = Vec::new();
        self.save_active(Some(now.timestamp_millis()), &mut events)?;
        self.editor.blur();
        self.gate.lock();
        Ok(())
    }

    /// Tries to unlock. On success the entries are reloaded from storage and
    /// the editor is refilled with the active date's stored content.
    pub fn unlock(&mut self, attempt: &str) -> AppResult<bool> {
        if !self.gate.is_locked() {
            return Ok(true);
        }
        if !self.gate.try_unlock(attempt) {
            return Ok(false);
        }

        self.store.reload(self.kv.as_ref())?;
        self.store.ensure_today(self.kv.as_mut(), self.clock.as_ref())?;
        // Locking blurs the editor and focus is refused while locked, so the
        // reloaded entry always replaces what was shown.
        self.refresh_editor();
        Ok(true)
    }

    /// Switches the editor to another day. Idle state starts over so a
    /// pending marker cannot land in the newly selected entry.
    pub fn select_date(&mut self, date: &str) -> AppResult<()> {
        let now = self.clock.now();
        let document = document_for(&self.store, date);
        self.inserter.reset(now);
        self.inserter.rebase(&document);
        self.editor.bind(date, document);
        debug!("Switched editor to {}", date);
        Ok(())
    }

    /// Refreshes the editor from the store if it is not focused.
    fn refresh_editor(&mut self) {
        let date = self.editor.date().to_string();
        let document = document_for(&self.store, &date);
        if self.editor.rehydrate(&date, document) {
            self.inserter.rebase(self.editor.document());
        }
    }

    /// Feeds one input into the two-step password change, persisting the
    /// new password when the flow completes.
    pub fn change_password(&mut self, input: &str) -> AppResult<ChangeOutcome> {
        let outcome = self.password_change.submit(&mut self.gate, input);
        if let ChangeOutcome::Changed(password) = &outcome {
            settings::save_password(self.kv.as_mut(), password)?;
        }
        Ok(outcome)
    }

    pub fn set_threshold(&mut self, threshold: IdleThreshold) -> AppResult<()> {
        settings::save_threshold(self.kv.as_mut(), threshold)?;
        self.inserter.set_threshold(threshold);
        Ok(())
    }

    /// Footer text: word and character counts, or a prompt when empty.
    pub fn status_line(&self) -> String {
        let text = self.editor.document().plain_text();
        if text.is_empty() {
            "waiting for input...".to_string()
        } else {
            format!(
                "{} words | {} chars | auto-saved",
                text.split_whitespace().count(),
                text.chars().count()
            )
        }
    }

    /// Renders the plain-text export of all entries, or `None` if there are
    /// no entries.
    pub fn export_text(&self, exported_at: &DateTime<Local>) -> Option<String> {
        export::render_export(self.store.entries(), exported_at)
    }

    fn marker_event(&self) -> SessionEvent {
        let label = self
            .editor
            .document()
            .nodes()
            .iter()
            .rev()
            .find_map(|node| match node {
                Node::Marker(marker) => Some(marker.label.clone()),
                _ => None,
            })
            .unwrap_or_default();
        SessionEvent::MarkerInserted {
            date: self.editor.date().to_string(),
            label,
        }
    }

    fn save_active(
        &mut self,
        timestamp_hint: Option<i64>,
        events: &mut Vec<SessionEvent>,
    ) -> AppResult<()> {
        let date = self.editor.date().to_string();
        let markup = self.editor.markup();
        self.save(&date, &markup, timestamp_hint, events)
    }

    fn save(
        &mut self,
        date: &str,
        markup: &str,
        timestamp_hint: Option<i64>,
        events: &mut Vec<SessionEvent>,
    ) -> AppResult<()> {
        let outcome = self.store.save(
            self.kv.as_mut(),
            self.clock.as_ref(),
            date,
            markup,
            timestamp_hint,
        )?;
        if outcome == SaveOutcome::Pruned {
            events.push(SessionEvent::EntryPruned(date.to_string()));
        }
        Ok(())
    }
}

fn document_for(store: &EntryStore, date: &str) -> Document {
    store
        .get(date)
        .map(JournalEntry::document)
        .unwrap_or_default()
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("active_date", &self.editor.date())
            .field("entries", &self.store.len())
            .field("gate", &self.gate)
            .finish()
    }
}
