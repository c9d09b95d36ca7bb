//! User-facing operations behind each subcommand.
//!
//! Operations that change state take the session lock first, so a settings
//! change cannot race an open writing session. Read-only operations do not.

pub mod export;
pub mod settings;
pub mod view;
pub mod write;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::errors::AppResult;
use crate::journal_core::EntryStore;
use crate::session::Journal;
use crate::storage::{FileStore, SessionLock};

pub use export::{copy_entries, export_entries};
pub use settings::{change_password, show_or_set_threshold, theme};
pub use view::{list_entries, show_entry, show_stats};
pub use write::run_session;

/// Opens the journal for modification, holding the session lock for as long
/// as the returned guard lives.
pub fn open_journal(config: &Config) -> AppResult<(SessionLock, Journal)> {
    let store = FileStore::open(&config.data_dir)?;
    let lock = SessionLock::acquire(&config.data_dir)?;
    let journal = Journal::open(Box::new(store), Box::new(SystemClock))?;
    Ok((lock, journal))
}

/// Opens the raw settings storage under the session lock.
pub fn open_settings(config: &Config) -> AppResult<(SessionLock, FileStore)> {
    let store = FileStore::open(&config.data_dir)?;
    let lock = SessionLock::acquire(&config.data_dir)?;
    Ok((lock, store))
}

/// Reads the entries without locking or modifying anything.
pub fn read_entries(config: &Config) -> AppResult<(FileStore, EntryStore)> {
    let store = FileStore::open(&config.data_dir)?;
    let entries = EntryStore::load(&store)?;
    Ok((store, entries))
}
