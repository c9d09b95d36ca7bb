//! Read-only views of the journal.

use super::read_entries;
use crate::config::Config;
use crate::errors::AppResult;
use crate::journal_core::{format_date_label, DateSpecifier, EntryStore, JournalEntry};
use crate::settings;
use chrono::NaiveDate;
use std::io::Write;

fn word_count(entry: &JournalEntry) -> usize {
    entry.document().to_export_text().split_whitespace().count()
}

/// Prints one line per entry, newest first.
pub fn list_entries(config: &Config, today: NaiveDate, out: &mut impl Write) -> AppResult<()> {
    let (_, store) = read_entries(config)?;
    write_entry_list(&store, today, out)
}

fn write_entry_list(store: &EntryStore, today: NaiveDate, out: &mut impl Write) -> AppResult<()> {
    if store.is_empty() {
        writeln!(out, "no entries yet")?;
        return Ok(());
    }

    for entry in store.entries() {
        let words = word_count(entry);
        writeln!(
            out,
            "{}  {}  {} words",
            entry.date,
            format_date_label(&entry.date, today),
            words
        )?;
    }
    Ok(())
}

/// Prints a single entry with markers drawn as separator lines.
pub fn show_entry(
    config: &Config,
    date: &DateSpecifier,
    today: NaiveDate,
    out: &mut impl Write,
) -> AppResult<()> {
    let (_, store) = read_entries(config)?;
    let key = date.resolve_key(today);
    let label = format_date_label(&key, today);

    match store.get(&key) {
        Some(entry) if !entry.is_blank() => {
            writeln!(out, "{}", label)?;
            writeln!(out)?;
            writeln!(out, "{}", entry.document().to_display_text())?;
        }
        _ => writeln!(out, "nothing written for {}", label)?,
    }
    Ok(())
}

/// Prints entry, word, and keystroke totals plus the idle threshold.
pub fn show_stats(config: &Config, out: &mut impl Write) -> AppResult<()> {
    let (kv, store) = read_entries(config)?;
    let written = store.entries().iter().filter(|e| !e.is_blank()).count();
    let words: usize = store
        .entries()
        .iter()
        .map(word_count)
        .sum();

    writeln!(out, "entries: {} ({} with writing)", store.len(), written)?;
    writeln!(out, "words: {}", words)?;
    writeln!(out, "keystrokes: {}", settings::load_keystrokes(&kv)?)?;
    writeln!(
        out,
        "time marker after: {} minutes idle",
        settings::load_threshold(&kv)?.minutes()
    )?;
    Ok(())
}
