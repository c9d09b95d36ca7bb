//! Plain-text export of the whole journal, to a file or the clipboard.

use crate::constants;
use crate::day::parse_date_key;
use crate::errors::{AppError, AppResult};
use crate::journal_core::JournalEntry;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn banner() -> String {
    "=".repeat(constants::EXPORT_BANNER_WIDTH)
}

/// Renders every entry, oldest first, as a plain-text document.
///
/// Returns `None` when there are no entries at all, in which case nothing
/// should be written or copied.
pub fn render_export(entries: &[JournalEntry], exported_at: &DateTime<Local>) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut sorted: Vec<&JournalEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut out = String::new();
    out.push_str(constants::EXPORT_TITLE);
    out.push('\n');
    out.push_str(&format!("Exported: {}\n", exported_at.format("%-m/%-d/%Y, %-I:%M:%S %p")));
    out.push_str(&format!("Total Entries: {}\n", entries.len()));
    out.push_str(&banner());
    out.push_str("\n\n");

    for entry in sorted {
        out.push('\n');
        out.push_str(&banner());
        out.push('\n');
        out.push_str(&entry_heading(&entry.date));
        out.push('\n');
        if let Some(started) = entry.started_at.and_then(|ms| Local.timestamp_millis_opt(ms).single()) {
            out.push_str(&format!("Started at: {}\n", started.format(constants::MARKER_TIME_FORMAT)));
        }
        out.push_str(&banner());
        out.push_str("\n\n");
        out.push_str(&entry.document().to_export_text());
        out.push_str("\n\n");
    }

    Some(out)
}

/// Uppercased long-form date, e.g. `MONDAY, JANUARY 15, 2024`. Keys that do
/// not parse are shown as they are.
fn entry_heading(date_key: &str) -> String {
    match parse_date_key(date_key) {
        Some(date) => date.format(constants::EXPORT_DATE_FORMAT).to_string().to_uppercase(),
        None => date_key.to_string(),
    }
}

/// `journal-export-YYYY-MM-DD.txt`
pub fn export_file_name(exported_at: &DateTime<Local>) -> String {
    format!(
        "{}{}.txt",
        constants::EXPORT_FILE_PREFIX,
        exported_at.format(constants::DATE_FORMAT_ISO)
    )
}

/// Writes the export to `target`. A directory target gets the default file
/// name inside it.
pub fn write_export(target: &Path, text: &str, exported_at: &DateTime<Local>) -> AppResult<PathBuf> {
    let path = if target.is_dir() {
        target.join(export_file_name(exported_at))
    } else {
        target.to_path_buf()
    };

    fs::write(&path, text).map_err(|e| {
        AppError::Journal(format!("Failed to write export to {}: {}", path.display(), e))
    })?;
    info!("Exported journal to {}", path.display());
    Ok(path)
}

/// Builds the OSC 52 sequence that asks the terminal to set the system
/// clipboard.
pub fn clipboard_sequence(text: &str) -> AppResult<String> {
    let encoded = STANDARD.encode(text.as_bytes());
    if encoded.len() > constants::MAX_CLIPBOARD_PAYLOAD {
        return Err(AppError::Journal(format!(
            "Export too large for the clipboard ({} > {} bytes encoded)",
            encoded.len(),
            constants::MAX_CLIPBOARD_PAYLOAD
        )));
    }
    Ok(format!("\x1b]52;c;{}\x07", encoded))
}

/// Copies `text` to the clipboard through the terminal. Failures are logged
/// and otherwise ignored. Returns true if the sequence was written.
pub fn copy_to_clipboard(text: &str, writer: &mut impl Write) -> bool {
    let sequence = match clipboard_sequence(text) {
        Ok(sequence) => sequence,
        Err(e) => {
            warn!("Failed to copy to clipboard: {}", e);
            return false;
        }
    };

    match writer.write_all(sequence.as_bytes()).and_then(|_| writer.flush()) {
        Ok(()) => {
            debug!("Wrote {} byte clipboard sequence", sequence.len());
            true
        }
        Err(e) => {
            warn!("Failed to copy to clipboard: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(date: &str, content: &str, started_at: Option<i64>) -> JournalEntry {
        JournalEntry {
            date: date.to_string(),
            content: content.to_string(),
            started_at,
        }
    }

    fn exported_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 16, 14, 5, 9).unwrap()
    }

    #[test]
    fn test_empty_journal_exports_nothing() {
        assert!(render_export(&[], &exported_at()).is_none());
    }

    #[test]
    fn test_export_layout() {
        let started = Local.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        let entries = vec![
            entry("2024-01-15", "hello<br>world", Some(started.timestamp_millis())),
            entry("2024-01-14", "older", None),
        ];
        let text = render_export(&entries, &exported_at()).unwrap();
        let bar = "=".repeat(50);

        let expected_header = format!(
            "=== DAYBOOK ===\nExported: 1/16/2024, 2:05:09 PM\nTotal Entries: 2\n{}\n\n",
            bar
        );
        assert!(text.starts_with(&expected_header));

        let older = format!("\n{bar}\nSUNDAY, JANUARY 14, 2024\n{bar}\n\nolder\n\n");
        let newer = format!(
            "\n{bar}\nMONDAY, JANUARY 15, 2024\nStarted at: 08:30:00\n{bar}\n\nhello\nworld\n\n"
        );
        assert_eq!(text, format!("{}{}{}", expected_header, older, newer));
    }

    #[test]
    fn test_markers_and_blank_lines_in_export() {
        let entries = vec![entry(
            "2024-01-15",
            "a<br><br><br><br>b<br><br><div class=\"timestamp-separator\" contenteditable=\"false\"><div class=\"timestamp-line\"></div><div class=\"timestamp-text\">09:10:00</div></div><br>",
            None,
        )];
        let text = render_export(&entries, &exported_at()).unwrap();
        assert!(text.contains("a\n\nb\n\n09:10:00\n\n"));
    }

    #[test]
    fn test_write_export_into_directory() -> AppResult<()> {
        let dir = tempdir()?;
        let path = write_export(dir.path(), "content", &exported_at())?;
        assert_eq!(path, dir.path().join("journal-export-2024-01-16.txt"));
        assert_eq!(fs::read_to_string(path)?, "content");
        Ok(())
    }

    #[test]
    fn test_clipboard_sequence() -> AppResult<()> {
        let mut out = Vec::new();
        assert!(copy_to_clipboard("hi", &mut out));
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b]52;c;aGk=\x07");

        let huge = "x".repeat(constants::MAX_CLIPBOARD_PAYLOAD);
        assert!(clipboard_sequence(&huge).is_err());
        Ok(())
    }

    #[test]
    fn test_file_and_clipboard_exports_match() -> AppResult<()> {
        let entries = vec![
            entry("2024-01-15", "caf\u{e9} &amp; toast<br><br><br>later", Some(1_705_300_000_000)),
            entry("2024-01-14", "older", None),
        ];
        let text = render_export(&entries, &exported_at()).unwrap();

        let dir = tempdir()?;
        let path = write_export(dir.path(), &text, &exported_at())?;
        let file_bytes = fs::read(path)?;

        let mut out = Vec::new();
        assert!(copy_to_clipboard(&text, &mut out));
        let sequence = String::from_utf8(out).unwrap();
        let payload = sequence
            .strip_prefix("\x1b]52;c;")
            .and_then(|rest| rest.strip_suffix('\x07'))
            .unwrap();
        let clipboard_bytes = STANDARD.decode(payload).unwrap();

        assert_eq!(clipboard_bytes, file_bytes);
        Ok(())
    }
}
