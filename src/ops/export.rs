//! Export and copy operations.

use super::read_entries;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::{copy_to_clipboard, render_export, write_export};
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes all entries to `output` (a file, or a directory to put the default
/// file name in). Returns the written path, or `None` if there was nothing
/// to export.
pub fn export_entries(
    config: &Config,
    output: Option<&Path>,
    now: &DateTime<Local>,
) -> AppResult<Option<PathBuf>> {
    let (_, store) = read_entries(config)?;
    let Some(text) = render_export(store.entries(), now) else {
        info!("No entries to export");
        return Ok(None);
    };

    let target = output.unwrap_or_else(|| Path::new("."));
    write_export(target, &text, now).map(Some)
}

/// Sends all entries to the clipboard via the terminal. Returns false if
/// there was nothing to copy or the copy failed.
pub fn copy_entries(config: &Config, now: &DateTime<Local>, terminal: &mut impl Write) -> AppResult<bool> {
    let (_, store) = read_entries(config)?;
    match render_export(store.entries(), now) {
        Some(text) => Ok(copy_to_clipboard(&text, terminal)),
        None => {
            info!("No entries to copy");
            Ok(false)
        }
    }
}
