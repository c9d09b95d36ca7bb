//! Settings operations: idle threshold, lock password, and colors.

use super::{open_journal, open_settings};
use crate::cli::ThemeAction;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::session::{ChangeOutcome, IdleThreshold, Journal};
use crate::settings::{self, Hsl, Theme};
use crate::storage::FileStore;
use std::io::{BufRead, Write};
use zeroize::Zeroizing;

/// Prints the idle threshold, or sets it when `minutes` is given.
pub fn show_or_set_threshold(config: &Config, minutes: Option<f64>, out: &mut impl Write) -> AppResult<()> {
    let threshold = match minutes {
        Some(minutes) => {
            let threshold = IdleThreshold::from_minutes(minutes)?;
            let (_lock, mut journal) = open_journal(config)?;
            journal.set_threshold(threshold)?;
            threshold
        }
        None => settings::load_threshold(&FileStore::open(&config.data_dir)?)?,
    };
    writeln!(out, "time marker after {} minutes idle", threshold.minutes())?;
    Ok(())
}

/// Where password input comes from.
pub enum PasswordSource<'a> {
    /// Prompt on the terminal without echo.
    Terminal,
    /// Read one line per prompt.
    Lines(&'a mut dyn BufRead),
}

impl PasswordSource<'_> {
    fn read(&mut self, prompt: &str) -> AppResult<Zeroizing<String>> {
        match self {
            PasswordSource::Terminal => rpassword::prompt_password(prompt)
                .map(Zeroizing::new)
                .map_err(|e| AppError::Journal(format!("Failed to read password: {}", e))),
            PasswordSource::Lines(reader) => {
                let mut line = Zeroizing::new(String::new());
                reader.read_line(&mut line)?;
                let trimmed = line.trim_end_matches(['\r', '\n']).len();
                line.truncate(trimmed);
                Ok(line)
            }
        }
    }
}

/// Runs the two-step change: confirm the current password, then set a new
/// non-blank one. Returns true if the password was changed.
pub fn change_password(config: &Config, source: PasswordSource<'_>, out: &mut impl Write) -> AppResult<bool> {
    let (_lock, mut journal) = open_journal(config)?;
    change_journal_password(&mut journal, source, out)
}

fn change_journal_password(
    journal: &mut Journal,
    mut source: PasswordSource<'_>,
    out: &mut impl Write,
) -> AppResult<bool> {
    let current = source.read("current password: ")?;
    if journal.change_password(&current)? != ChangeOutcome::Confirmed {
        writeln!(out, "incorrect password")?;
        return Ok(false);
    }

    let new = source.read("new password: ")?;
    match journal.change_password(&new)? {
        ChangeOutcome::Changed(_) => {
            writeln!(out, "password changed")?;
            Ok(true)
        }
        _ => {
            writeln!(out, "password cannot be blank")?;
            Ok(false)
        }
    }
}

/// Shows or changes the color theme.
pub fn theme(config: &Config, action: Option<ThemeAction>, out: &mut impl Write) -> AppResult<()> {
    let action = action.unwrap_or(ThemeAction::Show);
    if action == ThemeAction::Show {
        let store = FileStore::open(&config.data_dir)?;
        return write_theme(&Theme::load(&store)?, out);
    }

    let (_lock, mut store) = open_settings(config)?;
    let mut theme = Theme::load(&store)?;
    apply_theme_action(&mut theme, &action)?;
    theme.save(&mut store)?;
    write_theme(&theme, out)
}

fn apply_theme_action(theme: &mut Theme, action: &ThemeAction) -> AppResult<()> {
    match action {
        ThemeAction::Show => {}
        ThemeAction::Preset { number } => theme.apply_preset(usize::from(*number) - 1)?,
        ThemeAction::Save { number } => theme.store_preset(usize::from(*number) - 1)?,
        ThemeAction::Set {
            hue,
            saturation,
            lightness,
            bg_hue,
            bg_saturation,
            bg_lightness,
        } => {
            let fg = theme.foreground;
            theme.foreground = Hsl::new(
                hue.unwrap_or(fg.hue),
                saturation.unwrap_or(fg.saturation),
                lightness.unwrap_or(fg.lightness),
            );
            let bg = theme.background;
            theme.background = Hsl::new(
                bg_hue.unwrap_or(bg.hue),
                bg_saturation.unwrap_or(bg.saturation),
                bg_lightness.unwrap_or(bg.lightness),
            );
        }
    }
    Ok(())
}

fn write_theme(theme: &Theme, out: &mut impl Write) -> AppResult<()> {
    writeln!(out, "foreground: {}", theme.foreground.css(0.0))?;
    writeln!(out, "background: {}", theme.background.css(0.0))?;
    for (i, preset) in theme.presets.iter().enumerate() {
        let fg = Hsl::new(preset.hue, preset.sat, preset.light);
        let bg = Hsl::new(preset.bg_hue, preset.bg_sat, preset.bg_light);
        let current = if *preset == theme.current_preset() { " *" } else { "" };
        writeln!(out, "preset {}: {} on {}{}", i + 1, fg.css(0.0), bg.css(0.0), current)?;
    }
    Ok(())
}
