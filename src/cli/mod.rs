//! Command-line interface.
//!
//! Running `daybook` with no subcommand opens today's entry for writing.

use crate::constants;
use crate::journal_core::DateSpecifier;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = constants::APP_NAME, about = constants::APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format, overriding DAYBOOK_LOG_FORMAT
    #[arg(long, global = true, value_parser = ["text", "json"])]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Open a writing session (the default)
    Write {
        /// Entry to open: today, yesterday, YYYY-MM-DD or YYYYMMDD
        #[arg(short = 'd', long)]
        date: Option<String>,
    },
    /// List entries, newest first
    List,
    /// Print one entry as plain text
    Show {
        #[arg(short = 'd', long)]
        date: Option<String>,
    },
    /// Write every entry to a plain-text file
    Export {
        /// File or directory to write to (defaults to the current directory)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Copy every entry to the clipboard
    Copy,
    /// Show or set the idle time, in minutes, before a time marker is added
    Threshold { minutes: Option<f64> },
    /// Change the lock password
    Passwd {
        /// Read the current and new password as two lines on stdin
        #[arg(long)]
        stdin: bool,
    },
    /// Show writing statistics
    Stats,
    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ThemeAction {
    /// Print the current colors and presets
    Show,
    /// Switch to a saved preset
    Preset {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        number: u8,
    },
    /// Save the current colors into a preset slot
    Save {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        number: u8,
    },
    /// Set individual color components
    Set {
        #[arg(long)]
        hue: Option<f64>,
        #[arg(long)]
        saturation: Option<f64>,
        #[arg(long)]
        lightness: Option<f64>,
        #[arg(long)]
        bg_hue: Option<f64>,
        #[arg(long)]
        bg_saturation: Option<f64>,
        #[arg(long)]
        bg_lightness: Option<f64>,
    },
}

impl CliArgs {
    /// The subcommand to run, defaulting to a writing session for today.
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Write { date: None })
    }
}

/// Parses a `--date` value, defaulting to today.
pub fn parse_date_arg(date: Option<&str>) -> Result<DateSpecifier, chrono::ParseError> {
    DateSpecifier::from_cli_arg(date)
}
