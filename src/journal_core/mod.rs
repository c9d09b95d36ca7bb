//! Core journal functionality without terminal I/O.
//!
//! This module contains the entry content model, the entry collection and
//! its persistence rules, and date selection helpers.

pub mod document;
pub mod entry;
pub mod store;

pub use document::{display_marker, Document, Marker, Node};
pub use entry::JournalEntry;
pub use store::{EntryStore, SaveOutcome};

use crate::constants;
use crate::day::parse_date_key;
use chrono::{Duration, NaiveDate};

/// Represents the ways a user can name a journal day.
///
/// # Examples
///
/// ```
/// use daybook::journal_core::DateSpecifier;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
///
/// let spec = DateSpecifier::parse("yesterday").unwrap();
/// assert_eq!(spec.resolve(today), NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
///
/// let spec = DateSpecifier::parse("20230115").unwrap();
/// assert_eq!(spec.resolve(today).to_string(), "2023-01-15");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DateSpecifier {
    /// Today's entry.
    Today,
    /// The entry for the day before today.
    Yesterday,
    /// The entry for a specific date.
    Specific(NaiveDate),
}

impl DateSpecifier {
    /// Creates a DateSpecifier from an optional command-line argument,
    /// defaulting to today.
    pub fn from_cli_arg(arg: Option<&str>) -> Result<Self, chrono::ParseError> {
        match arg {
            Some(arg) => Self::parse(arg),
            None => Ok(DateSpecifier::Today),
        }
    }

    /// Parses `today`, `yesterday`, `YYYY-MM-DD` or `YYYYMMDD`.
    pub fn parse(input: &str) -> Result<Self, chrono::ParseError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DateSpecifier::Today),
            "yesterday" => Ok(DateSpecifier::Yesterday),
            other => NaiveDate::parse_from_str(other, constants::DATE_FORMAT_ISO)
                .or_else(|_| NaiveDate::parse_from_str(other, constants::DATE_FORMAT_COMPACT))
                .map(DateSpecifier::Specific),
        }
    }

    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match self {
            DateSpecifier::Today => today,
            DateSpecifier::Yesterday => today - Duration::days(1),
            DateSpecifier::Specific(date) => *date,
        }
    }

    /// Resolves to an entry key (`YYYY-MM-DD`).
    pub fn resolve_key(&self, today: NaiveDate) -> String {
        self.resolve(today)
            .format(constants::DATE_FORMAT_ISO)
            .to_string()
    }
}

/// Short, human label for an entry date relative to `today`:
/// `today (jan 15)`, `yesterday (jan 14)`, or `jan 3, 2024`.
pub fn format_date_label(date_key: &str, today: NaiveDate) -> String {
    let Some(date) = parse_date_key(date_key) else {
        return date_key.to_string();
    };

    let short = date.format("%b %-d").to_string().to_lowercase();
    if date == today {
        format!("today ({})", short)
    } else if Some(date) == today.pred_opt() {
        format!("yesterday ({})", short)
    } else {
        date.format("%b %-d, %Y").to_string().to_lowercase()
    }
}
