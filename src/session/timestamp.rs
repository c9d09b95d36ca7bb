//! Idle-time markers.
//!
//! After the writer pauses for longer than the configured threshold, a time
//! marker is appended to the entry so a day's writing reads as a series of
//! timed bursts. The check runs from two places, the one-second tick and
//! each keystroke, and both share the state below, so a single pause yields
//! at most one marker.

use crate::constants;
use crate::errors::{AppError, AppResult};
use crate::journal_core::Document;
use chrono::{DateTime, Duration, Local};
use tracing::debug;

/// How long the writer must be idle before a marker is inserted.
///
/// Accepted range is 5 seconds to 60 minutes; the value is kept in minutes,
/// which is how it is persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleThreshold {
    minutes: f64,
}

impl Default for IdleThreshold {
    fn default() -> Self {
        Self {
            minutes: constants::DEFAULT_THRESHOLD_MINUTES,
        }
    }
}

impl IdleThreshold {
    /// # Examples
    ///
    /// ```
    /// use daybook::session::IdleThreshold;
    ///
    /// let threshold = IdleThreshold::from_minutes(0.1).unwrap();
    /// assert_eq!(threshold.duration().num_seconds(), 6);
    ///
    /// assert!(IdleThreshold::from_minutes(0.05).is_err()); // 3 seconds
    /// assert!(IdleThreshold::from_minutes(61.0).is_err());
    /// ```
    pub fn from_minutes(minutes: f64) -> AppResult<Self> {
        let min = constants::MIN_THRESHOLD_SECS / 60.0;
        let max = constants::MAX_THRESHOLD_MINUTES;
        // Small tolerance so that 5 seconds entered as 0.0833 minutes is accepted.
        if !minutes.is_finite() || minutes < min - 1e-3 || minutes > max {
            return Err(AppError::Journal(format!(
                "Idle threshold must be between {} seconds and {} minutes (got {} minutes)",
                constants::MIN_THRESHOLD_SECS,
                constants::MAX_THRESHOLD_MINUTES,
                minutes
            )));
        }
        Ok(Self { minutes })
    }

    pub fn minutes(&self) -> f64 {
        self.minutes
    }

    pub fn duration(&self) -> Duration {
        Duration::milliseconds((self.minutes * 60_000.0).round() as i64)
    }
}

/// Formats a marker label (`HH:MM:SS`, local time).
pub fn marker_label(now: &DateTime<Local>) -> String {
    now.format(constants::MARKER_TIME_FORMAT).to_string()
}

/// Per-session idle tracking.
#[derive(Debug, Clone)]
pub struct TimestampInserter {
    threshold: IdleThreshold,
    last_typed: DateTime<Local>,
    last_content_length: usize,
    inserted_for_pause: bool,
}

impl TimestampInserter {
    pub fn new(threshold: IdleThreshold, now: DateTime<Local>) -> Self {
        Self {
            threshold,
            last_typed: now,
            last_content_length: 0,
            inserted_for_pause: false,
        }
    }

    pub fn threshold(&self) -> IdleThreshold {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: IdleThreshold) {
        self.threshold = threshold;
    }

    pub fn last_typed(&self) -> DateTime<Local> {
        self.last_typed
    }

    pub fn has_inserted_for_pause(&self) -> bool {
        self.inserted_for_pause
    }

    /// Forgets all idle state, as when switching to another day.
    pub fn reset(&mut self, now: DateTime<Local>) {
        self.last_typed = now;
        self.last_content_length = 0;
        self.inserted_for_pause = false;
    }

    /// Records the length of freshly loaded content without touching the
    /// idle timer.
    pub fn rebase(&mut self, doc: &Document) {
        self.last_content_length = doc.text_len();
    }

    /// Inserts a marker if the writer has been idle long enough, the entry
    /// has content, there was content before the pause, and no marker has
    /// been inserted for this pause yet. Returns true if a marker was added.
    pub fn poll(&mut self, doc: &mut Document, now: DateTime<Local>) -> bool {
        let idle = now - self.last_typed;
        if idle < self.threshold.duration()
            || doc.is_blank()
            || self.last_content_length == 0
            || self.inserted_for_pause
        {
            return false;
        }

        let label = marker_label(&now);
        doc.append_marker(&label);
        self.inserted_for_pause = true;
        self.last_content_length = doc.text_len();
        debug!("Inserted time marker {} after {}s idle", label, idle.num_seconds());
        true
    }

    /// Handles an edit that has already been applied to `doc`.
    ///
    /// A marker left with nothing after it is removed first, then the idle
    /// check runs against the pause that just ended, and finally the pause
    /// is closed. A marker inserted by this keystroke survives it; the flag
    /// is cleared on the following keystroke. Returns true if a marker was
    /// inserted.
    pub fn on_keystroke(&mut self, doc: &mut Document, now: DateTime<Local>) -> bool {
        if doc.remove_dangling_marker() {
            debug!("Removed time marker with no text after it");
        }

        let inserted = self.poll(doc, now);
        if !inserted {
            self.inserted_for_pause = false;
        }

        self.last_typed = now;
        self.last_content_length = doc.text_len();
        inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }

    fn six_seconds() -> IdleThreshold {
        IdleThreshold::from_minutes(0.1).unwrap()
    }

    fn typed(inserter: &mut TimestampInserter, doc: &mut Document, text: &str, at: DateTime<Local>) {
        doc.push_text(text);
        inserter.on_keystroke(doc, at);
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(IdleThreshold::from_minutes(5.0 / 60.0).is_ok());
        assert!(IdleThreshold::from_minutes(60.0).is_ok());
        assert!(IdleThreshold::from_minutes(0.0).is_err());
        assert!(IdleThreshold::from_minutes(f64::NAN).is_err());
        assert_eq!(IdleThreshold::default().duration(), Duration::minutes(10));
    }

    #[test]
    fn test_marker_label_format() {
        let at = Local.with_ymd_and_hms(2024, 1, 15, 7, 5, 3).unwrap();
        assert_eq!(marker_label(&at), "07:05:03");
    }

    #[test]
    fn test_poll_inserts_once_per_pause() {
        let mut doc = Document::new();
        let mut inserter = TimestampInserter::new(six_seconds(), start());
        typed(&mut inserter, &mut doc, "a", start());

        assert!(!inserter.poll(&mut doc, start() + Duration::seconds(5)));
        assert!(inserter.poll(&mut doc, start() + Duration::seconds(6)));
        assert!(!inserter.poll(&mut doc, start() + Duration::seconds(7)));
        assert!(!inserter.poll(&mut doc, start() + Duration::seconds(60)));
        assert_eq!(doc.marker_count(), 1);
        assert_eq!(doc.nodes().last(), Some(&crate::journal_core::Node::LineBreak));
    }

    #[test]
    fn test_no_marker_without_prior_content() {
        let mut doc = Document::new();
        let mut inserter = TimestampInserter::new(six_seconds(), start());

        // Loaded content counts as prior content only once rebased.
        doc.push_text("loaded");
        assert!(!inserter.poll(&mut doc, start() + Duration::seconds(30)));

        inserter.rebase(&doc);
        assert!(inserter.poll(&mut doc, start() + Duration::seconds(30)));
    }

    #[test]
    fn test_no_marker_for_blank_content() {
        let mut doc = Document::new();
        let mut inserter = TimestampInserter::new(six_seconds(), start());
        typed(&mut inserter, &mut doc, "   ", start());
        assert!(!inserter.poll(&mut doc, start() + Duration::seconds(30)));
    }

    #[test]
    fn test_keystroke_after_pause_inserts_when_poll_did_not() {
        let mut doc = Document::new();
        let mut inserter = TimestampInserter::new(six_seconds(), start());
        typed(&mut inserter, &mut doc, "a", start());

        doc.push_text("b");
        assert!(inserter.on_keystroke(&mut doc, start() + Duration::seconds(8)));
        assert_eq!(doc.marker_count(), 1);
        assert!(inserter.has_inserted_for_pause());

        // The poll sees the same pause as already marked.
        assert!(!inserter.poll(&mut doc, start() + Duration::seconds(8)));

        // The next keystroke clears the flag without removing the marker's
        // new content.
        doc.push_text("c");
        assert!(!inserter.on_keystroke(&mut doc, start() + Duration::seconds(9)));
        assert!(!inserter.has_inserted_for_pause());
        assert_eq!(doc.marker_count(), 1);
    }

    #[test]
    fn test_poll_then_keystroke_yields_single_marker() {
        let mut doc = Document::new();
        let mut inserter = TimestampInserter::new(six_seconds(), start());
        typed(&mut inserter, &mut doc, "a", start());

        assert!(inserter.poll(&mut doc, start() + Duration::seconds(7)));
        doc.push_text("b");
        assert!(!inserter.on_keystroke(&mut doc, start() + Duration::seconds(7)));
        assert_eq!(doc.marker_count(), 1);
        assert_eq!(doc.plain_text(), "a09:00:07b");
    }

    #[test]
    fn test_second_pause_gets_second_marker() {
        let mut doc = Document::new();
        let mut inserter = TimestampInserter::new(six_seconds(), start());
        typed(&mut inserter, &mut doc, "a", start());
        assert!(inserter.poll(&mut doc, start() + Duration::seconds(7)));

        typed(&mut inserter, &mut doc, "b", start() + Duration::seconds(8));
        assert!(inserter.poll(&mut doc, start() + Duration::seconds(15)));
        assert_eq!(doc.marker_count(), 2);
    }

    #[test]
    fn test_backing_into_marker_removes_it() {
        let mut doc = Document::new();
        let mut inserter = TimestampInserter::new(six_seconds(), start());
        typed(&mut inserter, &mut doc, "a", start());
        inserter.poll(&mut doc, start() + Duration::seconds(7));
        typed(&mut inserter, &mut doc, "b", start() + Duration::seconds(8));

        // Delete everything typed after the marker.
        doc.delete_last_line();
        inserter.on_keystroke(&mut doc, start() + Duration::seconds(9));

        assert_eq!(doc.marker_count(), 0);
        assert_eq!(doc.to_markup(), "a");
    }

    #[test]
    fn test_reset_clears_idle_state() {
        let mut doc = Document::new();
        let mut inserter = TimestampInserter::new(six_seconds(), start());
        typed(&mut inserter, &mut doc, "a", start());

        let later = start() + Duration::seconds(30);
        inserter.reset(later);
        assert_eq!(inserter.last_typed(), later);
        assert!(!inserter.poll(&mut doc, later + Duration::seconds(30)));
    }
}
