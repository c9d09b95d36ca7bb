//! Wall-clock access.
//!
//! Every time-dependent decision (today's date key, idle durations, midnight
//! rollover, `startedAt` stamps) reads the time through [`Clock`] so that
//! sessions can be driven by simulated time in tests.

use chrono::{DateTime, Duration, Local};
use std::cell::Cell;
use std::rc::Rc;

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The real local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A manually advanced clock.
///
/// Clones share the same instant, so a test can keep one handle and hand
/// another to the code under test.
///
/// # Examples
///
/// ```
/// use daybook::clock::{Clock, ManualClock};
/// use chrono::{Duration, Local, TimeZone};
///
/// let start = Local.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
/// let clock = ManualClock::new(start);
/// let handle = clock.clone();
///
/// handle.advance(Duration::seconds(7));
/// assert_eq!(clock.now(), start + Duration::seconds(7));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}
