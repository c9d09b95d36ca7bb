/*!
# Daybook

Daybook is a password-gated daily journal for the terminal. There is one
entry per calendar day; everything typed is saved as it is typed, and when
the writer pauses for a while a time marker is dropped into the entry so the
day reads as a series of timed bursts.

## Architecture

- `journal_core`: entry content model, the entry store and its persistence rules
- `day`: calendar-day keys and midnight rollover detection
- `session`: idle markers, the lock gate, the editor surface and the `Journal` state
- `storage`: key-value persistence and the single-session lock
- `settings`: individually persisted settings (threshold, password, colors)
- `export`: plain-text export to a file or the clipboard
- `ops`: the operations behind each subcommand
- `cli`, `config`, `errors`, `constants`, `clock`: the ambient pieces

## Usage Example

```rust
use daybook::clock::ManualClock;
use daybook::session::{Edit, Journal};
use daybook::storage::MemoryStore;
use chrono::{Local, TimeZone};

fn main() -> daybook::AppResult<()> {
    let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
    let mut journal = Journal::open(Box::new(MemoryStore::new()), Box::new(clock))?;

    journal.edit(&Edit::Line("first thought of the day".to_string()))?;
    assert_eq!(journal.entries()[0].content, "first thought of the day<br>");
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Wall-clock access
pub mod clock;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Calendar days and rollover
pub mod day;
/// Error types and utilities for error handling
pub mod errors;
/// Plain-text export
pub mod export;
/// Entry model and store
pub mod journal_core;
/// Subcommand operations
pub mod ops;
/// Interactive session state
pub mod session;
/// Persisted settings
pub mod settings;
/// Key-value storage
pub mod storage;

pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use journal_core::DateSpecifier;
