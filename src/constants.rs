//! Constants used throughout the application.
//!
//! This module contains all constants used in the Daybook application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daybook";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A password-gated daily journal with automatic time markers";

// Logging
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "daybook";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the Daybook data directory.
pub const ENV_VAR_DAYBOOK_DIR: &str = "DAYBOOK_DIR";
/// Environment variable for choosing the log output format.
pub const ENV_VAR_DAYBOOK_LOG_FORMAT: &str = "DAYBOOK_LOG_FORMAT";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for persisted state within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".daybook";

// File System Parameters
/// File extension for persisted values.
pub const STORE_FILE_EXTENSION: &str = "json";
/// Name of the lock file guarding an interactive session.
pub const SESSION_LOCK_FILE: &str = ".daybook.lock";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Storage Keys
pub const KEY_ENTRIES: &str = "journalEntries";
pub const KEY_COLOR_HUE: &str = "colorHue";
pub const KEY_COLOR_SATURATION: &str = "colorSaturation";
pub const KEY_COLOR_LIGHTNESS: &str = "colorLightness";
pub const KEY_BG_HUE: &str = "bgHue";
pub const KEY_BG_SATURATION: &str = "bgSaturation";
pub const KEY_BG_LIGHTNESS: &str = "bgLightness";
pub const KEY_COLOR_PRESETS: &str = "colorPresets";
pub const KEY_TIMESTAMP_THRESHOLD: &str = "timestampThreshold";
pub const KEY_TOTAL_KEYSTROKES: &str = "totalKeystrokes";
pub const KEY_PASSWORD: &str = "journalPassword";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD), used as the entry key.
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Time format used in timestamp markers and export start lines.
pub const MARKER_TIME_FORMAT: &str = "%H:%M:%S";
/// Long date format used in export banners (uppercased on output).
pub const EXPORT_DATE_FORMAT: &str = "%A, %B %-d, %Y";
/// Interval of the idle/rollover polling tick.
pub const TICK_INTERVAL_MS: u64 = 1000;

// Timestamp Inserter
/// Default idle threshold before a time marker is inserted, in minutes.
pub const DEFAULT_THRESHOLD_MINUTES: f64 = 10.0;
/// Smallest accepted idle threshold, in seconds.
pub const MIN_THRESHOLD_SECS: f64 = 5.0;
/// Largest accepted idle threshold, in minutes.
pub const MAX_THRESHOLD_MINUTES: f64 = 60.0;

// Lock Gate
/// Password used until the user sets one.
pub const DEFAULT_PASSWORD: &str = "daybook";

// Theme
/// Number of stored theme presets.
pub const THEME_PRESET_COUNT: usize = 4;

// Export
/// Title line at the top of an export.
pub const EXPORT_TITLE: &str = "=== DAYBOOK ===";
/// Width of the `=` banner lines in an export.
pub const EXPORT_BANNER_WIDTH: usize = 50;
/// Prefix of exported file names.
pub const EXPORT_FILE_PREFIX: &str = "journal-export-";

/// Largest base64 payload most terminals accept in one OSC 52 sequence.
pub const MAX_CLIPBOARD_PAYLOAD: usize = 74_994;
