//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `DAYBOOK_DIR`: Directory holding the journal's storage files (defaults to `~/.daybook`)
//! - `DAYBOOK_LOG_FORMAT`: `text` or `json` log output (defaults to `text`)
//! - `HOME`: Used for the default data directory

use crate::constants;
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Runtime configuration.
///
/// # Examples
///
/// ```
/// use daybook::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/tmp/daybook"),
///     log_format: "json".to_string(),
/// };
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Directory where entries and settings are stored.
    pub data_dir: PathBuf,

    /// Log output format, `text` or `json`.
    pub log_format: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &"[REDACTED_PATH]")
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            log_format: constants::LOG_FORMAT_TEXT.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the environment and validates it.
    pub fn load() -> AppResult<Self> {
        Self::load_with_log_format(None)
    }

    /// Like [`Config::load`], with a log format from the command line taking
    /// precedence over `DAYBOOK_LOG_FORMAT`.
    pub fn load_with_log_format(log_format: Option<String>) -> AppResult<Self> {
        let data_dir_str = env::var(constants::ENV_VAR_DAYBOOK_DIR).unwrap_or_else(|_| {
            let home = env::var(constants::ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, constants::DEFAULT_DATA_SUBDIR)
        });

        // Handles ~ and $VARS
        let expanded = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let log_format = log_format
            .or_else(|| env::var(constants::ENV_VAR_DAYBOOK_LOG_FORMAT).ok())
            .unwrap_or_else(|| constants::LOG_FORMAT_TEXT.to_string());

        let config = Config {
            data_dir: PathBuf::from(expanded.into_owned()),
            log_format,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        if self.log_format != constants::LOG_FORMAT_TEXT
            && self.log_format != constants::LOG_FORMAT_JSON
        {
            return Err(AppError::Config(format!(
                "Unknown log format '{}', expected '{}' or '{}'",
                self.log_format,
                constants::LOG_FORMAT_TEXT,
                constants::LOG_FORMAT_JSON
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        env::remove_var(constants::ENV_VAR_DAYBOOK_DIR);
        env::remove_var(constants::ENV_VAR_DAYBOOK_LOG_FORMAT);
    }

    #[test]
    fn test_debug_impl_redacts_path() {
        let config = Config {
            data_dir: PathBuf::from("/home/username/private/daybook"),
            log_format: "text".to_string(),
        };
        let debug_output = format!("{:?}", config);
        assert!(debug_output.contains("[REDACTED_PATH]"));
        assert!(!debug_output.contains("/home/username/private/daybook"));
    }

    #[test]
    #[serial]
    fn test_load_with_custom_dir() {
        clear_env();
        let temp_dir = tempdir().unwrap();
        let dir_path = temp_dir.path().to_string_lossy().to_string();

        env::set_var(constants::ENV_VAR_DAYBOOK_DIR, &dir_path);
        let config = Config::load().unwrap();
        clear_env();

        assert_eq!(config.data_dir, PathBuf::from(dir_path));
        assert_eq!(config.log_format, "text");
    }

    #[test]
    #[serial]
    fn test_load_defaults_under_home() {
        clear_env();
        let orig_home = env::var(constants::ENV_VAR_HOME).ok();
        env::set_var(constants::ENV_VAR_HOME, "/home/writer");

        let config = Config::load();

        match orig_home {
            Some(home) => env::set_var(constants::ENV_VAR_HOME, home),
            None => env::remove_var(constants::ENV_VAR_HOME),
        }
        assert_eq!(config.unwrap().data_dir, PathBuf::from("/home/writer/.daybook"));
    }

    #[test]
    #[serial]
    fn test_log_format_flag_overrides_environment() {
        clear_env();
        env::set_var(constants::ENV_VAR_DAYBOOK_DIR, "/tmp/daybook-config-test");
        env::set_var(constants::ENV_VAR_DAYBOOK_LOG_FORMAT, "xml");
        let result = Config::load_with_log_format(Some("json".to_string()));
        clear_env();

        assert_eq!(result.unwrap().log_format, "json");
    }

    #[test]
    #[serial]
    fn test_load_rejects_unknown_log_format() {
        clear_env();
        env::set_var(constants::ENV_VAR_DAYBOOK_DIR, "/tmp/daybook-config-test");
        env::set_var(constants::ENV_VAR_DAYBOOK_LOG_FORMAT, "xml");
        let result = Config::load();
        clear_env();

        match result {
            Err(AppError::Config(message)) => assert!(message.contains("xml")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_relative_dir() {
        let config = Config {
            data_dir: PathBuf::from("relative/path"),
            ..Config::default()
        };
        match config.validate() {
            Err(AppError::Config(message)) => assert!(message.contains("absolute")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_empty_dir() {
        let config = Config::default();
        match config.validate() {
            Err(AppError::Config(message)) => assert!(message.contains("empty")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }
}
