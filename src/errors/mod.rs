//! Error handling utilities for the daybook application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Most failure paths in a journaling session degrade to "nothing happened"
//! (wrong password, blank input, unreadable persisted value). Only conditions
//! that stop a command from doing its job at all surface as `AppError`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents errors that can occur when reading or writing persisted values.
///
/// # Examples
///
/// ```
/// use daybook::errors::StorageError;
///
/// let error = StorageError::InvalidKey("../escape".to_string());
/// assert!(format!("{}", error).contains("../escape"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// A value could not be serialized for storage.
    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        /// The storage key being written
        key: String,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// A storage key contained characters outside the flat key namespace.
    #[error("Invalid storage key '{0}'. Keys may only contain letters, digits, '-' and '_'.")]
    InvalidKey(String),
}

/// Represents errors that can occur when locking the data directory for a session.
///
/// # Examples
///
/// ```
/// use daybook::errors::LockError;
/// use std::path::PathBuf;
///
/// let error = LockError::FileBusy {
///     path: PathBuf::from("/path/to/.daybook.lock"),
/// };
///
/// assert!(format!("{}", error).contains("another daybook session"));
/// ```
#[derive(Debug, Error)]
pub enum LockError {
    /// Error when the data directory is already locked by another process.
    #[error("The journal is open in another daybook session ({path}). Close the other session first.")]
    FileBusy {
        /// The path to the lock file
        path: PathBuf,
    },

    /// Error when acquiring the lock fails for a technical reason.
    #[error("Failed to acquire session lock {path}: {source}. Please check file permissions and ensure the directory is accessible.")]
    AcquisitionFailed {
        /// The path to the lock file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the daybook application.
///
/// Note: This type does not implement `Clone` to avoid losing error context when
/// cloning `std::io::Error` values.
///
/// # Examples
///
/// ```
/// use daybook::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem or terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors in journal logic (e.g., invalid date formats, out-of-range settings).
    #[error("Journal logic error: {0}")]
    Journal(String),

    /// Errors from the persisted key-value storage.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Errors related to the session lock on the data directory.
    #[error("Session locking error: {0}")]
    Lock(#[from] LockError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("Invalid configuration".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: Invalid configuration"
        );

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        assert_eq!(
            format!("{}", AppError::Io(io_error)),
            "I/O error: permission denied"
        );

        let journal_error = AppError::Journal("Invalid date".to_string());
        assert_eq!(
            format!("{}", journal_error),
            "Journal logic error: Invalid date"
        );

        let app_error = AppError::Lock(LockError::FileBusy {
            path: PathBuf::from("/data/.daybook.lock"),
        });
        assert!(format!("{}", app_error).contains("Session locking error"));
        assert!(format!("{}", app_error).contains("/data/.daybook.lock"));
    }

    #[test]
    fn test_storage_error_variants() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let error = StorageError::Serialize {
            key: "journalEntries".to_string(),
            source,
        };
        assert!(format!("{}", error).contains("journalEntries"));

        let app_error: AppError = StorageError::InvalidKey("a/b".to_string()).into();
        assert!(format!("{}", app_error).starts_with("Storage error"));
    }

    #[test]
    fn test_lock_error_acquisition_failed() {
        let error = LockError::AcquisitionFailed {
            path: PathBuf::from("/data/.daybook.lock"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(format!("{}", error).contains("Failed to acquire session lock"));
        assert!(format!("{}", error).contains("permission denied"));
    }
}
