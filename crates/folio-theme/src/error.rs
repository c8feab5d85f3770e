//! Error types for preference storage and option loading.
//!
//! Storage errors never escape the [`ThemeManager`](crate::ThemeManager):
//! they are logged and replaced with a safe default. They are still typed so
//! that storage backends and the customizer can report what went wrong.

use std::io;

/// Errors raised by a [`PreferenceStorage`](crate::PreferenceStorage) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Storage is disabled or cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The persisted data could not be decoded.
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),

    /// A value could not be encoded for persistence.
    #[error("failed to encode value: {0}")]
    Encode(String),
}

impl StorageError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

/// Errors raised while loading [`ThemeOptions`](crate::ThemeOptions).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid theme options: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid theme options: {0}")]
    Invalid(String),
}
