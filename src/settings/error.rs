//! Settings store error types.

use thiserror::Error;

/// Errors that can occur in the persistent settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// Reading or writing the settings file failed.
    #[error("settings file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file could not be parsed or a value could not be encoded.
    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
