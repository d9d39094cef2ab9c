//! Persistent settings for Poro Focus.
//!
//! This module contains the key/value store that survives restarts:
//! - `store`: JSON-file backed store with default-on-missing-key reads
//! - `error`: store error types

pub mod error;
pub mod store;

pub use error::SettingsError;
pub use store::{
    SettingsStore, KEY_BREAK_DURATION, KEY_SOUND_ENABLED, KEY_TASKS, KEY_WORK_DURATION,
};
