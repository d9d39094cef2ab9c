//! Persistent key/value settings store.
//!
//! A flat JSON object on disk that survives restarts, keyed by the same
//! names the settings have always used: `isSoundEnable`, `workDuration`,
//! `breakDuration`, `tasks`. Reads fall back to a provided default when a
//! key is missing or its value is malformed; writes that fail are logged
//! and dropped. Neither direction is allowed to take the process down.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::types::{Task, TimerConfig};

use super::error::SettingsError;

// ============================================================================
// Constants
// ============================================================================

/// Settings key for the sound flag.
pub const KEY_SOUND_ENABLED: &str = "isSoundEnable";
/// Settings key for the work duration in minutes.
pub const KEY_WORK_DURATION: &str = "workDuration";
/// Settings key for the break duration in minutes.
pub const KEY_BREAK_DURATION: &str = "breakDuration";
/// Settings key for the task list.
pub const KEY_TASKS: &str = "tasks";

/// Default settings file location under the home directory.
const SETTINGS_FILE: &str = ".porofocus/settings.json";

// ============================================================================
// SettingsStore
// ============================================================================

/// Synchronous key/value store backed by a JSON file.
pub struct SettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SettingsStore {
    /// Opens the store at the given path.
    ///
    /// A missing or unreadable file yields an empty store; every key then
    /// reads as its default. Never fails.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    warn!(path = %path.display(), "settings file is not a JSON object, starting fresh");
                    Map::new()
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse settings file, starting fresh");
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read settings file, starting fresh");
                Map::new()
            }
        };

        Self { path, values }
    }

    /// Opens the store at the default location (`~/.porofocus/settings.json`).
    ///
    /// # Errors
    ///
    /// Returns an error only if the home directory cannot be determined.
    pub fn open_default() -> Result<Self, SettingsError> {
        Ok(Self::open(Self::default_path()?))
    }

    /// Returns the default settings file path.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let home = dirs::home_dir().ok_or(SettingsError::NoHomeDirectory)?;
        Ok(home.join(SETTINGS_FILE))
    }

    /// Returns the path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a value, falling back to `default` when the key is missing or
    /// its stored value does not deserialize.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.values.get(key) {
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(key, error = %e, "malformed settings value, using default");
                    default
                }
            },
            None => default,
        }
    }

    /// Writes a value and persists the whole store.
    ///
    /// Serialization or I/O failures are logged and swallowed; the in-memory
    /// value is kept either way.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => {
                self.values.insert(key.to_string(), encoded);
                self.persist();
            }
            Err(e) => {
                warn!(key, error = %e, "failed to encode settings value");
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!(path = %self.path.display(), error = %e, "failed to write settings file");
        }
    }

    fn try_persist(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&Value::Object(self.values.clone()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------------

    /// Assembles the timer configuration from the persisted keys, clamping
    /// durations into their valid ranges.
    pub fn load_config(&self) -> TimerConfig {
        let defaults = TimerConfig::default();
        let mut config = TimerConfig {
            work_minutes: self.get(KEY_WORK_DURATION, defaults.work_minutes),
            break_minutes: self.get(KEY_BREAK_DURATION, defaults.break_minutes),
            sound_enabled: self.get(KEY_SOUND_ENABLED, defaults.sound_enabled),
        };
        config.clamp();
        config
    }

    /// Persists the durable fields of the timer configuration.
    pub fn save_config(&mut self, config: &TimerConfig) {
        self.values
            .insert(KEY_WORK_DURATION.to_string(), Value::from(config.work_minutes));
        self.values
            .insert(KEY_BREAK_DURATION.to_string(), Value::from(config.break_minutes));
        self.values
            .insert(KEY_SOUND_ENABLED.to_string(), Value::from(config.sound_enabled));
        self.persist();
    }

    /// Loads the persisted task list.
    pub fn load_tasks(&self) -> Vec<Task> {
        self.get(KEY_TASKS, Vec::new())
    }

    /// Persists the task list.
    pub fn save_tasks(&mut self, tasks: &[Task]) {
        self.set(KEY_TASKS, &tasks);
    }
}

// ============================================================================
// Tests
// ============================================================================
