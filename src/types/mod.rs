//! Core data types for Poro Focus.
//!
//! This module defines the data structures used for:
//! - Timer mode and phase tracking
//! - Timer configuration with validation and clamping
//! - Task entities and their icon categories
//! - IPC request/response serialization

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerMode
// ============================================================================

/// Whether the current (or next) interval is a work or a break interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Focused work interval
    Work,
    /// Rest interval
    Break,
}

impl TimerMode {
    /// Returns the other mode.
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            TimerMode::Work => TimerMode::Break,
            TimerMode::Break => TimerMode::Work,
        }
    }

    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::Break => "break",
        }
    }

    /// Returns the human-readable label used in titles and status output.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Work => "Work",
            TimerMode::Break => "Break",
        }
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Work
    }
}

// ============================================================================
// TimerPhase
// ============================================================================

/// The engine's activity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Not started for the current mode; the full configured duration is shown
    Editing,
    /// Actively counting down
    Running,
    /// Stopped mid-interval with the remainder frozen
    Paused,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Editing => "editing",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
        }
    }
}

impl Default for TimerPhase {
    fn default() -> Self {
        TimerPhase::Editing
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Minimum work duration in minutes.
pub const WORK_MINUTES_MIN: u32 = 5;
/// Maximum work duration in minutes.
pub const WORK_MINUTES_MAX: u32 = 90;
/// Minimum break duration in minutes.
pub const BREAK_MINUTES_MIN: u32 = 5;
/// Maximum break duration in minutes.
pub const BREAK_MINUTES_MAX: u32 = 50;

/// Configuration for the focus timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Work duration in minutes (5-90)
    pub work_minutes: u32,
    /// Break duration in minutes (5-50)
    pub break_minutes: u32,
    /// Whether interval-end sound cues are played
    pub sound_enabled: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
            sound_enabled: true,
        }
    }
}

impl TimerConfig {
    /// Creates a new configuration with the specified work duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified break duration.
    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified sound flag.
    pub fn with_sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Returns the configured duration for the given mode, in seconds.
    #[must_use]
    pub fn duration_seconds(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_minutes * 60,
            TimerMode::Break => self.break_minutes * 60,
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if a duration is out of bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.work_minutes < WORK_MINUTES_MIN || self.work_minutes > WORK_MINUTES_MAX {
            return Err(format!(
                "work duration must be {WORK_MINUTES_MIN}-{WORK_MINUTES_MAX} minutes"
            ));
        }
        if self.break_minutes < BREAK_MINUTES_MIN || self.break_minutes > BREAK_MINUTES_MAX {
            return Err(format!(
                "break duration must be {BREAK_MINUTES_MIN}-{BREAK_MINUTES_MAX} minutes"
            ));
        }
        Ok(())
    }

    /// Clamps both durations into their valid ranges.
    ///
    /// Used when loading persisted settings that may predate the bounds.
    pub fn clamp(&mut self) {
        self.work_minutes = self.work_minutes.clamp(WORK_MINUTES_MIN, WORK_MINUTES_MAX);
        self.break_minutes = self
            .break_minutes
            .clamp(BREAK_MINUTES_MIN, BREAK_MINUTES_MAX);
    }
}

// ============================================================================
// TimerView
// ============================================================================

/// Read-only projection of the session state for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    /// Current mode
    pub mode: TimerMode,
    /// Current phase
    pub phase: TimerPhase,
    /// Authoritative countdown value (0 while editing)
    pub remaining_seconds: u32,
    /// What the timer digits should show: the full configured duration while
    /// editing, the countdown value otherwise
    pub display_seconds: u32,
}

impl TimerView {
    /// Formats the display value as zero-padded `MM:SS`.
    #[must_use]
    pub fn display_time(&self) -> String {
        format_mm_ss(self.display_seconds)
    }
}

/// Formats a second count as zero-padded `MM:SS`.
#[must_use]
pub fn format_mm_ss(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

// ============================================================================
// Task Types
// ============================================================================

/// Category tag attached to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskIcon {
    /// Work task
    Work,
    /// Study task
    Study,
    /// Exercise task
    Exercise,
    /// Cooking task
    Cook,
    /// Film / entertainment task
    Film,
}

impl TaskIcon {
    /// Returns the string representation of the icon category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskIcon::Work => "work",
            TaskIcon::Study => "study",
            TaskIcon::Exercise => "exercise",
            TaskIcon::Cook => "cook",
            TaskIcon::Film => "film",
        }
    }
}

impl Default for TaskIcon {
    fn default() -> Self {
        TaskIcon::Work
    }
}

impl std::str::FromStr for TaskIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(TaskIcon::Work),
            "study" => Ok(TaskIcon::Study),
            "exercise" => Ok(TaskIcon::Exercise),
            "cook" => Ok(TaskIcon::Cook),
            "film" => Ok(TaskIcon::Film),
            other => Err(format!("unknown task icon: {other}")),
        }
    }
}

/// A user task tracked alongside the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique, monotonic, millisecond-epoch derived identifier
    pub id: String,
    /// Non-empty task title
    pub title: String,
    /// Category tag
    pub icon: TaskIcon,
    /// Done flag
    pub status: bool,
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum IpcRequest {
    /// Start, pause or resume the timer (the play/pause button)
    Toggle,
    /// Reset the timer back to editing the work duration
    Reset,
    /// Switch between work and break mode
    Mode,
    /// Set the work duration
    Work {
        /// New work duration in minutes
        minutes: u32,
    },
    /// Set the break duration
    Break {
        /// New break duration in minutes
        minutes: u32,
    },
    /// Enable or disable sound cues
    Sound {
        /// New sound flag
        enabled: bool,
    },
    /// Query the current timer state
    Status,
    /// Add a task
    TaskAdd {
        /// Task title
        title: String,
        /// Category tag
        icon: TaskIcon,
    },
    /// Toggle a task's done status
    TaskDone {
        /// Task identifier
        id: String,
    },
    /// Delete a task
    TaskRemove {
        /// Task identifier
        id: String,
    },
    /// List tasks, optionally applying the focus-mode filter
    TaskList {
        /// Hide completed tasks
        #[serde(default)]
        focus: bool,
    },
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    /// Current mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TimerMode>,
    /// Current phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<TimerPhase>,
    /// Remaining seconds
    #[serde(rename = "remainingSeconds", skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Display seconds
    #[serde(rename = "displaySeconds", skip_serializing_if = "Option::is_none")]
    pub display_seconds: Option<u32>,
    /// Configured work duration in minutes
    #[serde(rename = "workMinutes", skip_serializing_if = "Option::is_none")]
    pub work_minutes: Option<u32>,
    /// Configured break duration in minutes
    #[serde(rename = "breakMinutes", skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<u32>,
    /// Whether sound cues are enabled
    #[serde(rename = "soundEnabled", skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    /// Task list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

impl ResponseData {
    /// Creates response data from a timer view and its configuration.
    pub fn from_view(view: &TimerView, config: &TimerConfig) -> Self {
        Self {
            mode: Some(view.mode),
            phase: Some(view.phase),
            remaining_seconds: Some(view.remaining_seconds),
            display_seconds: Some(view.display_seconds),
            work_minutes: Some(config.work_minutes),
            break_minutes: Some(config.break_minutes),
            sound_enabled: Some(config.sound_enabled),
            tasks: None,
        }
    }

    /// Creates response data carrying only a task list.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Some(tasks),
            ..Self::default()
        }
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
