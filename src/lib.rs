//! Poro Focus Library
//!
//! This library provides the core functionality for the Poro Focus CLI.
//! It includes:
//! - Drift-corrected timer engine with auto-cycling work/break intervals
//! - IPC server/client for daemon-CLI communication
//! - CLI command parsing and display utilities
//! - Durable settings store for durations, sound and tasks
//! - Task list with a focus-mode projection
//! - Sound cues for interval ends

pub mod cli;
pub mod daemon;
pub mod engine;
pub mod notify;
pub mod settings;
pub mod tasks;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    IpcRequest, IpcResponse, ResponseData, Task, TaskIcon, TimerConfig, TimerMode, TimerPhase,
    TimerView,
};

// Re-export engine types
pub use engine::{Clock, ManualClock, SystemClock, TimerEngine, TimerEvent, TimerSession};

// Re-export notification types
pub use notify::{title_for, Announcer, Cue, CuePlayer, MockAnnouncer, NullAnnouncer};

// Re-export settings types
pub use settings::{SettingsError, SettingsStore};

// Re-export task types
pub use tasks::{visible_tasks, TaskError, TaskList};
