//! Display utilities for the Poro Focus CLI.
//!
//! This module provides formatted output for:
//! - Success messages
//! - Error messages
//! - Status display
//! - Task list rendering

use crate::types::{format_mm_ss, IpcResponse, Task, TimerPhase};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the daemon's message for a control command, plus the countdown
    /// when one is active.
    pub fn show_command_result(response: &IpcResponse) {
        if !response.message.is_empty() {
            println!("{}", response.message);
        }

        if let Some(data) = &response.data {
            if data.phase == Some(TimerPhase::Running) || data.phase == Some(TimerPhase::Paused) {
                if let Some(remaining) = data.remaining_seconds {
                    println!("  remaining: {}", format_mm_ss(remaining));
                }
            }
        }
    }

    /// Shows the current timer status.
    pub fn show_status(response: &IpcResponse) {
        println!("Poro Focus status");
        println!("-----------------");

        let Some(data) = &response.data else {
            println!("daemon returned no status");
            return;
        };

        if let Some(mode) = data.mode {
            println!("mode:      {}", mode.label());
        }
        if let Some(phase) = data.phase {
            let phase_display = match phase {
                TimerPhase::Editing => "idle",
                TimerPhase::Running => "running",
                TimerPhase::Paused => "paused",
            };
            println!("phase:     {phase_display}");
        }
        if let Some(display) = data.display_seconds {
            println!("time:      {}", format_mm_ss(display));
        }
        if let (Some(work), Some(break_time)) = (data.work_minutes, data.break_minutes) {
            println!("durations: {work}m work / {break_time}m break");
        }
        if let Some(sound) = data.sound_enabled {
            println!("sound:     {}", if sound { "on" } else { "off" });
        }
    }

    /// Shows the task list from a response.
    pub fn show_tasks(response: &IpcResponse) {
        let tasks = response
            .data
            .as_ref()
            .and_then(|data| data.tasks.as_deref())
            .unwrap_or(&[]);

        if tasks.is_empty() {
            println!("no tasks");
            return;
        }

        for task in tasks {
            println!("{}", Self::format_task(task));
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {message}");
    }

    /// Formats a single task line: `[x] 1712ccc  work  Review PR`.
    fn format_task(task: &Task) -> String {
        let done = if task.status { "x" } else { " " };
        format!("[{done}] {}  {}  {}", task.id, task.icon.as_str(), task.title)
    }
}

// ============================================================================
// Tests
// ============================================================================
