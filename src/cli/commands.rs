//! Command definitions for the Poro Focus CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Parser, Subcommand};

use crate::types::{
    TaskIcon, BREAK_MINUTES_MAX, BREAK_MINUTES_MIN, WORK_MINUTES_MAX, WORK_MINUTES_MIN,
};

// ============================================================================
// CLI Structure
// ============================================================================

/// Poro Focus - a Pomodoro focus timer with a task list
#[derive(Parser, Debug)]
#[command(
    name = "porofocus",
    version,
    about = "Pomodoro focus timer CLI",
    long_about = "A drift-corrected Pomodoro timer with auto-cycling work/break\n\
                  intervals, sound cues and a small task list.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start, pause or resume the timer
    Toggle,

    /// Stop the timer and return to an idle work session
    Reset,

    /// Switch between work and break mode
    Mode,

    /// Set the work duration in minutes (5-90)
    Work {
        /// Duration in minutes
        #[arg(value_parser = clap::value_parser!(u32).range(WORK_MINUTES_MIN as i64..=WORK_MINUTES_MAX as i64))]
        minutes: u32,
    },

    /// Set the break duration in minutes (5-50)
    Break {
        /// Duration in minutes
        #[arg(value_parser = clap::value_parser!(u32).range(BREAK_MINUTES_MIN as i64..=BREAK_MINUTES_MAX as i64))]
        minutes: u32,
    },

    /// Enable or disable sound cues
    Sound {
        /// "on" or "off"
        #[arg(value_parser = parse_on_off, action = clap::ArgAction::Set)]
        state: bool,
    },

    /// Show current timer status
    Status,

    /// Manage the task list
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },

    /// Run as daemon (background service)
    #[command(hide = true)]
    Daemon,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title
        #[arg(value_parser = validate_title)]
        title: String,

        /// Task icon (work, study, exercise, cook, film)
        #[arg(short, long, default_value = "work", value_parser = parse_icon)]
        icon: TaskIcon,
    },

    /// Toggle a task's done status
    Done {
        /// Task id
        id: String,
    },

    /// Remove a task
    Rm {
        /// Task id
        id: String,
    },

    /// List tasks
    List {
        /// Hide completed tasks
        #[arg(short, long)]
        focus: bool,
    },
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the task title.
///
/// - Must not be empty after trimming
/// - Must not exceed 100 characters
fn validate_title(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("task title must not be empty".to_string());
    }
    if s.len() > 100 {
        return Err("task title must be 100 characters or fewer".to_string());
    }
    Ok(s.to_string())
}

/// Parses an on/off flag.
fn parse_on_off(s: &str) -> Result<bool, String> {
    match s {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("expected 'on' or 'off', got '{other}'")),
    }
}

/// Parses a task icon name.
fn parse_icon(s: &str) -> Result<TaskIcon, String> {
    s.parse()
}

// ============================================================================
// Tests
// ============================================================================
